//! Router-level test harness: in-memory stores and stub adapters behind the
//! real router and middleware.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use chrono::{Duration, Utc};
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::config::Config;
use crate::errors::AppError;
use crate::jobs::scraper::{JobPosting, JobScraper, SearchQuery};
use crate::llm_client::{CompletionService, LlmError};
use crate::models::user::{AuthToken, User};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::memory::MemoryFileStore;
use crate::store::memory::MemoryUserStore;
use crate::store::UserStore;

const BOUNDARY: &str = "apptracker-test-boundary";

/// A one-page text PDF with a short résumé.
pub const RESUME_PDF: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/resume.pdf"));

/// Returns a fixed reply and records every prompt.
pub struct StubCompletion {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl StubCompletion {
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl CompletionService for StubCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().await.push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Returns fixed postings and records every query.
pub struct StubScraper {
    postings: Vec<JobPosting>,
    queries: Mutex<Vec<SearchQuery>>,
}

impl StubScraper {
    pub async fn queries(&self) -> Vec<SearchQuery> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl JobScraper for StubScraper {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<JobPosting>, AppError> {
        self.queries.lock().await.push(query.clone());
        Ok(self.postings.clone())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryUserStore>,
    pub files: Arc<MemoryFileStore>,
    pub completion: Arc<StubCompletion>,
    pub scraper: Arc<StubScraper>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build("Looks good.", Vec::new())
    }

    pub fn with_completion_reply(reply: &str) -> Self {
        Self::build(reply, Vec::new())
    }

    pub fn with_postings(postings: Vec<JobPosting>) -> Self {
        Self::build("Looks good.", postings)
    }

    fn build(reply: &str, postings: Vec<JobPosting>) -> Self {
        let store = Arc::new(MemoryUserStore::default());
        let files = Arc::new(MemoryFileStore::default());
        let completion = Arc::new(StubCompletion {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        });
        let scraper = Arc::new(StubScraper {
            postings,
            queries: Mutex::new(Vec::new()),
        });

        let state = AppState {
            store: store.clone(),
            files: files.clone(),
            completion: completion.clone(),
            scraper: scraper.clone(),
            google: None,
            config: Config::for_tests(),
        };

        TestApp {
            router: build_router(state.clone()),
            state,
            store,
            files,
            completion,
            scraper,
        }
    }

    /// Inserts a user with no profiles and one live token; returns the token.
    pub async fn seed_user(&self, id: i64) -> String {
        self.seed_user_with_expiry(id, Utc::now() + Duration::hours(1))
            .await
    }

    pub async fn seed_user_with_expired_token(&self, id: i64) -> String {
        self.seed_user_with_expiry(id, Utc::now() - Duration::minutes(1))
            .await
    }

    async fn seed_user_with_expiry(&self, id: i64, expiry: chrono::DateTime<Utc>) -> String {
        let token = format!("{id}.test-token");
        let user = User {
            id,
            full_name: format!("User {id}"),
            username: Some(format!("user{id}")),
            auth_tokens: vec![AuthToken {
                token: token.clone(),
                expiry,
            }],
            ..User::default()
        };
        self.store.insert(&user).await.unwrap();
        token
    }

    pub async fn user(&self, id: i64) -> User {
        self.store.get(id).await.unwrap().unwrap()
    }

    pub async fn edit_user(&self, id: i64, edit: impl FnOnce(&mut User)) {
        let mut user = self.user(id).await;
        edit(&mut user);
        self.store.save(&user).await.unwrap();
    }
}

/// Sends a JSON request and returns the status and parsed body
/// (`Value::Null` when the body is empty).
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(Method::from_bytes(method.as_bytes()).unwrap())
        .uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(router, request).await
}

pub async fn send_request(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, bytes) = send_raw(router, request).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub async fn send_raw(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes)
}

/// A `multipart/form-data` POST with a single file part.
pub fn multipart_request(
    uri: &str,
    token: &str,
    field: &str,
    filename: &str,
    content: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
