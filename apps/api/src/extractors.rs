//! axum extractors whose rejections are `AppError`s, so malformed bodies,
//! paths and query strings get the same `{error, code}` envelope as every
//! other failure.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::{send, send_request, TestApp};

    #[tokio::test]
    async fn test_wrongly_typed_body_is_validation_error() {
        let app = TestApp::new();
        let token = app.seed_user(1).await;
        send(
            &app.router,
            "POST",
            "/applications",
            Some(&token),
            Some(json!({"title": "SWE", "company": "Acme"})),
        )
        .await;

        let (status, body) = send(
            &app.router,
            "PUT",
            "/applications/1",
            Some(&token),
            Some(json!({"status": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["error"].is_string());
        assert_eq!(app.user(1).await.applications[0].status.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_unparseable_json_and_missing_content_type() {
        let app = TestApp::new();
        let token = app.seed_user(1).await;

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/coverletters")
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let (status, body) = send_request(&app.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = send(&app.router, "POST", "/createProfile", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_bad_path_and_query_use_error_envelope() {
        let app = TestApp::new();
        let token = app.seed_user(1).await;

        let (status, body) =
            send(&app.router, "DELETE", "/applications/abc", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = send(
            &app.router,
            "GET",
            "/getRecommendations?selected_profile=first",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_multipart_upload_uses_error_envelope() {
        let app = TestApp::new();
        let token = app.seed_user(1).await;
        let (status, body) = send(
            &app.router,
            "POST",
            "/resume",
            Some(&token),
            Some(json!({"file": "resume.pdf"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(app.user(1).await.resumes.is_empty());
    }
}
