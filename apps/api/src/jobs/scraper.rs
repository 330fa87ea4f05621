//! Job listings from CareerBuilder, fetched through a remote browser.
//!
//! The listings page only renders in a real browser, so `WebDriverScraper`
//! drives a Selenium hub over the W3C WebDriver protocol and hands the page
//! source to `parse_listings`.

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use reqwest::{Client, Url};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::errors::AppError;

const SEARCH_URL: &str = "https://www.careerbuilder.com/jobs";
const SITE_ROOT: &str = "https://www.careerbuilder.com/";

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub link: String,
    /// Last path segment of `link`.
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub keywords: String,
    pub company: String,
    pub location: String,
}

impl SearchQuery {
    pub fn is_empty(&self) -> bool {
        [&self.keywords, &self.company, &self.location]
            .iter()
            .all(|term| term.trim().is_empty())
    }

    pub fn search_url(&self) -> Result<Url, AppError> {
        Url::parse_with_params(
            SEARCH_URL,
            &[
                ("company_name", self.company.as_str()),
                ("keywords", self.keywords.as_str()),
                ("location", self.location.as_str()),
            ],
        )
        .map_err(|e| AppError::Scraper(format!("invalid search url: {e}")))
    }
}

#[async_trait]
pub trait JobScraper: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<JobPosting>, AppError>;
}

#[derive(Debug, Deserialize)]
struct WdValue<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct NewSession {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// `JobScraper` backed by a Selenium hub. Every search opens its own
/// browser session and closes it before returning.
pub struct WebDriverScraper {
    client: Client,
    hub_url: String,
}

impl WebDriverScraper {
    pub fn new(selenium_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Scraper(e.to_string()))?;
        Ok(Self {
            client,
            hub_url: format!("{}/wd/hub", selenium_url.trim_end_matches('/')),
        })
    }

    async fn new_session(&self) -> Result<String, AppError> {
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": {
                        "args": [
                            "--headless",
                            "--disable-gpu",
                            "--no-sandbox",
                            format!("user-agent={}", random_user_agent()),
                        ]
                    }
                }
            }
        });

        let response = self
            .client
            .post(format!("{}/session", self.hub_url))
            .json(&capabilities)
            .send()
            .await
            .map_err(|e| AppError::Scraper(format!("webdriver unreachable: {e}")))?;
        let session: WdValue<NewSession> = read_value(response).await?;
        debug!("Opened webdriver session {}", session.value.session_id);
        Ok(session.value.session_id)
    }

    async fn page_source(&self, session: &str, url: &Url) -> Result<String, AppError> {
        let session_url = format!("{}/session/{session}", self.hub_url);

        let response = self
            .client
            .post(format!("{session_url}/url"))
            .json(&json!({ "url": url.as_str() }))
            .send()
            .await
            .map_err(|e| AppError::Scraper(format!("navigation failed: {e}")))?;
        read_value::<serde_json::Value>(response).await?;

        let response = self
            .client
            .get(format!("{session_url}/source"))
            .send()
            .await
            .map_err(|e| AppError::Scraper(format!("reading page source failed: {e}")))?;
        let source: WdValue<String> = read_value(response).await?;
        Ok(source.value)
    }

    async fn close_session(&self, session: &str) -> Result<(), AppError> {
        self.client
            .delete(format!("{}/session/{session}", self.hub_url))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Scraper(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl JobScraper for WebDriverScraper {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<JobPosting>, AppError> {
        let url = query.search_url()?;
        let session = self.new_session().await?;

        let source = self.page_source(&session, &url).await;
        if let Err(e) = self.close_session(&session).await {
            warn!("Failed to close webdriver session {session}: {e}");
        }

        let postings = parse_listings(&source?)?;
        info!("Scraped {} postings from {}", postings.len(), url);
        Ok(postings)
    }
}

async fn read_value<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<WdValue<T>, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Scraper(format!("webdriver returned {status}: {body}")));
    }
    response
        .json()
        .await
        .map_err(|e| AppError::Scraper(format!("unexpected webdriver response: {e}")))
}

fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css).map_err(|e| AppError::Scraper(format!("bad selector {css}: {e:?}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector).next().map(element_text)
}

/// Parses a CareerBuilder results page. Cards without a title or link are
/// skipped; missing detail spans become empty strings.
pub fn parse_listings(html: &str) -> Result<Vec<JobPosting>, AppError> {
    let card_sel = selector("li.data-results-content-parent")?;
    let title_sel = selector("div.data-results-title")?;
    let company_sel = selector("div.data-details span:nth-child(1)")?;
    let location_sel = selector("div.data-details span:nth-child(2)")?;
    let type_sel = selector("div.data-details span:nth-child(3)")?;
    let link_sel = selector("a.data-results-content")?;
    let root = Url::parse(SITE_ROOT).map_err(|e| AppError::Scraper(e.to_string()))?;

    let document = Html::parse_document(html);
    let mut postings = Vec::new();

    for card in document.select(&card_sel) {
        let Some(title) = first_text(card, &title_sel) else {
            continue;
        };
        let Some(href) = card
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };
        let link = match root.join(href) {
            Ok(url) => url.to_string(),
            Err(_) => href.to_string(),
        };
        let id = link.rsplit('/').next().unwrap_or_default().to_string();

        postings.push(JobPosting {
            title,
            company: first_text(card, &company_sel).unwrap_or_default(),
            location: first_text(card, &location_sel).unwrap_or_default(),
            job_type: first_text(card, &type_sel).unwrap_or_default(),
            link,
            id,
        });
    }

    Ok(postings)
}
