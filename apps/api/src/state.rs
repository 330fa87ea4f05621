use std::sync::Arc;

use crate::auth::google::GoogleOAuth;
use crate::config::Config;
use crate::jobs::scraper::JobScraper;
use crate::llm_client::CompletionService;
use crate::storage::FileStore;
use crate::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub files: Arc<dyn FileStore>,
    pub completion: Arc<dyn CompletionService>,
    pub scraper: Arc<dyn JobScraper>,
    /// `None` when Google credentials are not configured.
    pub google: Option<Arc<GoogleOAuth>>,
    pub config: Config,
}
