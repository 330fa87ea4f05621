//! Google sign-in: authorization-code flow against Google's OpenID endpoints.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::GoogleConfig;
use crate::errors::AppError;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "openid email profile";
/// How long an issued `state` value stays redeemable.
const STATE_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUser {
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
}

impl GoogleUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
            .trim()
            .to_string()
    }
}

/// Outcome of a completed code exchange.
pub struct GoogleSignIn {
    pub access_token: String,
    pub user: GoogleUser,
}

pub struct GoogleOAuth {
    config: GoogleConfig,
    client: Client,
    pending: Mutex<HashMap<String, Instant>>,
}

impl GoogleOAuth {
    pub fn new(config: GoogleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(Self {
            config,
            client,
            pending: Mutex::new(HashMap::new()),
        })
    }

    /// Google's consent URL with a fresh one-time `state`.
    pub async fn authorize_url(&self) -> Result<Url, AppError> {
        let state = uuid::Uuid::new_v4().to_string();
        let nonce = uuid::Uuid::new_v4().to_string();

        {
            let mut pending = self.pending.lock().await;
            pending.retain(|_, issued| issued.elapsed() < STATE_TTL);
            pending.insert(state.clone(), Instant::now());
        }

        Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("state", state.as_str()),
                ("nonce", nonce.as_str()),
            ],
        )
        .map_err(|e| AppError::Internal(e.into()))
    }

    /// Redeems `state`, exchanges `code` for an access token and loads the profile.
    pub async fn complete(&self, code: &str, state: &str) -> Result<GoogleSignIn, AppError> {
        let issued = self.pending.lock().await.remove(state);
        match issued {
            Some(at) if at.elapsed() < STATE_TTL => {}
            _ => return Err(AppError::Unauthorized),
        }

        let token: TokenResponse = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Google token exchange failed: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Google token response: {e}")))?;

        let user: GoogleUser = self
            .client
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Google userinfo failed: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Google userinfo response: {e}")))?;

        debug!("Google sign-in for {}", user.email);
        Ok(GoogleSignIn {
            access_token: token.access_token,
            user,
        })
    }
}
