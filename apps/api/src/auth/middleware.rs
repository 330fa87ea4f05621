//! Resolves the acting user once per request for every protected route.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::auth::session::{bearer_token, check_token, token_user_id, without_token, TokenStatus};
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;
use crate::store::{replace, UserField};

/// The validated principal, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// Axum middleware: `Authorization: Bearer <id>.<suffix>` → user lookup →
/// token scan → expiry check. An expired match is removed from the stored
/// list before the request is rejected.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AppError::Unauthorized)?
        .to_string();

    let user_id = token_user_id(&token).ok_or(AppError::Unauthorized)?;
    let user = state
        .store
        .get(user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    match check_token(&user.auth_tokens, &token, Utc::now()) {
        TokenStatus::Valid => {}
        TokenStatus::Expired => {
            let remaining = without_token(&user.auth_tokens, &token);
            replace(state.store.as_ref(), user.id, &[UserField::AuthTokens(&remaining)]).await?;
            info!("Removed expired token for user {}", user.id);
            return Err(AppError::Unauthorized);
        }
        TokenStatus::Unknown => {
            warn!("Rejected unknown token for user {}", user.id);
            return Err(AppError::Unauthorized);
        }
    }

    request.extensions_mut().insert(CurrentUser { user, token });
    Ok(next.run(request).await)
}
