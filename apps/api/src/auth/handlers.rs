use axum::{
    extract::State,
    response::Redirect,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::middleware::CurrentUser;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{issue_token, without_token};
use crate::errors::AppError;
use crate::extractors::{AppJson, AppQuery};
use crate::models::user::{Profile, User};
use crate::state::AppState;
use crate::store::{replace, UserField};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login payload: default-profile view plus the new bearer token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub profile: Value,
    pub token: String,
    pub expiry: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleCallback {
    pub code: String,
    pub state: String,
}

/// POST /users/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    AppJson(req): AppJson<SignupRequest>,
) -> Result<Json<Value>, AppError> {
    let (Some(username), Some(password), Some(full_name)) =
        (req.username, req.password, req.full_name)
    else {
        return Err(AppError::Validation("Missing fields in input".to_string()));
    };

    if state.store.find_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    let id = state.store.next_user_id().await?;
    let mut user = User::new(id, &full_name, format!("{full_name}'s Default"));
    user.username = Some(username);
    user.password_hash = Some(hash_password(&password).await?);

    state.store.insert(&user).await?;
    info!("Created user {id}");

    Ok(Json(user.summary()))
}

/// POST /users/login
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (Some(username), Some(password)) = (req.username, req.password) else {
        return Err(AppError::Validation(
            "Username or password missing".to_string(),
        ));
    };

    let user = state
        .store
        .find_by_username(&username)
        .await?
        .ok_or(AppError::Unauthorized)?;
    let Some(hash) = user.password_hash.as_deref() else {
        return Err(AppError::Unauthorized);
    };
    if !verify_password(&password, hash).await {
        return Err(AppError::Unauthorized);
    }

    let issued = issue_token(
        user.id,
        &uuid::Uuid::new_v4().to_string(),
        state.config.token_ttl_hours,
        Utc::now(),
    );
    let mut tokens = user.auth_tokens.clone();
    tokens.push(issued.clone());
    replace(state.store.as_ref(), user.id, &[UserField::AuthTokens(&tokens)]).await?;

    Ok(Json(LoginResponse {
        profile: login_profile(&user),
        token: issued.token,
        expiry: issued.expiry,
    }))
}

/// POST /users/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let remaining = without_token(&current.user.auth_tokens, &current.token);
    replace(
        state.store.as_ref(),
        current.user.id,
        &[UserField::AuthTokens(&remaining)],
    )
    .await?;
    Ok(Json(json!({ "success": "" })))
}

/// GET /users/signupGoogle
pub async fn handle_google_signup(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let google = state
        .google
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Google sign-in is not configured".to_string()))?;
    let url = google.authorize_url().await?;
    Ok(Redirect::to(url.as_str()))
}

/// GET /users/signupGoogle/authorized
pub async fn handle_google_authorized(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<GoogleCallback>,
) -> Result<Redirect, AppError> {
    let google = state
        .google
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Google sign-in is not configured".to_string()))?;

    let sign_in = google.complete(&params.code, &params.state).await?;
    if !sign_in.user.email_verified {
        return Err(AppError::Unauthorized);
    }

    let user = match state.store.find_by_email(&sign_in.user.email).await? {
        Some(user) => user,
        None => {
            let id = state.store.next_user_id().await?;
            let mut user = User::new(id, &sign_in.user.full_name(), "default".to_string());
            user.email = sign_in.user.email.clone();
            state.store.insert(&user).await?;
            info!("Created user {id} from Google sign-in");
            user
        }
    };

    let issued = issue_token(
        user.id,
        &sign_in.access_token,
        state.config.token_ttl_hours,
        Utc::now(),
    );
    let mut tokens = user.auth_tokens.clone();
    tokens.push(issued.clone());
    replace(state.store.as_ref(), user.id, &[UserField::AuthTokens(&tokens)]).await?;

    let target = Url::parse_with_params(
        &format!("{}/", state.config.frontend_url.trim_end_matches('/')),
        &[
            ("token", issued.token.as_str()),
            ("expiry", issued.expiry.to_rfc3339().as_str()),
            ("userId", user.id.to_string().as_str()),
        ],
    )
    .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Redirect::to(target.as_str()))
}

fn login_profile(user: &User) -> Value {
    let empty = Profile::default();
    let profile = user.default_profile().unwrap_or(&empty);
    json!({
        "id": user.id,
        "fullName": user.full_name,
        "email": user.email,
        "institution": profile.institution,
        "skills": profile.skills,
        "phone_number": profile.phone_number,
        "address": profile.address,
        "locations": profile.locations,
        "job_levels": profile.job_levels,
    })
}
