use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::auth::middleware::CurrentUser;
use crate::errors::{check_index, AppError};
use crate::extractors::{AppJson, AppPath};
use crate::models::user::{Profile, User};
use crate::profiles::fields::{apply_profile_update, build_profile};
use crate::profiles::{ensure_unique_name, resolve_profile_index};
use crate::state::AppState;
use crate::store::{replace, UserField};

#[derive(Debug, Serialize)]
pub struct ProfileListEntry {
    pub profileid: usize,
    #[serde(rename = "profileName")]
    pub profile_name: String,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
}

#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<ProfileListEntry>,
    pub default_profile: usize,
}

/// Profile fields plus the account's email and name.
fn profile_view(user: &User, index: usize) -> Result<Value, AppError> {
    let profile = user
        .profiles
        .get(index)
        .ok_or_else(|| AppError::InvalidIndex(format!("Invalid profile index: {index}")))?;
    let mut view = serde_json::to_value(profile).map_err(|e| AppError::Internal(e.into()))?;
    if let Value::Object(map) = &mut view {
        map.insert("email".into(), json!(user.email));
        map.insert("fullName".into(), json!(user.full_name));
        map.insert("profileid".into(), json!(index));
    }
    Ok(view)
}

/// GET /getProfile
pub async fn handle_get_default_profile(
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let index = resolve_profile_index(&current.user, None)?;
    Ok(Json(profile_view(&current.user, index)?))
}

/// GET /getProfile/:id
pub async fn handle_get_profile(
    Extension(current): Extension<CurrentUser>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    let index = resolve_profile_index(&current.user, Some(id))?;
    Ok(Json(profile_view(&current.user, index)?))
}

/// POST /updateProfile
///
/// Updates the default profile, creating an empty one first when the user
/// has none.
pub async fn handle_update_default_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(fields): AppJson<Map<String, Value>>,
) -> Result<Json<Value>, AppError> {
    let mut user = current.user;
    let index = if user.profiles.is_empty() {
        user.profiles.push(Profile::default());
        user.default_profile = 0;
        0
    } else {
        resolve_profile_index(&user, None)?
    };
    update_profile_at(&state, user, index, &fields).await
}

/// POST /updateProfile/:id
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppPath(id): AppPath<i64>,
    AppJson(fields): AppJson<Map<String, Value>>,
) -> Result<Json<Value>, AppError> {
    let user = current.user;
    let index = resolve_profile_index(&user, Some(id))?;
    update_profile_at(&state, user, index, &fields).await
}

async fn update_profile_at(
    state: &AppState,
    mut user: User,
    index: usize,
    fields: &Map<String, Value>,
) -> Result<Json<Value>, AppError> {
    apply_profile_update(&mut user, index, fields)?;
    if fields.contains_key("profileName") {
        ensure_unique_name(&user.profiles, &user.profiles[index].profile_name, Some(index))?;
    }
    state.store.save(&user).await?;
    Ok(Json(profile_view(&user, index)?))
}

/// POST /createProfile
pub async fn handle_create_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(fields): AppJson<Map<String, Value>>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let profile = build_profile(&fields)?;
    ensure_unique_name(&current.user.profiles, &profile.profile_name, None)?;
    let mut profiles = current.user.profiles;
    profiles.push(profile);
    let profileid = profiles.len() - 1;

    replace(
        state.store.as_ref(),
        current.user.id,
        &[UserField::Profiles(&profiles)],
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Profile created successfully",
            "profileid": profileid,
        })),
    ))
}

/// POST /setDefaultProfile/:id
pub async fn handle_set_default_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    let index = check_index(id, current.user.profiles.len(), "profile")?;
    replace(
        state.store.as_ref(),
        current.user.id,
        &[UserField::DefaultProfile(index)],
    )
    .await?;

    Ok(Json(json!({
        "message": "Default profile updated successfully",
        "default_profile": index,
    })))
}

/// GET /getProfileList
pub async fn handle_list_profiles(
    Extension(current): Extension<CurrentUser>,
) -> Json<ProfileListResponse> {
    let user = current.user;
    let profiles = user
        .profiles
        .iter()
        .enumerate()
        .map(|(index, p)| ProfileListEntry {
            profileid: index,
            profile_name: p.profile_name.clone(),
            is_default: index == user.default_profile,
        })
        .collect();

    Json(ProfileListResponse {
        profiles,
        default_profile: user.default_profile,
    })
}
