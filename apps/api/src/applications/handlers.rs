use axum::{
    extract::State,
    Extension, Json,
};

use crate::applications::list::{add_application, delete_application, update_application};
use crate::auth::middleware::CurrentUser;
use crate::errors::AppError;
use crate::extractors::{AppJson, AppPath};
use crate::models::application::{Application, ApplicationBody};
use crate::state::AppState;
use crate::store::{replace, UserField};

/// GET /applications
pub async fn handle_list_applications(
    Extension(current): Extension<CurrentUser>,
) -> Json<Vec<Application>> {
    Json(current.user.applications)
}

/// POST /applications
pub async fn handle_add_application(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(body): AppJson<ApplicationBody>,
) -> Result<Json<Application>, AppError> {
    let mut applications = current.user.applications;
    let added = add_application(&mut applications, body.into_draft())?;
    persist(&state, current.user.id, &applications).await?;
    Ok(Json(added))
}

/// PUT /applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<ApplicationBody>,
) -> Result<Json<Application>, AppError> {
    let mut applications = current.user.applications;
    let updated = update_application(&mut applications, id, body.into_draft())?;
    persist(&state, current.user.id, &applications).await?;
    Ok(Json(updated))
}

/// DELETE /applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Application>, AppError> {
    let mut applications = current.user.applications;
    let removed = delete_application(&mut applications, id)?;
    persist(&state, current.user.id, &applications).await?;
    Ok(Json(removed))
}

async fn persist(
    state: &AppState,
    user_id: i64,
    applications: &[Application],
) -> Result<(), AppError> {
    replace(
        state.store.as_ref(),
        user_id,
        &[UserField::Applications(applications)],
    )
    .await?;
    Ok(())
}
