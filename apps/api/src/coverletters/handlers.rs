use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::middleware::CurrentUser;
use crate::errors::{check_index, AppError};
use crate::extractors::{AppJson, AppPath};
use crate::models::artifact::CoverLetter;
use crate::state::AppState;
use crate::store::{replace, UserField};

const DEFAULT_TITLE: &str = "Untitled";

#[derive(Debug, Default, Deserialize)]
pub struct CoverLetterBody {
    pub content: Option<String>,
    pub title: Option<String>,
}

fn required_content(body: &CoverLetterBody) -> Result<String, AppError> {
    body.content
        .clone()
        .ok_or_else(|| AppError::Validation("Cover letter content is required".to_string()))
}

async fn persist(state: &AppState, user_id: i64, letters: &[CoverLetter]) -> Result<(), AppError> {
    replace(
        state.store.as_ref(),
        user_id,
        &[UserField::CoverLetters(letters)],
    )
    .await?;
    Ok(())
}

/// POST /coverletters
pub async fn handle_create_cover_letter(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(body): AppJson<CoverLetterBody>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let content = required_content(&body)?;
    let mut letters = current.user.coverletters;
    letters.push(CoverLetter {
        title: body.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        content,
    });
    persist(&state, current.user.id, &letters).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Cover letter created successfully" })),
    ))
}

/// GET /coverletters
pub async fn handle_list_cover_letters(Extension(current): Extension<CurrentUser>) -> Json<Value> {
    let filenames: Vec<String> = current
        .user
        .coverletters
        .iter()
        .enumerate()
        .map(|(i, letter)| letter.display_name(i))
        .collect();
    Json(json!({ "filenames": filenames }))
}

/// GET /coverletters/:idx
pub async fn handle_get_cover_letter(
    Extension(current): Extension<CurrentUser>,
    AppPath(idx): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    let letters = current.user.coverletters;
    let index = check_index(idx, letters.len(), "cover letter")?;
    Ok(Json(json!({ "coverletter": letters[index] })))
}

/// PUT /coverletters/:idx
///
/// Replaces the content; the title is kept unless a new one is given.
pub async fn handle_update_cover_letter(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppPath(idx): AppPath<i64>,
    AppJson(body): AppJson<CoverLetterBody>,
) -> Result<Json<Value>, AppError> {
    let mut letters = current.user.coverletters;
    let index = check_index(idx, letters.len(), "cover letter")?;
    let content = required_content(&body)?;

    let letter = &mut letters[index];
    letter.content = content;
    if let Some(title) = body.title {
        letter.title = title;
    }
    persist(&state, current.user.id, &letters).await?;

    Ok(Json(json!({ "message": "Cover letter updated successfully" })))
}

/// DELETE /coverletters/:idx
pub async fn handle_delete_cover_letter(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppPath(idx): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    let mut letters = current.user.coverletters;
    let index = check_index(idx, letters.len(), "cover letter")?;
    letters.remove(index);
    persist(&state, current.user.id, &letters).await?;

    Ok(Json(json!({ "message": "Cover letter deleted successfully" })))
}
