use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, HeaderName},
    response::IntoResponse,
    Extension, Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth::middleware::CurrentUser;
use crate::errors::{check_index, AppError};
use crate::extractors::{AppJson, AppPath};
use crate::models::artifact::ResumeFile;
use crate::models::user::User;
use crate::resumes::extract::extract_pdf_text;
use crate::resumes::prompts::{cover_letter_prompt, feedback_prompt};
use crate::resumes::{push_resume, remove_resume};
use crate::state::AppState;
use crate::storage::resume_key;
use crate::store::{replace, UserField};

const DEFAULT_CONTENT_TYPE: &str = "application/pdf";

/// The `file` part of a multipart upload.
pub struct Upload {
    pub filename: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Default, Deserialize)]
pub struct CoverLetterRequest {
    pub job_description: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?;
        return Ok(Upload {
            filename,
            content_type,
            bytes,
        });
    }
    Err(AppError::Validation("No file provided".to_string()))
}

/// Generates feedback for already-extracted text, stores the blob and
/// appends both entries at the same new index.
pub async fn attach_resume(
    state: &AppState,
    mut user: User,
    upload: Upload,
    text: &str,
) -> Result<usize, AppError> {
    let feedback = state.completion.complete(&feedback_prompt(text)).await?;

    let key = resume_key(user.id);
    state
        .files
        .put(&key, upload.bytes, &upload.content_type)
        .await?;

    let file = ResumeFile {
        key: key.clone(),
        filename: upload.filename,
        content_type: upload.content_type,
        uploaded_at: Utc::now(),
    };
    let index = push_resume(&mut user, file, feedback);

    let persisted = replace(
        state.store.as_ref(),
        user.id,
        &[
            UserField::Resumes(&user.resumes),
            UserField::ResumeFeedbacks(&user.resume_feedbacks),
        ],
    )
    .await;
    if let Err(e) = persisted {
        if let Err(cleanup) = state.files.delete(&key).await {
            warn!("Orphaned résumé object {key}: {cleanup}");
        }
        return Err(e.into());
    }

    info!("Stored résumé {index} for user {}", user.id);
    Ok(index)
}

/// POST /resume
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AppError> {
    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    let upload = read_upload(multipart).await?;
    let text = extract_pdf_text(upload.bytes.clone()).await?;
    let index = attach_resume(&state, current.user, upload, &text).await?;

    Ok(Json(json!({
        "message": "Resume uploaded successfully",
        "index": index,
    })))
}

/// GET /resume
pub async fn handle_list_resumes(Extension(current): Extension<CurrentUser>) -> Json<Value> {
    let filenames: Vec<String> = current
        .user
        .resumes
        .iter()
        .enumerate()
        .map(|(i, file)| file.display_name(i))
        .collect();
    Json(json!({ "filenames": filenames }))
}

/// GET /resume/:idx
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppPath(idx): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let index = check_index(idx, current.user.resumes.len(), "resume")?;
    let file = &current.user.resumes[index];
    let bytes = state.files.get(&file.key).await?;
    let filename = file.display_name(index);

    let headers = [
        (header::CONTENT_TYPE, file.content_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
        (HeaderName::from_static("x-filename"), filename),
        (
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            "x-filename".to_string(),
        ),
    ];
    Ok((headers, bytes))
}

/// DELETE /resume/:idx
///
/// Removes the résumé and its feedback together, then the stored object.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppPath(idx): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    let mut user = current.user;
    let index = check_index(idx, user.resumes.len(), "resume")?;
    let removed = remove_resume(&mut user, index);

    replace(
        state.store.as_ref(),
        user.id,
        &[
            UserField::Resumes(&user.resumes),
            UserField::ResumeFeedbacks(&user.resume_feedbacks),
        ],
    )
    .await?;

    if let Err(e) = state.files.delete(&removed.key).await {
        warn!("Failed to delete résumé object {}: {e}", removed.key);
    }

    Ok(Json(json!({ "message": "Resume deleted successfully" })))
}

/// GET /resume-feedback
pub async fn handle_list_feedback(Extension(current): Extension<CurrentUser>) -> Json<Vec<String>> {
    Json(current.user.resume_feedbacks)
}

/// GET /resume-feedback/:idx
pub async fn handle_get_feedback(
    Extension(current): Extension<CurrentUser>,
    AppPath(idx): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    let feedbacks = current.user.resume_feedbacks;
    let index = check_index(idx, feedbacks.len(), "feedback")?;
    Ok(Json(json!({ "feedback": feedbacks[index] })))
}

/// POST /cover_letter/:idx
///
/// Drafts a cover letter from the stored résumé at `idx`. The body is optional.
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppPath(idx): AppPath<i64>,
    body: Option<AppJson<CoverLetterRequest>>,
) -> Result<Json<Value>, AppError> {
    let index = check_index(idx, current.user.resumes.len(), "resume")?;
    let request = body.map(|AppJson(r)| r).unwrap_or_default();

    let bytes = state.files.get(&current.user.resumes[index].key).await?;
    let text = extract_pdf_text(bytes).await?;
    let letter = state
        .completion
        .complete(&cover_letter_prompt(
            &text,
            request.job_description.as_deref(),
        ))
        .await?;

    Ok(Json(json!({ "response": letter })))
}
