//! Mutations over a user's application list. Callers persist the whole
//! returned list; nothing here touches storage.

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationDraft};

/// `max(id) + 1` within this user's list, or 1 when it is empty.
pub fn next_application_id(applications: &[Application]) -> i64 {
    applications.iter().map(|a| a.id).max().map_or(1, |max| max + 1)
}

/// Appends a new application built from `draft` and returns it.
pub fn add_application(
    applications: &mut Vec<Application>,
    draft: ApplicationDraft,
) -> Result<Application, AppError> {
    let (Some(job_title), Some(company_name)) = (draft.job_title, draft.company_name) else {
        return Err(AppError::Validation("Missing fields in input".to_string()));
    };

    let application = Application {
        id: next_application_id(applications),
        job_title,
        company_name,
        date: draft.date.flatten(),
        job_link: draft.job_link.flatten(),
        location: draft.location.flatten(),
        job_type: draft.job_type.flatten(),
        status: Some(draft.status.flatten().unwrap_or_else(|| "1".to_string())),
        external_id: draft.external_id.flatten(),
    };
    applications.push(application.clone());
    Ok(application)
}

/// Merges `draft` into the entry with `id` in place and returns the result.
pub fn update_application(
    applications: &mut [Application],
    id: i64,
    draft: ApplicationDraft,
) -> Result<Application, AppError> {
    if applications.is_empty() {
        return Err(AppError::NoRecords("No applications found".to_string()));
    }
    let application = applications
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    application.merge(draft);
    Ok(application.clone())
}

/// Removes the entry with `id`, returning it.
pub fn delete_application(
    applications: &mut Vec<Application>,
    id: i64,
) -> Result<Application, AppError> {
    let position = applications
        .iter()
        .position(|a| a.id == id)
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    Ok(applications.remove(position))
}
