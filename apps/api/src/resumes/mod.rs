//! Résumé uploads and their paired feedback strings.
//!
//! `resumes[i]` and `resumeFeedbacks[i]` describe the same upload. Both
//! lists are only ever changed together and persisted in one write.

pub mod extract;
pub mod handlers;
pub mod prompts;

use crate::models::artifact::ResumeFile;
use crate::models::user::User;

/// Appends a résumé and its feedback at the same new index.
pub fn push_resume(user: &mut User, file: ResumeFile, feedback: String) -> usize {
    user.resumes.push(file);
    user.resume_feedbacks.push(feedback);
    user.resumes.len() - 1
}

/// Removes the résumé at `index` together with its feedback.
///
/// `index` must already be bounds-checked against `user.resumes`.
pub fn remove_resume(user: &mut User, index: usize) -> ResumeFile {
    if index < user.resume_feedbacks.len() {
        user.resume_feedbacks.remove(index);
    }
    user.resumes.remove(index)
}
