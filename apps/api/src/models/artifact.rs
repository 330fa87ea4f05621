use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to an uploaded résumé; the bytes live in the file store under `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeFile {
    pub key: String,
    pub filename: Option<String>,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl ResumeFile {
    /// Filename shown to clients, with a generated fallback per index.
    pub fn display_name(&self, index: usize) -> String {
        match self.filename.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("resume_{index}.pdf"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLetter {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl CoverLetter {
    pub fn display_name(&self, index: usize) -> String {
        if self.title.is_empty() {
            format!("coverletter_{index}")
        } else {
            self.title.clone()
        }
    }
}
