use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::application::Application;
use crate::models::artifact::{CoverLetter, ResumeFile};

/// The single document stored per account. Every list below is persisted by
/// overwriting the whole field, never element by element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub username: Option<String>,
    /// bcrypt hash; absent for accounts created through Google.
    #[serde(rename = "password")]
    pub password_hash: Option<String>,
    pub email: String,
    #[serde(rename = "authTokens")]
    pub auth_tokens: Vec<AuthToken>,
    pub profiles: Vec<Profile>,
    pub default_profile: usize,
    pub applications: Vec<Application>,
    pub resumes: Vec<ResumeFile>,
    #[serde(rename = "resumeFeedbacks")]
    pub resume_feedbacks: Vec<String>,
    pub coverletters: Vec<CoverLetter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
    pub expiry: DateTime<Utc>,
}

/// A named bundle of job-search preferences. Names are unique per user only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(rename = "profileName")]
    pub profile_name: String,
    pub skills: Vec<String>,
    pub job_levels: Vec<String>,
    pub locations: Vec<String>,
    pub institution: String,
    pub phone_number: String,
    pub address: String,
}

impl Profile {
    pub fn named(name: impl Into<String>) -> Self {
        Profile {
            profile_name: name.into(),
            ..Profile::default()
        }
    }
}

impl User {
    /// A fresh account with one empty default profile.
    pub fn new(id: i64, full_name: &str, default_profile_name: String) -> Self {
        User {
            id,
            full_name: full_name.to_string(),
            profiles: vec![Profile::named(default_profile_name)],
            default_profile: 0,
            ..User::default()
        }
    }

    /// The default profile, if `default_profile` still points inside the list.
    pub fn default_profile(&self) -> Option<&Profile> {
        self.profiles.get(self.default_profile)
    }

    /// Public summary returned by signup.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "fullName": self.full_name,
            "username": self.username,
        })
    }
}
