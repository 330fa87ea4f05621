//! User document persistence.
//!
//! Every account is one document. Mutations either rewrite the whole
//! document (`save`) or overwrite whole top-level fields (`replace_fields`);
//! there is no per-element update. Two concurrent writers to the same field
//! race and the last write wins.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::models::application::Application;
use crate::models::artifact::{CoverLetter, ResumeFile};
use crate::models::user::{AuthToken, Profile, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// `max(id) + 1` over all users, or 1 when there are none.
    async fn next_user_id(&self) -> Result<i64>;
    async fn insert(&self, user: &User) -> Result<()>;
    async fn get(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Rewrites the whole document.
    async fn save(&self, user: &User) -> Result<()>;
    /// Overwrites the given top-level document fields in one write.
    async fn replace_fields(&self, id: i64, fields: Map<String, Value>) -> Result<()>;
}

/// A whole top-level field of the user document.
pub enum UserField<'a> {
    AuthTokens(&'a [AuthToken]),
    Profiles(&'a [Profile]),
    DefaultProfile(usize),
    Applications(&'a [Application]),
    Resumes(&'a [ResumeFile]),
    ResumeFeedbacks(&'a [String]),
    CoverLetters(&'a [CoverLetter]),
}

impl UserField<'_> {
    fn key(&self) -> &'static str {
        match self {
            UserField::AuthTokens(_) => "authTokens",
            UserField::Profiles(_) => "profiles",
            UserField::DefaultProfile(_) => "default_profile",
            UserField::Applications(_) => "applications",
            UserField::Resumes(_) => "resumes",
            UserField::ResumeFeedbacks(_) => "resumeFeedbacks",
            UserField::CoverLetters(_) => "coverletters",
        }
    }

    fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            UserField::AuthTokens(v) => serde_json::to_value(v),
            UserField::Profiles(v) => serde_json::to_value(v),
            UserField::DefaultProfile(v) => serde_json::to_value(v),
            UserField::Applications(v) => serde_json::to_value(v),
            UserField::Resumes(v) => serde_json::to_value(v),
            UserField::ResumeFeedbacks(v) => serde_json::to_value(v),
            UserField::CoverLetters(v) => serde_json::to_value(v),
        }
    }
}

/// Builds the field map for `replace_fields`.
pub fn field_patch(fields: &[UserField<'_>]) -> Result<Map<String, Value>> {
    let mut patch = Map::new();
    for field in fields {
        patch.insert(field.key().to_string(), field.to_value()?);
    }
    Ok(patch)
}

/// Convenience wrapper: serialize `fields` and overwrite them.
pub async fn replace(store: &dyn UserStore, id: i64, fields: &[UserField<'_>]) -> Result<()> {
    store.replace_fields(id, field_patch(fields)?).await
}
