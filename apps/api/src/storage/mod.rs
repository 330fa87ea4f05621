//! Blob storage for uploaded résumé files.

#[cfg(test)]
pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::AppError;

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError>;
    async fn get(&self, key: &str) -> Result<Bytes, AppError>;
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

/// Storage key for a new résumé upload.
pub fn resume_key(user_id: i64) -> String {
    format!("resumes/{}/{}", user_id, uuid::Uuid::new_v4())
}
