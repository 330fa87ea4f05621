use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup aborts if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub selenium_url: String,
    pub frontend_url: String,
    /// Lifetime of a freshly issued bearer token.
    pub token_ttl_hours: i64,
    /// Present only when both Google client credentials are configured.
    pub google: Option<GoogleConfig>,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let google = match (
            std::env::var("GOOGLE_CLIENT_ID").ok(),
            std::env::var("GOOGLE_CLIENT_SECRET").ok(),
        ) {
            (Some(client_id), Some(client_secret)) => Some(GoogleConfig {
                client_id,
                client_secret,
                redirect_uri: env_or(
                    "GOOGLE_REDIRECT_URI",
                    "http://127.0.0.1:5000/users/signupGoogle/authorized",
                ),
            }),
            _ => None,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            ollama_url: env_or("OLLAMA_URL", "http://localhost:11434"),
            ollama_model: env_or("OLLAMA_MODEL", "llama3.2"),
            selenium_url: env_or("SELENIUM_URL", "http://localhost:4444"),
            frontend_url: env_or("FRONTEND_URL", "http://127.0.0.1:3000"),
            token_ttl_hours: env_or("TOKEN_TTL_HOURS", "24")
                .parse::<i64>()
                .context("TOKEN_TTL_HOURS must be a whole number of hours")?,
            google,
            port: env_or("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
impl Config {
    /// Configuration used by handler tests; nothing here is dialled.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://unused".to_string(),
            s3_bucket: "resumes".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.2".to_string(),
            selenium_url: "http://localhost:4444".to_string(),
            frontend_url: "http://127.0.0.1:3000".to_string(),
            token_ttl_hours: 24,
            google: None,
            port: 5000,
            rust_log: "info".to_string(),
        }
    }
}
