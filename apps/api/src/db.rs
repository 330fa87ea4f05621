use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the user document table if it does not exist yet.
///
/// `username` and `email` are mirrored out of the document so lookups by
/// either can use an index; everything else lives in `document`.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id       BIGINT PRIMARY KEY,
            username TEXT UNIQUE,
            email    TEXT,
            document JSONB NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS users_email_idx ON users (email)")
        .execute(pool)
        .await?;

    info!("User schema ready");
    Ok(())
}
