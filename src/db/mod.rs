//! Database pool construction and reference-data reads.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod queries;

/// Build the Postgres pool the whole application shares
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
