use anyhow::Result;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Connects to Postgres and brings the schema up to date.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    // 1. Pool. Five connections is plenty for a service this size; every
    // request touches the database at most twice.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    // 2. Migrations, embedded at compile time from ./migrations.
    // Running them on every boot is idempotent and means a fresh database
    // needs zero manual setup.
    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}
