use anyhow::{Context, Result};

/// Application configuration, read from the environment exactly once at
/// startup. Handlers and services never touch `std::env` after this.
pub struct AppConfig {
    /// Postgres connection string. Required.
    pub database_url: String,

    /// Symmetric token signing secret. Required, and required to be long
    /// enough that HS256 actually means something.
    pub jwt_secret: String,

    /// How long an issued token stays valid, in seconds. Defaults to 7 days.
    pub token_lifetime_secs: i64,

    /// Port to listen on. Defaults to 3000.
    pub port: u16,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// Missing required variables fail the process right here, at startup.
    /// Serving first and discovering an unset secret on the first login
    /// would be strictly worse.
    pub fn from_env() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters");
        }

        let token_lifetime_secs = match std::env::var("TOKEN_LIFETIME_SECS") {
            Ok(raw) => raw
                .parse()
                .context("TOKEN_LIFETIME_SECS must be a number of seconds")?,
            Err(_) => 7 * 24 * 60 * 60,
        };

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a valid port number")?,
            Err(_) => 3000,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            token_lifetime_secs,
            port,
        })
    }
}
