use accounts::{config::AppConfig, db, routes, state::AppState, utils::token::TokenService};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 0. Load .env file immediately.
    // Uses dotenvy which is just dotenv but maintained. Silently ignores if no .env exists.
    dotenvy::dotenv().ok();

    // 1. Read configuration up front.
    // A missing DATABASE_URL or JWT_SECRET kills the process here, before
    // anything gets a chance to sign tokens with an undefined secret.
    let config = AppConfig::from_env()?;

    // 2. Initialize Sentry (if configured)
    // This guard must be kept in scope for Sentry to work
    let _guard = sentry::init((std::env::var("SENTRY_DSN").ok(), sentry::ClientOptions {
        release: sentry::release_name!(),
        send_default_pii: true,
        traces_sample_rate: 1.0,
        ..Default::default()
    }));

    // 3. Install rustls crypto provider
    // This needs to happen before any TLS connections are made (database, etc).
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // 4. Initialize logging
    // Uses tracing for structured logs. Respects RUST_LOG env var.
    // Defaults to debug level for this crate and tower_http so you can see what's happening.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "accounts=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer()) // Sentry integration
        .init();

    tracing::info!("Starting Accounts API...");

    // 5. Connect to database
    // Runs the embedded migrations automatically.
    let db = db::connect(&config.database_url).await?;
    tracing::info!("Connected to Postgres successfully!");

    // 6. Build the token service once from config.
    // Handlers and middleware clone this out of the state; nothing in the
    // request path ever reads the environment.
    let tokens = TokenService::new(&config.jwt_secret, config.token_lifetime_secs);

    // 7. App state + routes
    let state = AppState { db, tokens };
    let app = routes::create_routes(state);

    // 8. Start the server
    // 0.0.0.0 so it binds to all interfaces (necessary in Docker).
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
