use anyhow::Context;
use gatehouse::{
    app::build_router,
    config::{
        server::ServerConfig,
        session::{validate_production_config, SessionConfig},
    },
    db,
    repositories::user_repository::SqliteUserRepository,
    AppState,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gatehouse=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    validate_production_config().context("invalid production configuration")?;

    // Database connection
    let pool = db::create_pool(&config)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    // Run migrations
    db::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let app_state = AppState::new(user_repository);

    // Session store
    let session_store = SqliteStore::new(pool.clone())
        .with_table_name("sessions")
        .map_err(|e| anyhow::anyhow!("invalid session table name: {}", e))?;
    session_store
        .migrate()
        .await
        .context("failed to create session table")?;

    let session_layer = SessionConfig::from_env().create_layer(session_store);

    let app = build_router(app_state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http());

    let addr = config.socket_addr()?;
    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
