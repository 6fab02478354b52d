use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_api::config::AppConfig;
use todo_api::db;
use todo_api::routes::build_app;
use todo_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "todo_api=debug,tower_http=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    db::ensure_parent_dir(&config.database_url)?;
    let pool = db::connect(&config.database_url, config.max_connections).await?;
    db::run_migrations(&pool).await?;
    info!("database ready at {}", config.database_url);

    if !config.csrf.enabled {
        warn!("CSRF protection is disabled");
    }

    let addr = config.bind_addr();
    let state = AppState {
        db: pool,
        config: Arc::new(config),
    };

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
