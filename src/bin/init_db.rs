//! Creates the todo schema if it is missing. With `--reset` the table is
//! dropped and recreated first, discarding every stored todo.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_api::config::AppConfig;
use todo_api::db;

fn is_reset() -> bool {
    std::env::args().any(|a| a == "--reset")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "init_db=info,todo_api=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    db::ensure_parent_dir(&config.database_url)?;
    let pool = db::connect(&config.database_url, 1).await?;

    if is_reset() {
        warn!("dropping all tables in {}", config.database_url);
        sqlx::query("DROP TABLE IF EXISTS todos").execute(&pool).await?;
        sqlx::query("DROP TABLE IF EXISTS _sqlx_migrations")
            .execute(&pool)
            .await?;
    }

    info!("creating tables in {}", config.database_url);
    db::run_migrations(&pool).await?;

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos")
        .fetch_one(&pool)
        .await?;
    info!("database initialised, {} todos stored", count);

    pool.close().await;
    Ok(())
}
