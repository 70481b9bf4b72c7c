use mindful_minutes_api::app::app;
use mindful_minutes_api::database::schema::init_schema;
use mindful_minutes_api::database::DatabaseManager;
use mindful_minutes_api::is_development;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let default_filter = if is_development!() { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = mindful_minutes_api::config::config();
    tracing::info!("Starting Mindful Minutes API in {:?} mode", config.environment);

    let pool = DatabaseManager::pool().await?;
    init_schema(&pool).await?;

    let app = app(pool);

    // Allow tests or deployments to override port via env
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Mindful Minutes API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
