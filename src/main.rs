use goal_keeper_api::{app, config, store, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, GOAL_KEEPER_DB, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Goal Keeper API in {:?} mode", config.environment);

    let pool = store::manager::connect().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app = app(AppState::postgres(pool));

    // Allow tests or deployments to override port via env
    let port = std::env::var("GOAL_KEEPER_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8080);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Goal Keeper API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
