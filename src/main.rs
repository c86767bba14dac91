use dotenvy::dotenv;
use log::info;
use solarleads::api_router::build_app;
use solarleads::config::AppConfig;
use solarleads::events::spawn_heartbeat;
use solarleads::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let state = AppState::initialize(config.clone()).await;
    spawn_heartbeat(state.events.clone(), config.heartbeat_secs);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "solarleads listening on {} (mock_mode={})",
        addr, config.mock_mode
    );
    axum::serve(listener, build_app(state)).await?;
    Ok(())
}
