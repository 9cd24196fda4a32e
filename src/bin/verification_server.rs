use dioxus_logger::tracing;
use galtinn_bot::{
    config::ServerConfig, error::AppError, event::postgres::PgNotifyPublisher, router, startup,
    state::AppState,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env()?;
    startup::init_logging(&config.log_level)?;

    let db = startup::connect_to_database(&config.database_url).await?;
    let http_client = startup::setup_reqwest_client()?;
    let oauth_client = startup::setup_oauth_client(&config.oauth)?;
    let publisher = Arc::new(PgNotifyPublisher::new(&db)?);

    let state = AppState::new(
        db,
        http_client,
        oauth_client,
        config.oauth.api_url.clone(),
        publisher,
    );

    let listener = TcpListener::bind(&config.server_address).await?;
    tracing::info!("Verification server listening on {}", config.server_address);

    axum::serve(listener, router::router().with_state(state))
        .with_graceful_shutdown(startup::shutdown_signal())
        .await?;

    Ok(())
}
