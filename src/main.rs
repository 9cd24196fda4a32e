use dioxus_logger::tracing;
use galtinn_bot::{
    bot,
    config::Config,
    error::AppError,
    event::postgres::PgListenerSubscriber,
    scheduler::{membership::start_scheduler, ready::ReadySignal},
    service::{galtinn::GaltinnClient, verification::VerificationService},
    startup,
    state::BotState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    startup::init_logging(&config.log_level)?;

    let db = startup::connect_to_database(&config.database_url).await?;
    let http_client = startup::setup_reqwest_client()?;
    let oauth_client = startup::setup_oauth_client(&config.oauth)?;

    let galtinn = GaltinnClient::new(
        http_client,
        &config.oauth.api_url,
        config.galtinn_auth_token.clone(),
    );
    let verification = VerificationService::new(db.clone(), galtinn.clone(), oauth_client);

    let state = BotState {
        db: db.clone(),
        galtinn,
        verification,
        roles: config.roles.clone(),
        guild_id: config.guild_id,
        ready: ReadySignal::new(),
    };

    let subscriber = PgListenerSubscriber::connect(&db).await?;

    let (client, discord_http) = bot::start::init_bot(&config, state.clone()).await?;
    let shard_manager = client.shard_manager.clone();

    let mut scheduler = start_scheduler(
        state.clone(),
        discord_http.clone(),
        &config.membership_check_cron,
    )
    .await?;

    let listener = tokio::spawn(bot::listener::run(
        subscriber,
        state.clone(),
        discord_http,
    ));

    let mut bot_task = tokio::spawn(bot::start::start_bot(client));

    tracing::info!("Galtinn bot running for guild {}", config.guild_id);

    tokio::select! {
        _ = startup::shutdown_signal() => {}
        result = &mut bot_task => match result {
            Ok(Ok(())) => tracing::warn!("Discord bot stopped"),
            Ok(Err(e)) => tracing::error!("Discord bot error: {}", e),
            Err(e) => tracing::error!("Discord bot task failed: {}", e),
        },
    }

    shard_manager.shutdown_all().await;
    listener.abort();
    state.verification.shutdown().await;

    if let Err(e) = scheduler.shutdown().await {
        tracing::error!("Failed to shut down scheduler: {}", e);
    }

    tracing::info!("Galtinn bot stopped");

    Ok(())
}
