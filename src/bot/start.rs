use serenity::all::{Client, GatewayIntents};
use serenity::http::Http;
use std::sync::Arc;

use crate::{bot::handler::Handler, config::Config, error::AppError, state::BotState};

/// Builds the Discord client and extracts its HTTP client.
///
/// The HTTP client is shared with the scheduler and the auth event listener
/// so role changes reuse the bot's rate limiter.
///
/// # Arguments
/// - `config` - Bot configuration holding the token
/// - `state` - State handed to the event handler
///
/// # Returns
/// - `Ok((Client, Arc<Http>))` - Client ready to start and its HTTP client
/// - `Err(AppError::DiscordErr)` - Client construction failed
pub async fn init_bot(config: &Config, state: BotState) -> Result<(Client, Arc<Http>), AppError> {
    // GUILD_MEMBERS is a privileged intent - must be enabled in Discord Developer Portal
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;

    let client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(Handler::new(state))
        .await?;

    let http = client.http.clone();

    Ok((client, http))
}

/// Runs the gateway connection until it fails or the shards are shut down.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    dioxus_logger::tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
