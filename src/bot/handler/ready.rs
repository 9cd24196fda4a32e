//! Ready event handler for bot initialization.
//!
//! Registers the slash commands in the managed guild and raises the ready
//! signal that starts the scheduled jobs and the auth event listener.

use dioxus_logger::tracing;
use serenity::all::{ActivityData, Context, Ready};

use crate::{bot::command, state::BotState};

/// Handles the ready event when the bot connects to Discord.
///
/// Fires again after a reconnect; command registration overwrites the
/// previous set and the ready signal stays raised.
///
/// # Arguments
/// - `state` - Bot state holding the guild id and ready signal
/// - `ctx` - Discord context for registration and activity status
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &BotState, ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    ctx.set_activity(Some(ActivityData::custom("Holder styr på Galtinn")));

    match state
        .guild_id
        .set_commands(&ctx.http, command::commands())
        .await
    {
        Ok(commands) => tracing::info!(
            "Registered {} commands in guild {}",
            commands.len(),
            state.guild_id
        ),
        Err(e) => tracing::error!(
            "Failed to register commands in guild {}: {}",
            state.guild_id,
            e
        ),
    }

    state.ready.mark_ready();
}
