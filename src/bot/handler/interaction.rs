use dioxus_logger::tracing;
use serenity::all::{Context, Interaction};

use crate::{bot::command, state::BotState};

/// Routes slash commands from the managed guild to their handlers.
pub async fn handle_interaction(state: &BotState, ctx: Context, interaction: Interaction) {
    let Interaction::Command(command) = interaction else {
        return;
    };

    if command.guild_id != Some(state.guild_id) {
        tracing::debug!(
            "Ignoring /{} from outside guild {}",
            command.data.name,
            state.guild_id
        );
        return;
    }

    command::dispatch(state, &ctx, &command).await;
}
