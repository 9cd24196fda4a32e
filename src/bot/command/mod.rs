//! Slash commands registered in the managed guild.
//!
//! Each command module exposes `register()` building its definition, a
//! `parse()` turning the raw options into a subcommand enum and an
//! `execute()` producing the reply embed. Replies are always ephemeral.

pub mod galtinn;
pub mod galtinn_role;

use dioxus_logger::tracing;
use serenity::all::{
    CommandDataOption, CommandDataOptionValue, CommandInteraction, Context, CreateCommand,
    EditInteractionResponse,
};

use crate::{bot::embed, state::BotState};

/// Definitions of every command, for registration on `ready`.
pub fn commands() -> Vec<CreateCommand> {
    vec![galtinn::register(), galtinn_role::register()]
}

/// Runs an application command and edits the deferred reply with the result.
pub async fn dispatch(state: &BotState, ctx: &Context, command: &CommandInteraction) {
    if let Err(e) = command.defer_ephemeral(&ctx.http).await {
        tracing::error!("Failed to defer /{}: {}", command.data.name, e);
        return;
    }

    let user_id = command.user.id.get();
    let options = command.data.options.as_slice();

    let reply = match command.data.name.as_str() {
        galtinn::NAME => match galtinn::parse(options) {
            Some(sub) => galtinn::execute(state, &*ctx.http, user_id, sub).await,
            None => embed::fatal("Ukjent underkommando"),
        },
        galtinn_role::NAME => {
            let allowed = command
                .member
                .as_ref()
                .and_then(|member| member.permissions)
                .is_some_and(|permissions| permissions.manage_guild());

            match galtinn_role::parse(options) {
                Some(_) if !allowed => {
                    embed::warning("Du må ha tillatelsen «Administrer server» for dette")
                }
                Some(sub) => galtinn_role::execute(state, sub).await,
                None => embed::fatal("Ukjent underkommando"),
            }
        }
        other => {
            tracing::warn!("Received unknown command /{}", other);
            embed::fatal("Ukjent kommando")
        }
    };

    if let Err(e) = command
        .edit_response(&ctx.http, EditInteractionResponse::new().embed(reply))
        .await
    {
        tracing::error!("Failed to reply to /{}: {}", command.data.name, e);
    }
}

/// Name and nested options of the invoked subcommand.
fn subcommand(options: &[CommandDataOption]) -> Option<(&str, &[CommandDataOption])> {
    let option = options.first()?;

    match &option.value {
        CommandDataOptionValue::SubCommand(nested) => Some((option.name.as_str(), nested)),
        _ => None,
    }
}

/// Value of a named option within a subcommand.
fn option<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a CommandDataOptionValue> {
    options
        .iter()
        .find(|option| option.name == name)
        .map(|option| &option.value)
}
