//! `/galtinn` - linking, unlinking and syncing your own account.

use dioxus_logger::tracing;
use serenity::all::{
    CommandDataOption, CommandOptionType, CreateCommand, CreateCommandOption, CreateEmbed,
};

use crate::{
    bot::{command::subcommand, embed},
    error::AppError,
    service::{membership::MembershipSyncService, role::apply::RoleGateway},
    state::BotState,
};

pub const NAME: &str = "galtinn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaltinnCommand {
    /// `registrer` - start linking
    Register,
    /// `slett` - remove the link and Galtinn roles
    Unregister,
    /// `synk` - apply roles now
    Sync,
}

pub fn register() -> CreateCommand {
    CreateCommand::new(NAME)
        .description("Koble Galtinnbrukeren din til Discord")
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "registrer",
            "Koble Galtinnbrukeren din til Discord",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "slett",
            "Fjern koblingen mellom Galtinnbrukeren din og Discord",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "synk",
            "Oppdater rollene dine fra Galtinn",
        ))
}

pub fn parse(options: &[CommandDataOption]) -> Option<GaltinnCommand> {
    let (name, _) = subcommand(options)?;

    match name {
        "registrer" => Some(GaltinnCommand::Register),
        "slett" => Some(GaltinnCommand::Unregister),
        "synk" => Some(GaltinnCommand::Sync),
        _ => None,
    }
}

/// Runs a `/galtinn` subcommand for `user_id`.
pub async fn execute<G: RoleGateway + ?Sized>(
    state: &BotState,
    gateway: &G,
    user_id: u64,
    command: GaltinnCommand,
) -> CreateEmbed {
    let sync = MembershipSyncService::new(
        &state.db,
        &state.galtinn,
        gateway,
        &state.roles,
        state.guild_id,
    );

    let result = match command {
        GaltinnCommand::Register => state
            .verification
            .begin(user_id)
            .await
            .map(|url| embed::verification_link(&url)),
        GaltinnCommand::Unregister => sync.unlink(user_id).await.map(|complete| {
            tracing::info!("Discord user {} removed their Galtinn link", user_id);

            if complete {
                embed::success("Du har slettet tilkoblingen til Galtinnbrukeren din!")
            } else {
                embed::warning("Koblingen er slettet, men noen roller kunne ikke fjernes.")
            }
        }),
        GaltinnCommand::Sync => sync.sync_discord_user(user_id).await.map(|complete| {
            if complete {
                embed::success("Rollene dine er oppdatert!")
            } else {
                embed::warning("Noen roller kunne ikke oppdateres. Prøv igjen senere.")
            }
        }),
    };

    result.unwrap_or_else(|e| reply_error(user_id, command, &e))
}

fn reply_error(user_id: u64, command: GaltinnCommand, err: &AppError) -> CreateEmbed {
    match err {
        AppError::VerificationErr(_) => {
            tracing::debug!("/galtinn {:?} refused for {}: {}", command, user_id, err)
        }
        _ => tracing::error!("/galtinn {:?} failed for {}: {}", command, user_id, err),
    }

    embed::from_error(err)
}
