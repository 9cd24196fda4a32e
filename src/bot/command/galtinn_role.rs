//! `/galtinnrolle` - mapping Discord roles to Galtinn organizations.
//!
//! Requires Manage Server. Mapped roles are granted to members of the
//! organization on the next sync and stripped from everyone else.

use dioxus_logger::tracing;
use serenity::all::{
    CommandDataOption, CommandDataOptionValue, CommandOptionType, CreateCommand,
    CreateCommandOption, CreateEmbed, Permissions, RoleId,
};

use crate::{
    bot::{
        command::{option, subcommand},
        embed,
    },
    data::galtinn_role::GaltinnRoleRepository,
    error::AppError,
    state::BotState,
};

pub const NAME: &str = "galtinnrolle";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GaltinnRoleCommand {
    /// `leggtil <org_id> <rolle>`
    Add { org_id: String, role_id: RoleId },
    /// `fjern <rolle>`
    Remove { role_id: RoleId },
    /// `liste`
    List,
}

pub fn register() -> CreateCommand {
    let role_option = || {
        CreateCommandOption::new(CommandOptionType::Role, "rolle", "Discord-rollen").required(true)
    };

    CreateCommand::new(NAME)
        .description("Administrer roller knyttet til foreninger i Galtinn")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "leggtil",
                "Legg til en rolle som tilsvarer en Galtinnforening",
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "org_id",
                    "Id-en til foreningen i Galtinn",
                )
                .required(true),
            )
            .add_sub_option(role_option()),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "fjern",
                "Fjern en rolle som tilsvarer en Galtinnforening",
            )
            .add_sub_option(role_option()),
        )
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "liste",
            "Liste over roller knyttet til Galtinnforeninger",
        ))
}

pub fn parse(options: &[CommandDataOption]) -> Option<GaltinnRoleCommand> {
    let (name, nested) = subcommand(options)?;

    let role_id = || match option(nested, "rolle") {
        Some(CommandDataOptionValue::Role(role_id)) => Some(*role_id),
        _ => None,
    };

    match name {
        "leggtil" => {
            let org_id = match option(nested, "org_id") {
                Some(CommandDataOptionValue::String(org_id)) => org_id.trim().to_string(),
                _ => return None,
            };

            Some(GaltinnRoleCommand::Add {
                org_id,
                role_id: role_id()?,
            })
        }
        "fjern" => Some(GaltinnRoleCommand::Remove {
            role_id: role_id()?,
        }),
        "liste" => Some(GaltinnRoleCommand::List),
        _ => None,
    }
}

/// Runs a `/galtinnrolle` subcommand.
pub async fn execute(state: &BotState, command: GaltinnRoleCommand) -> CreateEmbed {
    match run(state, command).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("/galtinnrolle failed: {}", e);
            embed::from_error(&e)
        }
    }
}

async fn run(state: &BotState, command: GaltinnRoleCommand) -> Result<CreateEmbed, AppError> {
    let repo = GaltinnRoleRepository::new(&state.db);

    let reply = match command {
        GaltinnRoleCommand::Add { org_id, .. } if org_id.is_empty() => {
            embed::warning("Id-en til foreningen kan ikke være tom")
        }
        GaltinnRoleCommand::Add { org_id, role_id } => {
            let mapping = repo.upsert(role_id.get(), &org_id).await?;
            tracing::info!(
                "Mapped role {} to Galtinn organization {}",
                mapping.discord_role_id,
                mapping.galtinn_org_id
            );

            embed::success(&format!(
                "Rollen <@&{}> ble lagt til for organisasjonen med id {}",
                mapping.discord_role_id, mapping.galtinn_org_id
            ))
        }
        GaltinnRoleCommand::Remove { role_id } => {
            if repo.delete(role_id.get()).await? {
                tracing::info!("Removed Galtinn mapping for role {}", role_id);
                embed::success("Rollekobling fjernet!")
            } else {
                embed::warning(&format!("Rollen <@&{}> er ikke knyttet til Galtinn", role_id))
            }
        }
        GaltinnRoleCommand::List => {
            let mappings = repo.get_all().await?;
            if mappings.is_empty() {
                embed::warning("Ingen roller tilknyttet Galtinn")
            } else {
                let lines: Vec<String> = mappings
                    .iter()
                    .map(|m| format!("<@&{}> - `{}`", m.discord_role_id, m.galtinn_org_id))
                    .collect();

                CreateEmbed::new()
                    .title("Roller tilknyttet Galtinn")
                    .description(lines.join("\n"))
            }
        }
    };

    Ok(reply)
}
