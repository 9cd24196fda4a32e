//! Discord bot: gateway handler, slash commands and the auth event listener.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Guild and role availability
//! - `GUILD_MEMBERS` - Member lookups for role synchronization (privileged intent)
//!
//! `GUILD_MEMBERS` must be enabled in the Discord Developer Portal for the
//! bot application.

pub mod command;
pub mod embed;
pub mod handler;
pub mod listener;
pub mod start;
