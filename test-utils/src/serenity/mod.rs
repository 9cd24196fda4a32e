//! Serenity API objects built from JSON the way Discord would return them.
//!
//! ```rust,ignore
//! use test_utils::serenity::guild_roles;
//!
//! let roles = guild_roles(GuildId::new(4242), &[900, 901]);
//! ```

pub mod role;

pub use role::{guild_role, guild_roles};
