//! Environment-based configuration for both binaries.
//!
//! Values are read once at startup after `dotenvy` has loaded `.env`.

use serenity::all::{GuildId, RoleId};

use crate::error::{config::ConfigError, AppError};

const DEFAULT_GALTINN_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_MEMBERSHIP_CHECK_CRON: &str = "0 0 0 * * *";
const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_LOG_LEVEL: &str = "info";

/// OAuth client registration at Galtinn, shared by the bot and the callback server.
#[derive(Clone, Debug)]
pub struct OAuthConfig {
    /// Base URL of the Galtinn API, without trailing slash.
    pub api_url: String,
    pub client_id: String,
    pub redirect_uri: String,
}

/// Roles granted from the membership flags of a Galtinn user.
#[derive(Clone, Debug)]
pub struct RoleConfig {
    pub member_role: RoleId,
    pub volunteer_role: RoleId,
}

/// Configuration of the Discord bot process.
pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,
    /// Guild whose members are synchronized and where commands are registered.
    pub guild_id: GuildId,
    pub oauth: OAuthConfig,
    /// Static bearer token for the Galtinn directory API.
    pub galtinn_auth_token: String,
    pub roles: RoleConfig,
    /// Six-field cron expression for the daily membership check.
    pub membership_check_cron: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            guild_id: GuildId::new(snowflake("DISCORD_GUILD_ID")?),
            oauth: OAuthConfig::from_env()?,
            galtinn_auth_token: required("GALTINN_AUTH_TOKEN")?,
            roles: RoleConfig {
                member_role: RoleId::new(snowflake("GALTINN_MEMBER_ROLE")?),
                volunteer_role: RoleId::new(snowflake("GALTINN_VOLUNTEER_ROLE")?),
            },
            membership_check_cron: optional("MEMBERSHIP_CHECK_CRON", DEFAULT_MEMBERSHIP_CHECK_CRON),
            log_level: optional("LOG_LEVEL", DEFAULT_LOG_LEVEL),
        })
    }
}

/// Configuration of the verification callback server.
pub struct ServerConfig {
    pub database_url: String,
    /// Socket address the HTTP listener binds to.
    pub server_address: String,
    pub oauth: OAuthConfig,
    pub log_level: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            server_address: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            oauth: OAuthConfig::from_env()?,
            log_level: optional("LOG_LEVEL", DEFAULT_LOG_LEVEL),
        })
    }
}

impl OAuthConfig {
    fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            api_url: optional("GALTINN_API_URL", DEFAULT_GALTINN_API_URL)
                .trim_end_matches('/')
                .to_string(),
            client_id: required("GALTINN_CLIENT_ID")?,
            redirect_uri: required("GALTINN_REDIRECT_URI")?,
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Reads a non-zero Discord snowflake.
fn snowflake(name: &str) -> Result<u64, ConfigError> {
    let value = required(name)?;

    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            reason: "snowflake must be non-zero".to_string(),
        }),
        Ok(id) => Ok(id),
        Err(e) => Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            reason: e.to_string(),
        }),
    }
}
