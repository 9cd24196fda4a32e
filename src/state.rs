//! Shared state for the callback server and the Discord bot.
//!
//! Both structs are built once at startup and cloned into handlers, jobs and
//! listener tasks. Every field is cheap to clone:
//! - `DatabaseConnection` is a connection pool (clones share the pool)
//! - `reqwest::Client` and `GaltinnClient` share one connection pool internally
//! - `OAuth2Client` is designed to be cloned
//! - `VerificationService` and `ReadySignal` share their state through `Arc`

use oauth2::basic::{BasicErrorResponseType, BasicTokenType};
use oauth2::{
    Client, EmptyExtraTokenFields, EndpointNotSet, EndpointSet, RevocationErrorResponseType,
    StandardErrorResponse, StandardRevocableToken, StandardTokenIntrospectionResponse,
    StandardTokenResponse,
};
use sea_orm::DatabaseConnection;
use serenity::all::GuildId;
use std::sync::Arc;

use crate::{
    config::RoleConfig,
    event::AuthEventPublisher,
    scheduler::ready::ReadySignal,
    service::{galtinn::GaltinnClient, verification::VerificationService},
};

/// OAuth2 client for Galtinn with authorization and token endpoints set.
pub type OAuth2Client = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// State of the verification callback server.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,

    /// HTTP client with redirects disabled, used for token and userinfo calls.
    pub http_client: reqwest::Client,

    pub oauth_client: OAuth2Client,

    /// Base URL of the Galtinn API, used for the userinfo endpoint.
    pub galtinn_api_url: String,

    /// Announces completed links to the bot process.
    pub publisher: Arc<dyn AuthEventPublisher>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        http_client: reqwest::Client,
        oauth_client: OAuth2Client,
        galtinn_api_url: String,
        publisher: Arc<dyn AuthEventPublisher>,
    ) -> Self {
        Self {
            db,
            http_client,
            oauth_client,
            galtinn_api_url,
            publisher,
        }
    }
}

/// State of the Discord bot, shared by the event handler, the scheduled
/// jobs and the auth event listener.
#[derive(Clone)]
pub struct BotState {
    pub db: DatabaseConnection,
    pub galtinn: GaltinnClient,
    pub verification: VerificationService,
    pub roles: RoleConfig,

    /// The one guild the bot manages.
    pub guild_id: GuildId,

    /// Flipped by the gateway `ready` event; background work waits on it.
    pub ready: ReadySignal,
}
