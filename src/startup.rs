//! Startup helpers shared by both binaries.

use dioxus_logger::tracing::{self, Level};
use oauth2::{basic::BasicClient, AuthUrl, ClientId, RedirectUrl, TokenUrl};
use sea_orm::DatabaseConnection;
use std::str::FromStr;
use tokio::signal;

use crate::{
    config::OAuthConfig,
    error::{config::ConfigError, AppError},
    state::OAuth2Client,
};

/// Initializes logging at the given level name (`error` through `trace`).
///
/// # Returns
/// - `Ok(())` - Logger installed
/// - `Err(ConfigError::InvalidEnvVar)` - Unknown level name
/// - `Err(AppError::InternalError)` - A logger was already installed
pub fn init_logging(level: &str) -> Result<(), AppError> {
    let level = Level::from_str(level).map_err(|e| ConfigError::InvalidEnvVar {
        name: "LOG_LEVEL".to_string(),
        reason: e.to_string(),
    })?;

    dioxus_logger::init(level).map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(())
}

/// Connects to the database and runs pending migrations.
///
/// # Arguments
/// - `database_url` - SeaORM connection string
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect or migrate
pub async fn connect_to_database(database_url: &str) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// HTTP client for Galtinn calls.
///
/// Redirects are not followed so a bearer token is never replayed to
/// another host.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(client)
}

/// Builds the Galtinn OAuth client from its registration.
///
/// The client is public (no secret); the token request authenticates with
/// `client_id` in the body and the PKCE verifier.
///
/// # Returns
/// - `Ok(OAuth2Client)` - Client with authorize, token and redirect URLs set
/// - `Err(ConfigError::InvalidEnvVar)` - API or redirect URL does not parse
pub fn setup_oauth_client(config: &OAuthConfig) -> Result<OAuth2Client, AppError> {
    let api_url = config.api_url.trim_end_matches('/');
    let invalid = |name: &str, e: url::ParseError| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        reason: e.to_string(),
    };

    let auth_url = AuthUrl::new(format!("{}/oauth/authorize/", api_url))
        .map_err(|e| invalid("GALTINN_API_URL", e))?;
    let token_url = TokenUrl::new(format!("{}/oauth/token/", api_url))
        .map_err(|e| invalid("GALTINN_API_URL", e))?;
    let redirect_url = RedirectUrl::new(config.redirect_uri.clone())
        .map_err(|e| invalid("GALTINN_REDIRECT_URI", e))?;

    let client = BasicClient::new(ClientId::new(config.client_id.clone()))
        .set_auth_uri(auth_url)
        .set_token_uri(token_url)
        .set_redirect_uri(redirect_url);

    Ok(client)
}

/// Waits for Ctrl+C or, on Unix, SIGTERM.
///
/// A handler that fails to install is logged and never completes, leaving the
/// other one in charge.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oauth_config(api_url: &str) -> OAuthConfig {
        OAuthConfig {
            api_url: api_url.to_string(),
            client_id: "bot-client".to_string(),
            redirect_uri: "https://verify.example.org/callback".to_string(),
        }
    }

    #[test]
    fn oauth_client_uses_galtinn_endpoints() {
        let client = setup_oauth_client(&oauth_config("https://galtinn.example.org/")).unwrap();

        assert_eq!(
            client.auth_uri().url().as_str(),
            "https://galtinn.example.org/oauth/authorize/"
        );
        assert_eq!(
            client.token_uri().url().as_str(),
            "https://galtinn.example.org/oauth/token/"
        );
    }

    #[test]
    fn rejects_unparseable_redirect_uri() {
        let mut config = oauth_config("https://galtinn.example.org");
        config.redirect_uri = "not a url".to_string();

        assert!(matches!(
            setup_oauth_client(&config),
            Err(AppError::ConfigErr(ConfigError::InvalidEnvVar { .. }))
        ));
    }

    #[test]
    fn rejects_unknown_log_level() {
        assert!(init_logging("loud").is_err());
    }
}
