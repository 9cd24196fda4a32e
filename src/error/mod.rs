//! Error types and HTTP response handling.
//!
//! `AppError` is the top-level error for both binaries. It wraps the domain
//! errors and implements `IntoResponse` so callback handlers can return it
//! directly; failures render the HTML error page instead of leaking details.

pub mod config;
pub mod event;
pub mod galtinn;
pub mod sync;
pub mod verification;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dioxus_logger::tracing;
use thiserror::Error;

use crate::{
    controller::page,
    error::{
        config::ConfigError, event::EventError, galtinn::GaltinnError, sync::SyncError,
        verification::VerificationError,
    },
};

/// Generic message for failures the user cannot act on.
const INTERNAL_ERROR_MESSAGE: &str = "Noe gikk galt. Kontakt din nærmeste EDB'er";

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Account linking failure.
    ///
    /// Mapped to 400 for invalid links and 502 for provider failures.
    #[error(transparent)]
    VerificationErr(#[from] VerificationError),

    /// Galtinn directory API failure.
    #[error(transparent)]
    GaltinnErr(#[from] GaltinnError),

    /// Discord role application failure.
    #[error(transparent)]
    SyncErr(#[from] SyncError),

    /// Malformed cross-process event.
    #[error(transparent)]
    EventErr(#[from] EventError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// SQLx driver error, raised by the LISTEN/NOTIFY channel.
    #[error(transparent)]
    SqlxErr(#[from] sea_orm::SqlxError),

    /// HTTP client request error from reqwest.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Socket bind or serve failure.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// Internal error with custom message.
    ///
    /// The message is logged; a generic message is returned to the client.
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Message shown to a Discord user when a command fails with this error.
    ///
    /// Verification errors carry their own wording; everything else is
    /// logged and reported generically.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::VerificationErr(err) => err.user_message(),
            Self::GaltinnErr(_) => "Klarte ikke å nå Galtinn akkurat nå. Prøv igjen senere.",
            _ => INTERNAL_ERROR_MESSAGE,
        }
    }
}

/// Converts application errors into HTML error pages.
///
/// # Returns
/// - 400 Bad Request - Expired or invalid verification link
/// - 502 Bad Gateway - Token exchange or userinfo failure at Galtinn
/// - 500 Internal Server Error - Everything else, with details only logged
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::VerificationErr(err) => {
                let status = match err {
                    VerificationError::TokenExchangeFailed { .. }
                    | VerificationError::UserInfoFetchFailed { .. } => {
                        tracing::warn!("Verification callback failed: {}", err);
                        StatusCode::BAD_GATEWAY
                    }
                    _ => StatusCode::BAD_REQUEST,
                };

                (status, page::error_page(err.user_message())).into_response()
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    page::error_page(INTERNAL_ERROR_MESSAGE),
                )
                    .into_response()
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the full error and renders the generic error page.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            page::error_page(INTERNAL_ERROR_MESSAGE),
        )
            .into_response()
    }
}
