use thiserror::Error;

/// Failures of the account linking flow.
///
/// Each variant carries a message suitable for the person linking their
/// account; see [`VerificationError::user_message`].
#[derive(Error, Debug)]
pub enum VerificationError {
    /// The Discord user already has a Galtinn discord profile.
    #[error("Discord user is already linked to a Galtinn account")]
    AlreadyLinked,

    /// A live challenge already exists for the Discord user.
    #[error("A verification is already in progress for this Discord user")]
    VerificationInProgress,

    /// The callback `state` is unknown, already consumed or expired.
    #[error("Verification link is expired or invalid")]
    ExpiredOrInvalidLink,

    /// Exchanging the authorization code for a token failed.
    #[error("Token exchange with Galtinn failed: {reason}")]
    TokenExchangeFailed {
        /// Transport error, provider error response or status
        reason: String,
    },

    /// Fetching userinfo with the access token failed.
    #[error("Fetching userinfo from Galtinn failed: {reason}")]
    UserInfoFetchFailed {
        /// Transport error, status or decode failure
        reason: String,
    },

    /// The Discord user has no Galtinn discord profile to remove.
    #[error("Discord user is not linked to a Galtinn account")]
    NotLinked,
}

impl VerificationError {
    /// Norwegian message shown to the user in Discord or on the callback page.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::AlreadyLinked => "Du har allerede koblet Discord-brukeren din til Galtinn.",
            Self::VerificationInProgress => {
                "Du har allerede en aktiv verifiseringslenke. Prøv igjen om to minutter."
            }
            Self::ExpiredOrInvalidLink => {
                "Denne lenken er utløpt eller ugyldig! Prøv igjen fra start"
            }
            Self::TokenExchangeFailed { .. } => {
                "Kunne ikke hente nøkkel fra Galtinn. Kontakt din nærmeste EDB'er"
            }
            Self::UserInfoFetchFailed { .. } => {
                "Kunne ikke hente brukerinfo fra Galtinn. Kontakt din nærmeste EDB'er"
            }
            Self::NotLinked => "Discord-brukeren din er ikke koblet til Galtinn.",
        }
    }
}
