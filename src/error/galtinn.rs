use thiserror::Error;

/// Failures talking to the Galtinn directory API.
#[derive(Error, Debug)]
pub enum GaltinnError {
    /// The requested resource does not exist.
    #[error("Galtinn resource not found: {url}")]
    NotFound {
        /// URL that answered 404
        url: String,
    },

    /// Galtinn answered with an unexpected status.
    ///
    /// A paginated fetch that hits this aborts the whole run; partial
    /// results are never returned.
    #[error("Galtinn request to {url} failed with status {status}")]
    FetchFailed {
        /// HTTP status code
        status: u16,
        /// URL of the failing page
        url: String,
    },

    /// A `next` link pointed away from the configured API origin.
    #[error("Galtinn returned a next link outside the API origin: {0}")]
    ForeignNextLink(String),

    /// A URL could not be built or parsed.
    #[error("Invalid Galtinn URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Connection, timeout or other transport failure.
    #[error("Galtinn request failed: {0}")]
    Transient(#[from] reqwest::Error),

    /// Response body did not match the expected document shape.
    #[error("Failed to decode Galtinn response from {url}: {source}")]
    Decode {
        /// URL of the response
        url: String,
        /// Underlying decode error
        #[source]
        source: reqwest::Error,
    },
}
