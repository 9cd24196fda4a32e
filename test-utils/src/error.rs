use thiserror::Error;

/// Errors raised while setting up a test environment.
#[derive(Error, Debug)]
pub enum TestError {
    /// Opening the in-memory database or creating a table failed.
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    /// Binding or serving a mock HTTP server failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
