//! HTTP handlers for the verification callback server.

pub mod callback;
pub mod page;
