//! SeaORM entity models for the Galtinn bot database.
//!
//! Both tables are keyed by Discord snowflakes stored as strings.

pub mod galtinn_role;
pub mod galtinn_verification;
pub mod prelude;
