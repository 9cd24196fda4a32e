//! Domain models and operation parameters.

pub mod galtinn;
pub mod role;
pub mod verification;
