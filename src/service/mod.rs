//! Business logic for linking accounts and keeping Discord roles in sync.

pub mod callback;
pub mod galtinn;
pub mod membership;
pub mod role;
pub mod verification;
