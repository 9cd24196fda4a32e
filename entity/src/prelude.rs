pub use super::galtinn_role::Entity as GaltinnRole;
pub use super::galtinn_verification::Entity as GaltinnVerification;
