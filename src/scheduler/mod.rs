//! Background jobs of the bot process.
//!
//! Jobs are registered at startup but only start once the Discord gateway
//! reports `ready`, see [`ready::ReadySignal`].

pub mod membership;
pub mod ready;
