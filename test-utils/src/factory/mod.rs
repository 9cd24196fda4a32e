//! Factory methods for inserting test rows with sensible defaults.
//!
//! Each table has a `Factory` builder for customization and `create_*`
//! convenience functions for the common cases.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let pending = factory::verification::create_verification(&db).await?;
//! let stale = factory::verification::create_expired_verification(&db).await?;
//! let mapping = factory::galtinn_role::create_role_mapping(&db, "1001", "42").await?;
//! ```

pub mod galtinn_role;
pub mod helpers;
pub mod verification;

pub use galtinn_role::create_role_mapping;
pub use verification::{create_expired_verification, create_verification};
