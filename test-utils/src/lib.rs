//! Galtinn Bot Test Utils
//!
//! Shared testing utilities for the bot and the verification server:
//! - **TestBuilder** / **TestContext**: in-memory SQLite databases with entity tables
//! - **factory**: inserts verification rows and role mappings
//! - **fixture**: Galtinn API JSON documents
//! - **galtinn**: a mock Galtinn server bound to a loopback port
//! - **serenity**: Serenity objects built from JSON
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::GaltinnVerification;
//!
//! #[tokio::test]
//! async fn test_verification() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(GaltinnVerification)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod fixture;
pub mod galtinn;
pub mod serenity;
