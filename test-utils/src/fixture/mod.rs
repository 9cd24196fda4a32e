//! In-memory test data that is never inserted into the database.
//!
//! Galtinn fixtures produce JSON documents shaped like the directory API's
//! responses, ready to be served by [`crate::galtinn::MockGaltinn`].

pub mod galtinn;
