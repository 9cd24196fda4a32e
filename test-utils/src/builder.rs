use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for test contexts backed by an in-memory SQLite database.
///
/// Register the entity tables a test needs, then call `build()` to connect and
/// create them.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::GaltinnVerification;
///
/// let test = TestBuilder::new()
///     .with_table(GaltinnVerification)
///     .build()
///     .await?;
/// ```
#[derive(Default)]
pub struct TestBuilder {
    /// CREATE TABLE statements executed in insertion order during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl TestBuilder {
    /// Creates a builder with no tables registered.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Registers an entity table.
    ///
    /// The statement is generated with the SQLite backend from the entity
    /// definition, so unique constraints declared on the entity are enforced
    /// in tests exactly as the migrations enforce them in production.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity to create a table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Registers both Galtinn tables.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let test = TestBuilder::new()
    ///     .with_galtinn_tables()
    ///     .build()
    ///     .await?;
    /// ```
    pub fn with_galtinn_tables(self) -> Self {
        self.with_table(GaltinnVerification).with_table(GaltinnRole)
    }

    /// Connects to a fresh in-memory database and creates the registered tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Context with database and tables ready
    /// - `Err(TestError::Database)` - Connection or table creation failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}
