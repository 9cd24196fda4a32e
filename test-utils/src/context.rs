use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};

use crate::error::TestError;

/// Test environment holding an in-memory SQLite connection.
///
/// The connection is opened lazily on first access and lives as long as the
/// context, so every test gets an isolated database.
#[derive(Default)]
pub struct TestContext {
    /// Connection to the in-memory database, `None` until first use.
    pub db: Option<DatabaseConnection>,
}

impl TestContext {
    /// Creates an empty context without a connection.
    pub fn new() -> Self {
        Self { db: None }
    }

    /// Returns the database connection, opening it on first call.
    ///
    /// # Returns
    /// - `Ok(&DatabaseConnection)` - Connection to the in-memory database
    /// - `Err(TestError::Database)` - Failed to open the database
    pub async fn database(&mut self) -> Result<&DatabaseConnection, TestError> {
        match self.db {
            Some(ref db) => Ok(db),
            None => {
                let db = Database::connect("sqlite::memory:").await?;

                let db_ref = self.db.insert(db);

                Ok(&*db_ref)
            }
        }
    }

    /// Executes CREATE TABLE statements in order.
    ///
    /// Usually invoked by `TestBuilder::build()` rather than directly.
    ///
    /// # Arguments
    /// - `stmts` - Statements to execute
    ///
    /// # Returns
    /// - `Ok(())` - All tables created
    /// - `Err(TestError::Database)` - A statement failed
    pub async fn with_tables(&mut self, stmts: Vec<TableCreateStatement>) -> Result<(), TestError> {
        let db = self.database().await?;

        for stmt in stmts {
            db.execute(&stmt).await?;
        }

        Ok(())
    }
}
