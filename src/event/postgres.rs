//! PostgreSQL `NOTIFY`/`LISTEN` transport for auth events.

use dioxus_logger::tracing;
use sea_orm::{
    sqlx::postgres::{PgListener, PgPool},
    ConnectionTrait, DatabaseConnection, DbBackend,
};
use serenity::async_trait;

use crate::{
    error::{config::ConfigError, AppError},
    event::{AuthCompleted, AuthEventPublisher, AuthEventSubscriber, AUTH_COMPLETE_CHANNEL},
};

/// Pool behind `db`, which must be a PostgreSQL connection.
///
/// `NOTIFY`/`LISTEN` has no equivalent on other backends, so any other
/// `DATABASE_URL` is rejected as a configuration error.
fn postgres_pool(db: &DatabaseConnection) -> Result<&PgPool, ConfigError> {
    match db.get_database_backend() {
        DbBackend::Postgres => Ok(db.get_postgres_connection_pool()),
        backend => Err(ConfigError::InvalidEnvVar {
            name: "DATABASE_URL".to_string(),
            reason: format!("auth events need PostgreSQL, got {:?}", backend),
        }),
    }
}

/// Publishes events with `pg_notify`, binding channel and payload as parameters.
pub struct PgNotifyPublisher {
    pool: PgPool,
}

impl PgNotifyPublisher {
    /// Uses the pool behind a Postgres SeaORM connection.
    ///
    /// # Returns
    /// - `Ok(PgNotifyPublisher)` - Publisher sharing the connection pool
    /// - `Err(AppError::ConfigErr)` - `db` is not a PostgreSQL connection
    pub fn new(db: &DatabaseConnection) -> Result<Self, AppError> {
        Ok(Self {
            pool: postgres_pool(db)?.clone(),
        })
    }
}

#[async_trait]
impl AuthEventPublisher for PgNotifyPublisher {
    async fn publish(&self, event: &AuthCompleted) -> Result<(), AppError> {
        sea_orm::sqlx::query("SELECT pg_notify($1, $2)")
            .bind(AUTH_COMPLETE_CHANNEL)
            .bind(event.to_payload())
            .execute(&self.pool)
            .await?;

        tracing::debug!("Published auth event {}", event);

        Ok(())
    }
}

/// Dedicated `LISTEN` connection on the auth channel.
///
/// The underlying listener reconnects on its own after a dropped connection;
/// notifications sent while disconnected are lost and picked up by the next
/// daily membership check instead.
pub struct PgListenerSubscriber {
    listener: PgListener,
}

impl PgListenerSubscriber {
    /// Opens a listener connection and subscribes to the auth channel.
    pub async fn connect(db: &DatabaseConnection) -> Result<Self, AppError> {
        let mut listener = PgListener::connect_with(postgres_pool(db)?).await?;
        listener.listen(AUTH_COMPLETE_CHANNEL).await?;

        tracing::info!("Listening for auth events on {}", AUTH_COMPLETE_CHANNEL);

        Ok(Self { listener })
    }
}

#[async_trait]
impl AuthEventSubscriber for PgListenerSubscriber {
    async fn recv(&mut self) -> Result<Option<String>, AppError> {
        let notification = self.listener.recv().await?;

        Ok(Some(notification.payload().to_string()))
    }
}
