//! In-process auth event bus backed by a tokio channel.

use serenity::async_trait;
use tokio::sync::mpsc;

use crate::{
    error::AppError,
    event::{AuthCompleted, AuthEventPublisher, AuthEventSubscriber},
};

const CHANNEL_CAPACITY: usize = 64;

/// Creates a connected publisher/subscriber pair.
///
/// The subscriber sees the channel as closed once every publisher is dropped.
pub fn channel() -> (MemoryPublisher, MemorySubscriber) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    (MemoryPublisher { tx }, MemorySubscriber { rx })
}

#[derive(Clone)]
pub struct MemoryPublisher {
    tx: mpsc::Sender<String>,
}

impl MemoryPublisher {
    /// Sends an arbitrary payload, including malformed ones.
    pub async fn publish_raw(&self, payload: impl Into<String>) -> Result<(), AppError> {
        self.tx
            .send(payload.into())
            .await
            .map_err(|_| AppError::InternalError("auth event channel closed".to_string()))
    }
}

#[async_trait]
impl AuthEventPublisher for MemoryPublisher {
    async fn publish(&self, event: &AuthCompleted) -> Result<(), AppError> {
        self.publish_raw(event.to_payload()).await
    }
}

pub struct MemorySubscriber {
    rx: mpsc::Receiver<String>,
}

#[async_trait]
impl AuthEventSubscriber for MemorySubscriber {
    async fn recv(&mut self) -> Result<Option<String>, AppError> {
        Ok(self.rx.recv().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_payloads_in_order_then_closes() -> Result<(), AppError> {
        let (publisher, mut subscriber) = channel();

        publisher
            .publish(&AuthCompleted {
                discord_id: 1,
                external_id: 2,
            })
            .await?;
        publisher.publish_raw("garbage").await?;
        drop(publisher);

        assert_eq!(subscriber.recv().await?, Some("1 2".to_string()));
        assert_eq!(subscriber.recv().await?, Some("garbage".to_string()));
        assert_eq!(subscriber.recv().await?, None);

        Ok(())
    }
}
