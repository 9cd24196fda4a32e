//! Applies roles as soon as the callback server reports a completed link.

use dioxus_logger::tracing;
use std::{sync::Arc, time::Duration};

use crate::{
    event::{AuthCompleted, AuthEventSubscriber},
    service::{membership::MembershipSyncService, role::apply::RoleGateway},
    state::BotState,
};

/// Pause after a failed receive before trying again.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Consumes auth events until the subscription closes.
///
/// Waits for the bot to be ready first. Each payload is parsed once;
/// malformed payloads are logged and skipped. For a valid event the linked
/// user's roles are synced and any pending challenge timer is cancelled.
pub async fn run<S, G>(mut subscriber: S, state: BotState, gateway: Arc<G>)
where
    S: AuthEventSubscriber,
    G: RoleGateway + ?Sized,
{
    state.ready.wait().await;
    tracing::info!("Auth event listener started");

    loop {
        let payload = match subscriber.recv().await {
            Ok(Some(payload)) => payload,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to receive auth event: {}", e);
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
        };

        let event = match payload.parse::<AuthCompleted>() {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Skipping auth event: {}", e);
                continue;
            }
        };

        handle_auth_completed(&state, gateway.as_ref(), event).await;
    }

    tracing::info!("Auth event listener stopped");
}

async fn handle_auth_completed<G: RoleGateway + ?Sized>(
    state: &BotState,
    gateway: &G,
    event: AuthCompleted,
) {
    tracing::info!(
        "Discord user {} linked to Galtinn user {}",
        event.discord_id,
        event.external_id
    );

    if let Err(e) = state.verification.cancel(event.discord_id).await {
        tracing::warn!(
            "Failed to clear verification for {}: {}",
            event.discord_id,
            e
        );
    }

    let sync = MembershipSyncService::new(
        &state.db,
        &state.galtinn,
        gateway,
        &state.roles,
        state.guild_id,
    );

    match sync
        .sync_linked_user(event.discord_id, event.external_id)
        .await
    {
        Ok(true) => {}
        Ok(false) => tracing::warn!("Some roles failed to apply for {}", event.discord_id),
        Err(e) => tracing::error!(
            "Failed to sync roles for {} after linking: {}",
            event.discord_id,
            e
        ),
    }
}
