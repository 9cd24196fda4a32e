//! Membership synchronization between Galtinn and Discord roles.
//!
//! `MembershipSyncService` drives the daily check over every Galtinn user,
//! one-off syncs after a completed link or a `/galtinn synk`, and role
//! stripping when an account is unlinked.

use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;
use serenity::all::{GuildId, RoleId, UserId};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use crate::{
    config::RoleConfig,
    data::galtinn_role::GaltinnRoleRepository,
    error::{
        galtinn::GaltinnError, sync::SyncError, verification::VerificationError, AppError,
    },
    model::galtinn::{MembershipRecord, ProfileFilter, UserFilter},
    service::{
        galtinn::GaltinnClient,
        role::{
            apply::{RoleApplier, RoleGateway},
            reconcile::{reconcile, ReconcileContext},
        },
    },
};

/// Pause between members during the daily run, keeping clear of Discord rate limits.
pub const DEFAULT_PACING: Duration = Duration::from_millis(500);

/// Outcome counts of a full membership run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    /// Members whose roles were fully reconciled.
    pub synced: usize,
    /// Members where at least one role change failed.
    pub failed: usize,
    /// Linked users not found in the guild.
    pub skipped: usize,
    /// Records without a Discord link.
    pub unlinked: usize,
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} synced, {} failed, {} not in guild, {} unlinked",
            self.synced, self.failed, self.skipped, self.unlinked
        )
    }
}

/// Reconciled role state for a guild, loaded once per operation.
struct SyncPlan {
    ctx: ReconcileContext,
    known_roles: HashSet<RoleId>,
}

pub struct MembershipSyncService<'a, G: RoleGateway + ?Sized> {
    db: &'a DatabaseConnection,
    galtinn: &'a GaltinnClient,
    gateway: &'a G,
    roles: &'a RoleConfig,
    guild_id: GuildId,
    pacing: Duration,
}

impl<'a, G: RoleGateway + ?Sized> MembershipSyncService<'a, G> {
    pub fn new(
        db: &'a DatabaseConnection,
        galtinn: &'a GaltinnClient,
        gateway: &'a G,
        roles: &'a RoleConfig,
        guild_id: GuildId,
    ) -> Self {
        Self {
            db,
            galtinn,
            gateway,
            roles,
            guild_id,
            pacing: DEFAULT_PACING,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Loads role mappings and the set of roles the bot manages.
    ///
    /// Known roles are the group profile roles from Galtinn plus the member,
    /// volunteer and mapped roles.
    async fn plan(&self) -> Result<SyncPlan, AppError> {
        let mappings = GaltinnRoleRepository::new(self.db).get_all().await?;
        let ctx = ReconcileContext::new(self.roles, &mappings);

        let mut known_roles = self.galtinn.fetch_all_roles().await?;
        known_roles.extend(ctx.managed_roles());

        Ok(SyncPlan { ctx, known_roles })
    }

    /// Reconciles and applies roles for one member.
    ///
    /// # Returns
    /// - `Ok(true)` - Member is in sync
    /// - `Ok(false)` - Some role change failed
    /// - `Err(SyncError::MemberUnresolvable)` - Member not in the guild
    async fn sync_member(
        &self,
        applier: &RoleApplier<'_, G>,
        plan: &SyncPlan,
        discord_id: u64,
        record: &MembershipRecord,
    ) -> Result<bool, SyncError> {
        let user_id = UserId::new(discord_id);
        let current = applier.member_roles(user_id).await?;

        let delta = reconcile(record, &plan.known_roles, &plan.ctx).against(&current);
        if delta.is_empty() {
            return Ok(true);
        }

        tracing::info!(
            "Updating roles for {} (galtinn user {}): +{} -{}",
            discord_id,
            record.id,
            delta.add.len(),
            delta.remove.len()
        );

        Ok(applier.apply(user_id, &delta).await)
    }

    /// Runs the membership check over every Galtinn user.
    ///
    /// Aborts before touching any member if the guild cannot be resolved or
    /// the user listing cannot be fetched completely. Members missing from the
    /// guild are skipped; a failed role change is counted and the run moves on.
    ///
    /// # Returns
    /// - `Ok(SyncSummary)` - Counts for the run
    /// - `Err(AppError)` - Guild, database or Galtinn failure aborting the run
    pub async fn sync_all(&self) -> Result<SyncSummary, AppError> {
        let applier = RoleApplier::resolve(self.gateway, self.guild_id).await?;
        let plan = self.plan().await?;
        let records = self.galtinn.fetch_users(&UserFilter::default()).await?;

        tracing::info!("Checking membership for {} Galtinn users", records.len());

        let mut summary = SyncSummary::default();
        for record in &records {
            let Some(discord_id) = record.discord_id() else {
                summary.unlinked += 1;
                continue;
            };

            match self.sync_member(&applier, &plan, discord_id, record).await {
                Ok(true) => summary.synced += 1,
                Ok(false) => summary.failed += 1,
                Err(e) => {
                    tracing::warn!("Skipping member: {}", e);
                    summary.skipped += 1;
                }
            }

            // Every linked record costs at least one member lookup.
            tokio::time::sleep(self.pacing).await;
        }

        tracing::info!("Membership check finished: {}", summary);

        Ok(summary)
    }

    /// Syncs a Discord user by looking up their linked Galtinn record.
    ///
    /// # Returns
    /// - `Ok(bool)` - Whether every role change succeeded
    /// - `Err(VerificationError::NotLinked)` - No Galtinn user links this account
    pub async fn sync_discord_user(&self, discord_id: u64) -> Result<bool, AppError> {
        let record = self
            .galtinn
            .fetch_users(&UserFilter::by_discord_id(discord_id))
            .await?
            .into_iter()
            .next()
            .ok_or(VerificationError::NotLinked)?;

        self.sync_one(discord_id, &record).await
    }

    /// Syncs a freshly linked user, identified by both ids.
    pub async fn sync_linked_user(
        &self,
        discord_id: u64,
        external_id: u64,
    ) -> Result<bool, AppError> {
        let record = self.galtinn.fetch_user(external_id).await?;

        self.sync_one(discord_id, &record).await
    }

    /// Deletes the user's Galtinn discord profiles and strips managed roles.
    ///
    /// # Returns
    /// - `Ok(bool)` - Whether every role removal succeeded
    /// - `Err(VerificationError::NotLinked)` - The account was not linked
    pub async fn unlink(&self, discord_id: u64) -> Result<bool, AppError> {
        let profiles = self
            .galtinn
            .fetch_discord_profiles(&ProfileFilter::by_discord_id(discord_id))
            .await?;
        if profiles.is_empty() {
            return Err(VerificationError::NotLinked.into());
        }

        for profile in &profiles {
            match self.galtinn.delete_discord_profile(profile.id).await {
                Ok(()) => tracing::info!(
                    "Deleted Galtinn discord profile {} for {}",
                    profile.id,
                    discord_id
                ),
                Err(GaltinnError::NotFound { .. }) => {
                    tracing::debug!("Discord profile {} was already deleted", profile.id)
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.sync_one(discord_id, &MembershipRecord::default()).await
    }

    async fn sync_one(&self, discord_id: u64, record: &MembershipRecord) -> Result<bool, AppError> {
        let applier = RoleApplier::resolve(self.gateway, self.guild_id).await?;
        let plan = self.plan().await?;

        Ok(self.sync_member(&applier, &plan, discord_id, record).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::role::fake::FakeGateway;
    use test_utils::{builder::TestBuilder, factory, fixture, galtinn::MockGaltinn};

    const MEMBER: u64 = 900;
    const VOLUNTEER: u64 = 901;

    fn role_config() -> RoleConfig {
        RoleConfig {
            member_role: RoleId::new(MEMBER),
            volunteer_role: RoleId::new(VOLUNTEER),
        }
    }

    fn client(galtinn: &MockGaltinn) -> GaltinnClient {
        GaltinnClient::new(reqwest::Client::new(), &galtinn.url, "t".to_string())
    }

    /// Tests a full run over linked, unlinked and absent users.
    ///
    /// Expected: present members reconciled, absent member skipped, unlinked counted
    #[tokio::test]
    async fn syncs_every_linked_member() -> Result<(), AppError> {
        let test = TestBuilder::new().with_galtinn_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        factory::create_role_mapping(db, "2001", "10").await?;

        let galtinn = MockGaltinn::start().await.unwrap();
        galtinn.set_page_size(2);
        galtinn.set_groups(vec![
            fixture::galtinn::group(10, "a", &[1001]),
            fixture::galtinn::group(11, "b", &[1002]),
        ]);
        galtinn.set_users(vec![
            fixture::galtinn::user(1)
                .discord_id(501)
                .member(true)
                .group(fixture::galtinn::group(10, "a", &[1001]))
                .build(),
            fixture::galtinn::user(2).discord_id(502).build(),
            fixture::galtinn::user(3).discord_id(503).member(true).build(),
            fixture::galtinn::user(4).build(),
        ]);

        let gateway = FakeGateway::with_roles(&[MEMBER, VOLUNTEER, 1001, 1002, 2001]);
        gateway.add_member(501, &[1002]);
        gateway.add_member(502, &[MEMBER, 1001, 7777]);

        let galtinn_client = client(&galtinn);
        let roles = role_config();
        let service = MembershipSyncService::new(
            db,
            &galtinn_client,
            &gateway,
            &roles,
            FakeGateway::GUILD,
        )
        .with_pacing(Duration::ZERO);

        let summary = service.sync_all().await?;

        assert_eq!(
            summary,
            SyncSummary {
                synced: 2,
                failed: 0,
                skipped: 1,
                unlinked: 1,
            }
        );
        assert_eq!(gateway.member_role_ids(501), vec![MEMBER, 1001, 2001]);
        assert_eq!(gateway.member_role_ids(502), vec![7777]);

        Ok(())
    }

    /// Tests that members missing from the guild are paced like the rest.
    ///
    /// Expected: both skipped, and the run takes at least two pacing intervals
    #[tokio::test]
    async fn paces_skipped_members() -> Result<(), AppError> {
        let test = TestBuilder::new().with_galtinn_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let galtinn = MockGaltinn::start().await.unwrap();
        galtinn.set_users(vec![
            fixture::galtinn::user(1).discord_id(501).member(true).build(),
            fixture::galtinn::user(2).discord_id(502).member(true).build(),
        ]);

        let gateway = FakeGateway::with_roles(&[MEMBER, VOLUNTEER]);

        let galtinn_client = client(&galtinn);
        let roles = role_config();
        let pacing = Duration::from_millis(100);
        let service = MembershipSyncService::new(
            db,
            &galtinn_client,
            &gateway,
            &roles,
            FakeGateway::GUILD,
        )
        .with_pacing(pacing);

        let started = std::time::Instant::now();
        let summary = service.sync_all().await?;

        assert_eq!(summary.skipped, 2);
        assert!(started.elapsed() >= pacing * 2);
        assert!(gateway.added().is_empty());

        Ok(())
    }

    /// Tests that a failing listing aborts before any role changes.
    ///
    /// Expected: Err and no gateway writes
    #[tokio::test]
    async fn aborts_when_listing_fails() -> Result<(), AppError> {
        let test = TestBuilder::new().with_galtinn_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let galtinn = MockGaltinn::start().await.unwrap();
        galtinn.set_page_size(1);
        galtinn.set_users(vec![
            fixture::galtinn::user(1).discord_id(501).member(true).build(),
            fixture::galtinn::user(2).discord_id(502).member(true).build(),
        ]);
        galtinn.fail_page("users", 2, 500);

        let gateway = FakeGateway::with_roles(&[MEMBER, VOLUNTEER]);
        gateway.add_member(501, &[]);

        let galtinn_client = client(&galtinn);
        let roles = role_config();
        let service = MembershipSyncService::new(
            db,
            &galtinn_client,
            &gateway,
            &roles,
            FakeGateway::GUILD,
        );

        assert!(service.sync_all().await.is_err());
        assert!(gateway.added().is_empty());

        Ok(())
    }

    /// Tests unlinking a linked account.
    ///
    /// Expected: profile deleted at Galtinn and managed roles removed
    #[tokio::test]
    async fn unlink_deletes_profile_and_strips_roles() -> Result<(), AppError> {
        let test = TestBuilder::new().with_galtinn_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let galtinn = MockGaltinn::start().await.unwrap();
        galtinn.set_groups(vec![fixture::galtinn::group(10, "a", &[1001])]);
        galtinn.set_profiles(vec![fixture::galtinn::discord_profile(77, 501, 1)]);

        let gateway = FakeGateway::with_roles(&[MEMBER, VOLUNTEER, 1001]);
        gateway.add_member(501, &[MEMBER, 1001, 7777]);

        let galtinn_client = client(&galtinn);
        let roles = role_config();
        let service = MembershipSyncService::new(
            db,
            &galtinn_client,
            &gateway,
            &roles,
            FakeGateway::GUILD,
        );

        assert!(service.unlink(501).await?);
        assert_eq!(galtinn.deleted_profiles(), vec![77]);
        assert_eq!(gateway.member_role_ids(501), vec![7777]);

        let again = service.unlink(501).await;
        assert!(matches!(
            again,
            Err(AppError::VerificationErr(VerificationError::NotLinked))
        ));

        Ok(())
    }

    /// Tests syncing a user who completed linking.
    ///
    /// Expected: roles granted from the record fetched by Galtinn id
    #[tokio::test]
    async fn syncs_linked_user_by_external_id() -> Result<(), AppError> {
        let test = TestBuilder::new().with_galtinn_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let galtinn = MockGaltinn::start().await.unwrap();
        galtinn.set_users(vec![fixture::galtinn::user(9)
            .discord_id(509)
            .volunteer(true)
            .build()]);

        let gateway = FakeGateway::with_roles(&[MEMBER, VOLUNTEER]);
        gateway.add_member(509, &[]);

        let galtinn_client = client(&galtinn);
        let roles = role_config();
        let service = MembershipSyncService::new(
            db,
            &galtinn_client,
            &gateway,
            &roles,
            FakeGateway::GUILD,
        );

        assert!(service.sync_linked_user(509, 9).await?);
        assert_eq!(gateway.member_role_ids(509), vec![VOLUNTEER]);

        Ok(())
    }
}
