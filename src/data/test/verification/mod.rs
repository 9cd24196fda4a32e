use crate::{
    data::verification::VerificationRepository, model::verification::CreateVerificationParam,
};
use chrono::{Duration, Utc};
use sea_orm::{DbErr, SqlErr};
use test_utils::{builder::TestBuilder, factory};

mod create;
mod delete;
mod delete_expired;
mod find;

fn param(discord_id: u64, state: &str) -> CreateVerificationParam {
    let now = Utc::now();
    CreateVerificationParam {
        discord_id,
        challenge: format!("verifier-{}", discord_id),
        state: state.to_string(),
        created_at: now,
        expires_at: now + Duration::minutes(2),
    }
}
