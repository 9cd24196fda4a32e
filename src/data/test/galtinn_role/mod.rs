use crate::data::galtinn_role::GaltinnRoleRepository;
use sea_orm::DbErr;
use serenity::all::RoleId;
use test_utils::{builder::TestBuilder, factory};

mod delete;
mod get_all;
mod upsert;
