//! Galtinn membership bot and verification callback service.
//!
//! The crate backs two processes sharing one PostgreSQL database:
//!
//! - **`galtinn-bot`** (`src/main.rs`) - Discord bot handling slash commands,
//!   issuing verification challenges, running the daily membership check and
//!   applying roles when a link completes.
//! - **`verification-server`** (`src/bin/verification_server.rs`) - Axum
//!   service completing the OAuth 2.0 authorization-code + PKCE callback and
//!   announcing completed links over the database event channel.
//!
//! # Architecture
//!
//! - **Controller Layer** (`controller/`) - HTTP handlers for the callback service
//! - **Service Layer** (`service/`) - Galtinn client, verification, role reconciliation
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain conversion
//! - **Model Layer** (`model/`) - Domain models and Galtinn API documents
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//!
//! Supporting modules: `config`, `state`, `startup`, `router`, `event`
//! (cross-process notifications), `scheduler/` (cron jobs) and `bot/`
//! (Discord gateway handler and commands).

pub mod bot;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod event;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
