//! # Countdown Infrastructure
//! 
//! PostgreSQL implementations of the countdown repositories (adapters).

pub mod database;
pub mod seed;

pub use database::{create_pool, run_migrations, PgSessionRepository, PgSettingsRepository};
