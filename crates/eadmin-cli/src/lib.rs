//! # eAdministration CLI
//!
//! Account provisioning and database seeding for development.
//!
//! Administrator accounts (`facultyadmin`, `sszadmin`) cannot be
//! self-registered through the auth service; [`admin::create_admin`] is the
//! only way to create them.
//!
//! ## Usage
//!
//! ```ignore
//! use eadmin_cli::seeder::{seed_database, SeedConfig};
//!
//! seed_database(&pool, SeedConfig::default()).await?;
//! ```

pub mod admin;
pub mod seeder;
