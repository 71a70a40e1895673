//! Shared helpers for the feature modules.
//!
//! - [`store`]: error mapping and lookups on the shared `users` table

pub mod store;
