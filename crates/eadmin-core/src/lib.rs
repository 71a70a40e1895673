//! # eAdministration Core
//!
//! Core types, errors, and utilities shared by the auth, university and
//! employment-office services.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: `?page=&max=` query parsing and list metadata
//! - [`password`]: bcrypt password hashing and verification
//! - [`serde`]: Lenient deserializers for query and body fields
//!
//! # Example
//!
//! ```ignore
//! use eadmin_core::errors::AppError;
//! use eadmin_core::pagination::{PageParams, PageMeta};
//!
//! let error = AppError::not_found(anyhow::anyhow!("course not found"));
//!
//! let params = PageParams::default();
//! let meta = PageMeta::new(params.page(), params.limit(), 42);
//! assert_eq!(meta.total_pages, 5);
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::AppError;
pub use pagination::{PageMeta, PageParams};
pub use password::{hash_password, verify_password};
