//! # eAdministration Config
//!
//! Configuration structures loaded from environment variables once at
//! startup and carried in each service's `AppState`:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`cors`]: allowed browser origins
//! - [`services`]: sibling service base URLs and outbound call timeouts
//! - [`server`]: bind address for a service
//!
//! # Example
//!
//! ```ignore
//! use eadmin_config::{CorsConfig, JwtConfig, ServerConfig, ServiceKind, ServicesConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let services = ServicesConfig::from_env();
//! let server = ServerConfig::from_env(ServiceKind::University);
//! ```

pub mod cors;
pub mod jwt;
pub mod server;
pub mod services;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::{ServerConfig, ServiceKind};
pub use services::ServicesConfig;
