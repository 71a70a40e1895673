use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;

use eadmin_auth::{HttpTokenVerifier, LocalTokenVerifier, TokenVerifier};
use eadmin_config::{CorsConfig, JwtConfig, ServiceKind, ServicesConfig};
use eadmin_db::init_db_pool;

use crate::clients::UpstreamClient;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Shared, read-only state of one running service.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub services: ServicesConfig,
    pub verifier: Arc<dyn TokenVerifier>,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        services: ServicesConfig,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamClient::new(services.upstream_timeout)?;

        Ok(Self {
            db,
            jwt_config,
            cors_config,
            services,
            verifier,
            upstream,
        })
    }
}

/// Builds the state for `kind` from the environment.
///
/// The auth service verifies tokens in-process; the other services ask the
/// auth service on every request.
pub async fn init_app_state(kind: ServiceKind) -> anyhow::Result<AppState> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let max_connections = std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);

    let db = init_db_pool(&database_url, max_connections)
        .await
        .context("Failed to connect to database")?;

    let jwt_config = JwtConfig::from_env();
    let services = ServicesConfig::from_env();

    let verifier: Arc<dyn TokenVerifier> = match kind {
        ServiceKind::Auth => Arc::new(LocalTokenVerifier::new(jwt_config.clone())),
        ServiceKind::University | ServiceKind::EmploymentOffice => Arc::new(
            HttpTokenVerifier::new(&services.auth_url, services.verify_timeout)
                .context("Failed to build auth verifier client")?,
        ),
    };

    AppState::new(db, jwt_config, CorsConfig::from_env(), services, verifier)
        .context("Failed to build upstream client")
}
