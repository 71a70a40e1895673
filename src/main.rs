use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::{info, warn};

use eadmin::logging::{init_tracing, shutdown_tracer};
use eadmin::metrics::{init_metrics, metrics_app};
use eadmin::router::init_router;
use eadmin::state::init_app_state;
use eadmin_config::{ServerConfig, ServiceKind};
use eadmin_db::{init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "eadmin")]
#[command(about = "eAdministration services", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the auth service
    Auth,
    /// Run the university service
    University,
    /// Run the employment office service
    EmploymentOffice,
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let kind = match Cli::parse().command {
        Commands::Auth => ServiceKind::Auth,
        Commands::University => ServiceKind::University,
        Commands::EmploymentOffice => ServiceKind::EmploymentOffice,
        Commands::Migrate => return migrate().await,
    };

    init_tracing(kind).context("Failed to initialize logging")?;

    let result = serve(kind).await;
    shutdown_tracer();
    result
}

async fn serve(kind: ServiceKind) -> anyhow::Result<()> {
    let state = init_app_state(kind).await?;
    let mut app = init_router(kind, state);

    match init_metrics() {
        Ok(Some(handle)) => app = app.merge(metrics_app(handle)),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Failed to install metrics recorder"),
    }

    let addr = ServerConfig::from_env(kind).addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(service = %kind, %addr, "Server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!(service = %kind, "Server stopped");
    Ok(())
}

async fn migrate() -> anyhow::Result<()> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = init_db_pool(&database_url, 1)
        .await
        .context("Failed to connect to database")?;

    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    println!("✅ Migrations applied");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
