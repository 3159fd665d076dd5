//! `padel-scheduler serve`: run the scheduling HTTP API.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use tracing::info;

use crate::adapters::http::ClassesHttpServer;
use crate::adapters::memory::InMemoryStore;
use crate::adapters::sqlite::{initialize_database, sqlite_repositories, PoolConfig};
use crate::domain::models::{Config, ServerConfig};
use crate::domain::ports::Repositories;
use crate::infrastructure::logging::LoggerImpl;
use crate::services::{ClassScheduler, ReservationService};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Override server.port
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Keep all data in memory instead of the configured database
    #[arg(long)]
    pub in_memory: bool,
}

impl ServeArgs {
    fn server_config(&self, base: &ServerConfig) -> ServerConfig {
        ServerConfig {
            host: self.host.clone().unwrap_or_else(|| base.host.clone()),
            port: self.port.unwrap_or(base.port),
            enable_cors: base.enable_cors,
        }
    }
}

pub async fn execute(args: ServeArgs, config: Config) -> Result<()> {
    let _logger = LoggerImpl::init(&config.logging)?;

    let repos: Repositories = if args.in_memory {
        info!("using in-memory storage; data is lost on shutdown");
        Arc::new(InMemoryStore::new()).repositories()
    } else {
        let pool = initialize_database(
            &config.database.url(),
            Some(PoolConfig::from(&config.database)),
        )
        .await
        .context("Failed to initialize database")?;
        info!(path = %config.database.path, "database ready");
        sqlite_repositories(pool)
    };

    let scheduler = ClassScheduler::new(repos.clone(), config.scheduling.clone());
    let reservations = ReservationService::new(repos.courts.clone(), repos.schedule.clone());
    let server = ClassesHttpServer::new(scheduler, reservations, args.server_config(&config.server));

    server
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!("HTTP server failed: {e}"))?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
