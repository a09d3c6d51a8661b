//! Server Implementation
//!
//! Opens the database, seeds the first account and serves the HTTP API.

use std::net::SocketAddr;

use crate::api::build_app;
use crate::config::Config;
use crate::db::DbService;
use crate::state::ServerState;

/// HTTP Server
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Open the database and build the shared state
    pub async fn initialize(&self) -> anyhow::Result<ServerState> {
        let db = DbService::new(&self.config.database_url).await?;

        match &self.config.bootstrap_admin {
            Some(admin) => {
                db.ensure_bootstrap_admin(admin).await?;
            }
            None => tracing::debug!("No bootstrap admin configured"),
        }

        Ok(ServerState::new(self.config.clone(), db.pool))
    }

    /// Serve until Ctrl-C
    pub async fn run(&self) -> anyhow::Result<()> {
        let state = self.initialize().await?;
        let app = build_app(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, environment = %self.config.environment, "Bakery server listening");

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
