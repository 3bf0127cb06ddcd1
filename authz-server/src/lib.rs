#![forbid(unsafe_code)]
#![forbid(clippy::unwrap_used)]
#![deny(clippy::pedantic)]
#![deny(clippy::get_unwrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod cache;
mod check;
mod config;
mod context;
mod convert;
mod error;
mod evaluator;
mod index;
mod migrations;
mod pools;
mod registry;
mod reload;
mod repos;
mod resolver;
mod router;
mod system;

use std::{future::Future, sync::Arc, time::Duration};

pub use config::{CacheConfig, Config};
pub use router::RouterService;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::sync::oneshot;
use tower::{make::Shared, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;

use crate::{
    cache::RoleCache, check::CheckHandler, context::AppContext, evaluator::Evaluator,
    reload::PolicyReloader, repos::Repos, resolver::PathResolver,
};

pub async fn shutdown_signal() {
    // Wait for the CTRL+C signal
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
}

pub async fn start(
    mut config: Config,
    shutdown_signal: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    config.sanitize()?;
    let port_tx = config.port_tx.take();

    let db = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(if config.using_inmemory_storage() { 1 } else { 5 })
        .connect_with(
            SqliteConnectOptions::new()
                .create_if_missing(true)
                .foreign_keys(true)
                .filename(config.db_path()),
        )
        .await?;
    migrations::migrate(&db).await.map_err(|error| {
        anyhow::Error::msg(format!("Failed to run migrations: {error}"))
    })?;

    let repos = Repos::new(Arc::new(db));
    let cache = Arc::new(RoleCache::new(&config.cache));
    let resolver = PathResolver::new(Some(repos.workflow.clone()));
    let handler = CheckHandler::new(Arc::clone(&cache), repos.clone(), Evaluator::new(resolver));
    let ctx = Arc::new(AppContext {
        handler,
        repos: repos.clone(),
        cache: Arc::clone(&cache),
    });

    let mut reload_tx = None;
    if let Some(interval) = config.policy_reload_interval.filter(|i| !i.is_zero()) {
        let (tx, rx) = oneshot::channel();
        reload_tx = Some(tx);
        let reloader = PolicyReloader::new(Arc::clone(&cache), repos, interval);
        tokio::spawn(reloader.run(rx));
    }

    let server_router_svc = ServiceBuilder::new()
        .concurrency_limit(1024)
        .timeout(Duration::from_secs(10))
        .layer(RequestBodyLimitLayer::new(1024 * 64))
        .service(RouterService::new(ctx));

    let addr = config.socket_addr()?;
    let authz_server = hyper::Server::bind(&addr).serve(Shared::new(server_router_svc));
    let addr = authz_server.local_addr();
    let authz_server = authz_server.with_graceful_shutdown(shutdown_signal);

    info!("authorization sidecar listening on {addr}");
    if let Some(tx) = port_tx {
        let _ = tx.send(addr.port());
    }

    let result = authz_server.await;
    if let Some(tx) = reload_tx {
        let _ = tx.send(());
    }
    if let Err(error) = result {
        tracing::error!(?error, "Encountered server error. Shutting down.");
        return Err(error.into());
    }
    Ok(())
}
