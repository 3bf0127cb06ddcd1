//! Background policy reloader.
//!
//! Periodically re-materializes every cached role from storage so policy
//! edits propagate ahead of TTL expiry. Runs entirely outside the request
//! path; in-flight checks only ever observe the cache lock for the duration
//! of a single get or set.

use std::{sync::Arc, time::Duration};

use tokio::sync::oneshot;

use crate::{cache::RoleCache, convert, repos::Repos};

pub struct PolicyReloader {
    cache: Arc<RoleCache>,
    repos: Repos,
    interval: Duration,
}

impl PolicyReloader {
    #[must_use]
    pub fn new(cache: Arc<RoleCache>, repos: Repos, interval: Duration) -> Self {
        Self {
            cache,
            repos,
            interval,
        }
    }

    pub async fn run(self, mut shutdown: oneshot::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick fires immediately; skip it so a fresh server does
        // not reload an empty cache.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => self.refresh().await,
            }
        }
        tracing::debug!("policy reloader stopped");
    }

    /// Re-fetch every cached role. Roles deleted from storage are evicted;
    /// a storage error leaves the stale entry in place until the next cycle.
    async fn refresh(&self) {
        for name in self.cache.cached_names() {
            match self.repos.role.lookup(&name).await {
                Ok(Some(role)) => self.cache.set(&[convert::to_semantic(&role)]),
                Ok(None) => self.cache.remove(&name),
                Err(error) => {
                    tracing::warn!(%error, role = %name, "policy reload failed");
                }
            }
        }
    }
}
