use std::sync::Arc;

use crate::{cache::RoleCache, check::CheckHandler, repos::Repos};

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub handler: CheckHandler,
    pub repos: Repos,
    pub cache: Arc<RoleCache>,
}
