use std::sync::Arc;

pub use authz_types::methods::system::{CacheStatusResponse, ClearCacheResponse};

use crate::base::BaseClient;

pub struct Client {
    client: Arc<BaseClient>,
}

impl Client {
    pub(crate) fn new(client: Arc<BaseClient>) -> Self {
        Self { client }
    }

    pub async fn status(&self) -> Result<CacheStatusResponse, String> {
        self.client.get("/sys/cache".into(), &[]).await
    }

    pub async fn clear(&self) -> Result<ClearCacheResponse, String> {
        self.client.delete("/sys/cache".into()).await
    }
}
