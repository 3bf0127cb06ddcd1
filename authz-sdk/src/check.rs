use std::sync::Arc;

pub use authz_types::check::{CheckRequest, CheckResponse, CheckStatus};

use crate::base::BaseClient;

pub struct Client {
    client: Arc<BaseClient>,
}

impl Client {
    pub(crate) fn new(client: Arc<BaseClient>) -> Self {
        Self { client }
    }

    /// Authorize one request. A deny is a successful call; only transport
    /// failures surface as `Err`.
    pub async fn check(&self, req: &CheckRequest) -> Result<CheckResponse, String> {
        self.client.post("/check".into(), req).await
    }
}
