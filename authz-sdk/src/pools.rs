use std::sync::Arc;

pub use authz_types::methods::pools::AllowedPoolsResponse;
use authz_types::check::{ROLES_HEADER, USER_HEADER};

use crate::base::BaseClient;

pub struct Client {
    client: Arc<BaseClient>,
}

impl Client {
    pub(crate) fn new(client: Arc<BaseClient>) -> Self {
        Self { client }
    }

    /// Pools in which the caller may create workflows. `roles` is the raw
    /// comma-separated header value.
    pub async fn allowed(&self, user: &str, roles: &str) -> Result<AllowedPoolsResponse, String> {
        self.client
            .get(
                "/pools".into(),
                &[(USER_HEADER, user), (ROLES_HEADER, roles)],
            )
            .await
    }
}
