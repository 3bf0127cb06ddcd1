use std::sync::Arc;

use base::BaseClient;

pub(crate) mod base;
pub mod cache;
pub mod check;
pub mod pools;
pub mod roles;

pub struct Client {
    pub check: crate::check::Client,
    pub roles: crate::roles::Client,
    pub pools: crate::pools::Client,
    pub cache: crate::cache::Client,
}

impl Client {
    #[must_use]
    pub fn new(api_url: impl ToString) -> Self {
        let base_client = Arc::new(BaseClient::new(api_url));

        Self {
            check: crate::check::Client::new(Arc::clone(&base_client)),
            roles: crate::roles::Client::new(Arc::clone(&base_client)),
            pools: crate::pools::Client::new(Arc::clone(&base_client)),
            cache: crate::cache::Client::new(base_client),
        }
    }
}
