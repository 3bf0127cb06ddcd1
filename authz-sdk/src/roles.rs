use std::sync::Arc;

pub use authz_types::methods::system::{
    ListRolesResponse, ReadRoleResponse, RemoveRoleResponse, WriteRoleParams, WriteRoleResponse,
};
pub use authz_types::role::Role;

use crate::base::BaseClient;

pub struct Client {
    client: Arc<BaseClient>,
}

impl Client {
    pub(crate) fn new(client: Arc<BaseClient>) -> Self {
        Self { client }
    }

    pub async fn write(&self, role: Role) -> Result<WriteRoleResponse, String> {
        self.client
            .post("/sys/roles".into(), &WriteRoleParams { role })
            .await
    }

    pub async fn list(&self) -> Result<ListRolesResponse, String> {
        self.client.get("/sys/roles".into(), &[]).await
    }

    pub async fn read(&self, name: &str) -> Result<ReadRoleResponse, String> {
        self.client.get(format!("/sys/roles/{name}"), &[]).await
    }

    pub async fn remove(&self, name: &str) -> Result<RemoveRoleResponse, String> {
        self.client.delete(format!("/sys/roles/{name}")).await
    }
}
