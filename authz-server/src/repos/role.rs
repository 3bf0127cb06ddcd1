use std::sync::Arc;

use authz_types::role::Role;
use sqlx::SqlitePool;

use crate::error::{Error, ErrorType};

pub struct RoleRepo {
    db: Arc<SqlitePool>,
}

impl Clone for RoleRepo {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

impl RoleRepo {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    #[tracing::instrument(skip(self))]
    pub async fn lookup(&self, name: &str) -> Result<Option<Role>, Error> {
        sqlx::query_as("SELECT name, description, policies, immutable FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(self.db.as_ref())
            .await
            .map_err(Into::into)
            .and_then(|role: Option<RoleRaw>| role.map(TryInto::try_into).transpose())
    }

    /// Fetch a batch of roles by name. Unknown names are skipped; a storage
    /// error fails the whole batch.
    #[tracing::instrument(skip(self))]
    pub async fn batch_lookup(&self, names: &[String]) -> Result<Vec<Role>, Error> {
        let mut futures = Vec::with_capacity(names.len());
        for name in names {
            futures.push(self.lookup(name));
        }
        let mut roles = Vec::with_capacity(names.len());
        for result in futures::future::join_all(futures).await {
            if let Some(role) = result? {
                roles.push(role);
            }
        }
        Ok(roles)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Role>, Error> {
        sqlx::query_as("SELECT name, description, policies, immutable FROM roles ORDER BY name")
            .fetch_all(self.db.as_ref())
            .await
            .map_err(Into::into)
            .map(|roles: Vec<RoleRaw>| {
                roles
                    .into_iter()
                    .filter_map(|role| role.try_into().ok())
                    .collect()
            })
    }

    #[tracing::instrument(skip(self, role), fields(role = %role.name))]
    pub async fn save(&self, role: &Role) -> Result<(), Error> {
        let policies = serde_json::to_string(&role.policies)
            .map_err(|_| ErrorType::BadRequest("Invalid policy format".to_string()))?;

        sqlx::query(
            "INSERT INTO roles (name, description, policies, immutable) VALUES (?, ?, ?, ?)
             ON CONFLICT (name) DO UPDATE SET
                 description = excluded.description,
                 policies = excluded.policies,
                 immutable = excluded.immutable",
        )
        .bind(&role.name)
        .bind(&role.description)
        .bind(policies)
        .bind(role.immutable)
        .execute(self.db.as_ref())
        .await
        .map_err(Into::into)
        .map(|_| ())
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, name: &str) -> Result<bool, Error> {
        sqlx::query("DELETE FROM roles WHERE name = ?")
            .bind(name)
            .execute(self.db.as_ref())
            .await
            .map_err(Into::into)
            .map(|res| res.rows_affected() == 1)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RoleRaw {
    name: String,
    description: String,
    policies: String,
    immutable: bool,
}

impl TryFrom<RoleRaw> for Role {
    type Error = Error;

    fn try_from(role: RoleRaw) -> Result<Self, Self::Error> {
        serde_json::from_str(&role.policies)
            .map_err(|_| {
                ErrorType::BadData(format!("Unable to parse policies for role `{}`", role.name))
                    .into()
            })
            .map(|policies| Role {
                name: role.name,
                description: role.description,
                policies,
                immutable: role.immutable,
            })
    }
}
