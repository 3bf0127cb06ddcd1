use std::sync::Arc;

use sqlx::SqlitePool;

use crate::error::Error;

pub struct PoolRepo {
    db: Arc<SqlitePool>,
}

impl Clone for PoolRepo {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

impl PoolRepo {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// All known pool names in registration order.
    #[tracing::instrument(skip(self))]
    pub async fn list_names(&self) -> Result<Vec<String>, Error> {
        sqlx::query_as("SELECT name FROM pools ORDER BY rowid")
            .fetch_all(self.db.as_ref())
            .await
            .map_err(Into::into)
            .map(|rows: Vec<PoolRaw>| rows.into_iter().map(|row| row.name).collect())
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<(), Error> {
        sqlx::query("INSERT OR IGNORE INTO pools (name) VALUES (?)")
            .bind(name)
            .execute(self.db.as_ref())
            .await
            .map_err(Into::into)
            .map(|_| ())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PoolRaw {
    name: String,
}
