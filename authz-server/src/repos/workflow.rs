use std::sync::Arc;

use sqlx::SqlitePool;

use crate::error::Error;

pub struct WorkflowRepo {
    db: Arc<SqlitePool>,
}

impl Clone for WorkflowRepo {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

impl WorkflowRepo {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Pool that a workflow was submitted to, or `None` for an unknown
    /// workflow id.
    #[tracing::instrument(skip(self))]
    pub async fn pool_of_workflow(&self, workflow_id: &str) -> Result<Option<String>, Error> {
        sqlx::query_as("SELECT pool FROM workflows WHERE workflow_id = ?")
            .bind(workflow_id)
            .fetch_optional(self.db.as_ref())
            .await
            .map_err(Into::into)
            .map(|row: Option<WorkflowRaw>| row.map(|row| row.pool))
    }

    #[tracing::instrument(skip(self))]
    pub async fn assign_pool(&self, workflow_id: &str, pool: &str) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO workflows (workflow_id, pool) VALUES (?, ?)
             ON CONFLICT (workflow_id) DO UPDATE SET pool = excluded.pool",
        )
        .bind(workflow_id)
        .bind(pool)
        .execute(self.db.as_ref())
        .await
        .map_err(Into::into)
        .map(|_| ())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WorkflowRaw {
    pool: String,
}
