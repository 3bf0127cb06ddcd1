use std::sync::Arc;

use sqlx::SqlitePool;

use self::{pool::PoolRepo, role::RoleRepo, workflow::WorkflowRepo};

pub mod pool;
pub mod role;
pub mod workflow;

#[derive(Clone)]
pub struct Repos {
    pub role: RoleRepo,
    pub workflow: WorkflowRepo,
    pub pool: PoolRepo,
    pub db: Arc<SqlitePool>,
}

impl Repos {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self {
            role: RoleRepo::new(Arc::clone(&db)),
            workflow: WorkflowRepo::new(Arc::clone(&db)),
            pool: PoolRepo::new(Arc::clone(&db)),
            db,
        }
    }
}
