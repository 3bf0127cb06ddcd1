use serde::{Deserialize, Serialize};

use crate::role::Role;

#[derive(Debug, Deserialize, Serialize)]
pub struct WriteRoleParams {
    pub role: Role,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct WriteRoleResponse {
    pub role: Role,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ListRolesResponse {
    pub roles: Vec<Role>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReadRoleResponse {
    pub role: Role,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RemoveRoleResponse {
    pub role: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CacheStatusResponse {
    pub enabled: bool,
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ClearCacheResponse {
    pub cleared: usize,
}
