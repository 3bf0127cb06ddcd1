use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct AllowedPoolsResponse {
    pub pools: Vec<String>,
}
