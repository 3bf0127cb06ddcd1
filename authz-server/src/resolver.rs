//! Path/method -> (semantic action, resource) resolution.
//!
//! The only resolver step that performs I/O is the workflow -> pool lookup;
//! without an injected [`WorkflowRepo`] it degrades to the `pool/*` wildcard
//! and resource matching falls back to scope-wide semantics.

use lazy_static::lazy_static;

use crate::{
    error::Error,
    index::PatternIndex,
    registry::ENDPOINTS,
    repos::workflow::WorkflowRepo,
};

lazy_static! {
    static ref INDEX: PatternIndex = PatternIndex::new(ENDPOINTS);
}

pub struct PathResolver {
    index: &'static PatternIndex,
    workflows: Option<WorkflowRepo>,
}

impl Clone for PathResolver {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            workflows: self.workflows.clone(),
        }
    }
}

impl PathResolver {
    #[must_use]
    pub fn new(workflows: Option<WorkflowRepo>) -> Self {
        Self {
            index: &INDEX,
            workflows,
        }
    }

    /// Resolve `(path, method)` into a `(action, resource)` pair. Unknown
    /// endpoints resolve to a pair of empty strings.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, path: &str, method: &str) -> Result<(String, String), Error> {
        let method = method.to_uppercase();
        let path = normalize_path(path);

        let Some(pattern) = self.index.lookup(&path, &method) else {
            return Ok((String::new(), String::new()));
        };

        let resource = self.extract_resource(pattern.action, &path).await?;
        Ok((pattern.action.to_string(), resource))
    }

    /// Derive the resource identifier for a resolved action from the request
    /// path. Resource types without a scoped identifier yield the empty
    /// resource, which skips the resource check entirely.
    async fn extract_resource(&self, action: &str, path: &str) -> Result<String, Error> {
        let segments: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        let (resource_type, verb) = action.split_once(':').unwrap_or((action, ""));

        let resource = match resource_type {
            "bucket" => scoped("bucket", segment_after(&segments, "bucket")),
            "config" => {
                if verb == "List" {
                    String::new()
                } else {
                    scoped("config", segment_after(&segments, "configs"))
                }
            }
            "auth" => {
                if verb == "Token" {
                    segment_after(&segments, "user")
                        .map(|user| format!("user/{user}"))
                        .unwrap_or_default()
                } else {
                    String::new()
                }
            }
            "workflow" => match verb {
                "Create" => scoped("pool", segment_after(&segments, "pool")),
                "List" | "WebServer" => String::new(),
                _ => {
                    let id = segment_after(&segments, "workflow").or_else(|| {
                        ["exec", "portforward", "rsync"]
                            .iter()
                            .find_map(|tool| segment_after(&segments, tool))
                    });
                    match id {
                        Some(id) => self.pool_of_workflow(id).await?,
                        None => "pool/*".to_string(),
                    }
                }
            },
            "internal" => match verb {
                "Operator" => scoped("backend", segment_after(&segments, "agent")),
                "Logger" => scoped("backend", segment_after(&segments, "logger")),
                "Router" => scoped("backend", segment_after(&segments, "router")),
                _ => String::new(),
            },
            _ => String::new(),
        };

        Ok(resource)
    }

    async fn pool_of_workflow(&self, workflow_id: &str) -> Result<String, Error> {
        let Some(workflows) = &self.workflows else {
            return Ok("pool/*".to_string());
        };
        Ok(workflows
            .pool_of_workflow(workflow_id)
            .await?
            .map_or_else(|| "pool/*".to_string(), |pool| format!("pool/{pool}")))
    }
}

fn scoped(scope: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{scope}/{id}"),
        None => format!("{scope}/*"),
    }
}

fn segment_after<'a>(segments: &[&'a str], segment: &str) -> Option<&'a str> {
    segments
        .iter()
        .position(|part| *part == segment)
        .and_then(|pos| segments.get(pos + 1))
        .copied()
}

/// Strip the query string and any trailing slashes.
fn normalize_path(path: &str) -> String {
    let path = path.split('?').next().unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::repos::{tests::db, Repos};

    use super::*;

    async fn resolve(path: &str, method: &str) -> (String, String) {
        PathResolver::new(None)
            .resolve(path, method)
            .await
            .expect("resolution without a database never fails")
    }

    #[tokio::test]
    async fn normalizes_method_query_and_trailing_slash() {
        assert_eq!(
            resolve("/api/version/?verbose=true", "get").await,
            ("system:Version".to_string(), String::new())
        );
    }

    #[tokio::test]
    async fn unknown_paths_resolve_to_empty_pair() {
        assert_eq!(resolve("/metrics", "GET").await, (String::new(), String::new()));
    }

    #[tokio::test]
    async fn bucket_and_config_scopes() {
        assert_eq!(
            resolve("/api/bucket/b1", "GET").await,
            ("bucket:Read".to_string(), "bucket/b1".to_string())
        );
        assert_eq!(
            resolve("/api/bucket", "POST").await,
            ("bucket:Create".to_string(), "bucket/*".to_string())
        );
        assert_eq!(
            resolve("/api/configs/base", "PUT").await,
            ("config:Write".to_string(), "config/base".to_string())
        );
        assert_eq!(
            resolve("/api/configs", "GET").await,
            ("config:List".to_string(), String::new())
        );
    }

    #[tokio::test]
    async fn token_requests_scope_to_the_target_user() {
        assert_eq!(
            resolve("/api/auth/user/u1/token", "POST").await,
            ("auth:Token".to_string(), "user/u1".to_string())
        );
        assert_eq!(
            resolve("/api/auth/login", "POST").await,
            ("auth:Login".to_string(), String::new())
        );
    }

    #[tokio::test]
    async fn workflow_create_scopes_to_the_target_pool() {
        assert_eq!(
            resolve("/api/pool/prod/workflow", "POST").await,
            ("workflow:Create".to_string(), "pool/prod".to_string())
        );
        assert_eq!(
            resolve("/api/workflow", "POST").await,
            ("workflow:Create".to_string(), "pool/*".to_string())
        );
    }

    #[tokio::test]
    async fn workflow_reads_fall_back_to_wildcard_without_a_database() {
        assert_eq!(
            resolve("/api/workflow/w1", "DELETE").await,
            ("workflow:Delete".to_string(), "pool/*".to_string())
        );
        assert_eq!(
            resolve("/api/router/exec/w1", "WEBSOCKET").await,
            ("workflow:Exec".to_string(), "pool/*".to_string())
        );
    }

    #[tokio::test]
    async fn workflow_reads_resolve_the_owning_pool() {
        let repos = Repos::new(Arc::new(db().await));
        repos
            .workflow
            .assign_pool("w1", "prod")
            .await
            .expect("assign works");
        let resolver = PathResolver::new(Some(repos.workflow.clone()));

        assert_eq!(
            resolver
                .resolve("/api/workflow/w1", "DELETE")
                .await
                .expect("resolution works"),
            ("workflow:Delete".to_string(), "pool/prod".to_string())
        );
        assert_eq!(
            resolver
                .resolve("/api/workflow/ghost", "GET")
                .await
                .expect("resolution works"),
            ("workflow:Read".to_string(), "pool/*".to_string())
        );
        assert_eq!(
            resolver
                .resolve("/api/router/exec/w1", "WEBSOCKET")
                .await
                .expect("resolution works"),
            ("workflow:Exec".to_string(), "pool/prod".to_string())
        );
    }

    #[tokio::test]
    async fn webserver_routes_need_no_scope() {
        assert_eq!(
            resolve("/api/router/webserver/w1", "GET").await,
            ("workflow:WebServer".to_string(), String::new())
        );
    }

    #[tokio::test]
    async fn internal_actions_scope_to_the_backend() {
        assert_eq!(
            resolve("/api/agent/listener/status", "GET").await,
            ("internal:Operator".to_string(), "backend/listener".to_string())
        );
        assert_eq!(
            resolve("/api/logger/collector", "POST").await,
            ("internal:Logger".to_string(), "backend/collector".to_string())
        );
        assert_eq!(
            resolve("/api/router/backend-7/connect", "WEBSOCKET").await,
            ("internal:Router".to_string(), "backend/backend-7".to_string())
        );
    }
}
