//! The top-level check handler: header parsing, role loading through the
//! cache, evaluation, and the allow/deny envelope.

use std::sync::Arc;

use authz_types::check::{CheckRequest, CheckResponse, CheckStatus, DEFAULT_ROLE};
use authz_types::role::Role;

use crate::{cache::RoleCache, convert, error::Error, evaluator::Evaluator, repos::Repos};

const DENY_BODY: &str = "permission denied";
const INTERNAL_BODY: &str = "internal error";
const MISSING_ATTRIBUTES_BODY: &str = "missing http attributes";

#[derive(Clone)]
pub struct CheckHandler {
    cache: Arc<RoleCache>,
    repos: Repos,
    evaluator: Evaluator,
}

impl CheckHandler {
    #[must_use]
    pub fn new(cache: Arc<RoleCache>, repos: Repos, evaluator: Evaluator) -> Self {
        Self {
            cache,
            repos,
            evaluator,
        }
    }

    /// Load roles by name through the cache, fetching misses from storage.
    /// Fetched roles are converted to semantic form before they are cached,
    /// so the evaluator never sees a legacy action. Unknown names are
    /// silently absent from the result.
    #[tracing::instrument(skip(self))]
    pub async fn load_roles(&self, names: &[String]) -> Result<Vec<Role>, Error> {
        let (mut roles, missing) = self.cache.get(names);
        if !missing.is_empty() {
            let fetched = self.repos.role.batch_lookup(&missing).await?;
            let converted: Vec<Role> = fetched.iter().map(convert::to_semantic).collect();
            self.cache.set(&converted);
            roles.extend(converted);
        }
        Ok(roles)
    }

    /// Authorize one gateway request. Never fails; every error path maps to
    /// a deny envelope so an uncertain decision can never fail open.
    pub async fn check(&self, req: &CheckRequest) -> CheckResponse {
        let Some(http) = req.http() else {
            return CheckResponse::denied(CheckStatus::InvalidArgument, MISSING_ATTRIBUTES_BODY);
        };
        if http.method.is_empty() || http.path.is_empty() {
            return CheckResponse::denied(CheckStatus::InvalidArgument, MISSING_ATTRIBUTES_BODY);
        }

        let user = http.user().unwrap_or_default().to_string();
        let mut names = http.role_names();
        names.push(DEFAULT_ROLE.to_string());

        let roles = match self.load_roles(&names).await {
            Ok(roles) => roles,
            Err(error) => {
                tracing::error!(%error, %user, "failed to load roles");
                return CheckResponse::denied(CheckStatus::Internal, INTERNAL_BODY);
            }
        };

        match self.evaluator.check_roles(&roles, &http.path, &http.method).await {
            Ok(verdict) if verdict.allowed => {
                tracing::debug!(
                    %user,
                    path = %http.path,
                    method = %http.method,
                    role = %verdict.role_name,
                    action = %verdict.matched_action,
                    "request allowed"
                );
                CheckResponse::allowed()
            }
            Ok(verdict) => {
                if verdict.denied {
                    tracing::info!(
                        %user,
                        path = %http.path,
                        method = %http.method,
                        role = %verdict.role_name,
                        action = %verdict.matched_action,
                        resource = %verdict.matched_resource,
                        "request denied by policy"
                    );
                } else {
                    tracing::debug!(
                        %user,
                        path = %http.path,
                        method = %http.method,
                        "no policy matched"
                    );
                }
                CheckResponse::denied(CheckStatus::PermissionDenied, DENY_BODY)
            }
            Err(error) => {
                tracing::error!(%error, %user, path = %http.path, "evaluation failed");
                CheckResponse::denied(CheckStatus::Internal, INTERNAL_BODY)
            }
        }
    }
}
