//! Policy evaluation over resolved requests.
//!
//! The per-role walk and the cross-role union live on the role types; this
//! module ties them to path resolution so a request is resolved exactly once
//! per check regardless of how many roles the caller carries.

use authz_types::role::{self, Role, Verdict};

use crate::{error::Error, resolver::PathResolver};

#[derive(Clone)]
pub struct Evaluator {
    resolver: PathResolver,
}

impl Evaluator {
    #[must_use]
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// Resolve `(path, method)` once and evaluate the roles against the
    /// resolved pair.
    pub async fn check_roles(
        &self,
        roles: &[Role],
        path: &str,
        method: &str,
    ) -> Result<Verdict, Error> {
        let (action, resource) = self.resolver.resolve(path, method).await?;
        Ok(role::check_roles(roles, &action, &resource))
    }
}
