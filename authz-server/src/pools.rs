//! Pool authorization: which pools may a caller create workflows in.

use authz_types::role::Role;

const CREATE_ACTION: &str = "workflow:Create";

/// Filter `pool_names` down to the pools where at least one role allows
/// `workflow:Create`, preserving input order. Cross-role union semantics: a
/// Deny in one role does not remove a pool granted by another.
#[must_use]
pub fn allowed_pools(roles: &[Role], pool_names: &[String]) -> Vec<String> {
    pool_names
        .iter()
        .filter(|name| {
            let resource = format!("pool/{name}");
            roles
                .iter()
                .any(|role| role.check(CREATE_ACTION, &resource).allowed)
        })
        .cloned()
        .collect()
}
