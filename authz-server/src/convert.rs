//! Legacy path/method policy rules -> semantic action rules.
//!
//! Legacy rules are reverse-matched against the endpoint registry: every
//! registered action reachable through the legacy pattern is emitted as a
//! semantic action. Deny (`!`-prefixed) legacy patterns are dropped rather
//! than translated; deny restrictions must be re-authored as semantic
//! `effect: deny` policies.

use authz_types::role::{Role, RoleAction, RolePolicy};

use crate::registry::{EndpointDef, ENDPOINTS, METHOD_ANY};

/// Produce a role containing only semantic actions. Roles pass through this
/// on every load from storage, before they reach the cache or the evaluator.
#[must_use]
pub fn to_semantic(role: &Role) -> Role {
    Role {
        name: role.name.clone(),
        description: role.description.clone(),
        policies: role.policies.iter().map(convert_policy).collect(),
        immutable: role.immutable,
    }
}

fn convert_policy(policy: &RolePolicy) -> RolePolicy {
    let mut actions: Vec<RoleAction> = Vec::with_capacity(policy.actions.len());
    for action in &policy.actions {
        match action {
            RoleAction::Semantic { .. } => {
                if !actions.contains(action) {
                    actions.push(action.clone());
                }
            }
            RoleAction::Legacy { path, method, .. } => {
                if path.starts_with('!') {
                    continue;
                }
                for name in semantic_actions_for(path, method) {
                    let semantic = RoleAction::Semantic { action: name };
                    if !actions.contains(&semantic) {
                        actions.push(semantic);
                    }
                }
            }
        }
    }

    RolePolicy {
        effect: policy.effect,
        actions,
        resources: Some(
            policy
                .resources
                .clone()
                .unwrap_or_else(|| vec!["*".to_string()]),
        ),
    }
}

/// First legacy rule in `role` that reaches no registered endpoint, as a
/// `METHOD path` string. Such a rule would convert to zero semantic actions
/// and turn the grant into a silent no-op, so writes are rejected up front.
/// Deny (`!`-prefixed) patterns are exempt; conversion drops them anyway.
#[must_use]
pub fn first_unconvertible(role: &Role) -> Option<String> {
    for policy in &role.policies {
        for action in &policy.actions {
            let RoleAction::Legacy { path, method, .. } = action else {
                continue;
            };
            if path.starts_with('!') {
                continue;
            }
            if semantic_actions_for(path, method).is_empty() {
                return Some(format!("{method} {path}"));
            }
        }
    }
    None
}

fn semantic_actions_for(path: &str, method: &str) -> Vec<String> {
    if path == "*" && method == "*" {
        return vec!["*:*".to_string()];
    }

    let mut found: Vec<String> = Vec::new();
    for def in ENDPOINTS {
        if methods_overlap(def, method)
            && paths_overlap(def.path, path)
            && !found.iter().any(|name| name == def.action)
        {
            found.push(def.action.to_string());
        }
    }
    found
}

fn methods_overlap(def: &EndpointDef, method: &str) -> bool {
    method == METHOD_ANY
        || def
            .methods
            .iter()
            .any(|m| *m == METHOD_ANY || m.eq_ignore_ascii_case(method))
}

/// Joint-satisfiability of two path globs: true when some concrete path
/// matches both. Unlike the resolver, the trailing wildcard is allowed to
/// consume an empty tail here.
fn paths_overlap(a: &str, b: &str) -> bool {
    if a == "*" || b == "*" || a == "/*" || b == "/*" {
        return true;
    }

    let (a_core, a_trailing) = split_glob(a);
    let (b_core, b_trailing) = split_glob(b);

    let compatible = |len: usize| {
        a_core[..len]
            .iter()
            .zip(&b_core[..len])
            .all(|(x, y)| *x == "*" || *y == "*" || x == y)
    };

    match (a_trailing, b_trailing) {
        (false, false) => a_core.len() == b_core.len() && compatible(a_core.len()),
        (true, false) => b_core.len() >= a_core.len() && compatible(a_core.len()),
        (false, true) => a_core.len() >= b_core.len() && compatible(b_core.len()),
        (true, true) => compatible(a_core.len().min(b_core.len())),
    }
}

fn split_glob(pattern: &str) -> (Vec<&str>, bool) {
    let mut parts: Vec<&str> = pattern.split('/').collect();
    let trailing = parts.last() == Some(&"*");
    if trailing {
        parts.pop();
    }
    (parts, trailing)
}

#[cfg(test)]
mod tests {
    use authz_types::role::Effect;

    use super::*;

    fn legacy(path: &str, method: &str) -> RoleAction {
        RoleAction::Legacy {
            base: "http".to_string(),
            path: path.to_string(),
            method: method.to_string(),
        }
    }

    fn semantic_names(policy: &RolePolicy) -> Vec<&str> {
        policy
            .actions
            .iter()
            .map(|action| match action {
                RoleAction::Semantic { action } => action.as_str(),
                RoleAction::Legacy { .. } => panic!("legacy action survived conversion"),
            })
            .collect()
    }

    fn convert_one(actions: Vec<RoleAction>) -> RolePolicy {
        let role = Role {
            name: "legacy".to_string(),
            description: String::new(),
            policies: vec![RolePolicy {
                effect: Effect::Allow,
                actions,
                resources: None,
            }],
            immutable: false,
        };
        let converted = to_semantic(&role);
        assert!(!converted.has_legacy_actions());
        converted.policies.into_iter().next().expect("one policy")
    }

    #[test]
    fn universal_legacy_rule_becomes_universal_action() {
        let policy = convert_one(vec![legacy("*", "*")]);
        assert_eq!(semantic_names(&policy), vec!["*:*"]);
    }

    #[test]
    fn exact_legacy_path_converts_to_its_action() {
        let policy = convert_one(vec![legacy("/api/version", "GET")]);
        assert_eq!(semantic_names(&policy), vec!["system:Version"]);
    }

    #[test]
    fn legacy_prefix_glob_reaches_collection_and_item_routes() {
        let policy = convert_one(vec![legacy("/api/workflow/*", "GET")]);
        // Loose trailing-wildcard semantics admit the empty tail, so the
        // collection GET converts too.
        assert_eq!(
            semantic_names(&policy),
            vec!["workflow:List", "workflow:Read"]
        );
    }

    #[test]
    fn legacy_concrete_path_meets_registered_middle_wildcard() {
        let policy = convert_one(vec![legacy("/api/pool/prod/workflow", "POST")]);
        assert_eq!(semantic_names(&policy), vec!["workflow:Create"]);
    }

    #[test]
    fn method_restricts_the_enumeration() {
        let policy = convert_one(vec![legacy("/api/bucket/*", "DELETE")]);
        assert_eq!(semantic_names(&policy), vec!["bucket:Delete"]);
    }

    #[test]
    fn wildcard_method_reaches_every_verb() {
        // The loose overlap rule lets `/api/bucket/*` meet the bare
        // collection path, so the item routes convert as well.
        let policy = convert_one(vec![legacy("/api/bucket", "*")]);
        assert_eq!(
            semantic_names(&policy),
            vec![
                "bucket:List",
                "bucket:Create",
                "bucket:Read",
                "bucket:Update",
                "bucket:Delete"
            ]
        );
    }

    #[test]
    fn deny_patterns_are_dropped() {
        let policy = convert_one(vec![
            legacy("!/api/workflow/*", "DELETE"),
            legacy("/api/version", "GET"),
        ]);
        assert_eq!(semantic_names(&policy), vec!["system:Version"]);
    }

    #[test]
    fn duplicates_are_collapsed() {
        let policy = convert_one(vec![
            RoleAction::Semantic {
                action: "workflow:Read".to_string(),
            },
            legacy("/api/workflow/w1", "GET"),
        ]);
        assert_eq!(semantic_names(&policy), vec!["workflow:Read"]);
    }

    #[test]
    fn absent_resources_default_to_wildcard() {
        let policy = convert_one(vec![legacy("/api/version", "GET")]);
        assert_eq!(policy.resources, Some(vec!["*".to_string()]));

        let role = Role {
            name: "scoped".to_string(),
            description: String::new(),
            policies: vec![RolePolicy {
                effect: Effect::Deny,
                actions: vec![RoleAction::Semantic {
                    action: "workflow:Delete".to_string(),
                }],
                resources: Some(vec![]),
            }],
            immutable: false,
        };
        let converted = to_semantic(&role);
        assert_eq!(converted.policies[0].resources, Some(vec![]));
        assert_eq!(converted.policies[0].effect, Effect::Deny);
    }

    #[test]
    fn unconvertible_legacy_rules_are_reported() {
        let role = Role {
            name: "migrated".to_string(),
            description: String::new(),
            policies: vec![RolePolicy {
                effect: Effect::Allow,
                actions: vec![
                    legacy("!/api/nowhere", "GET"),
                    legacy("/api/nonsense/*", "GET"),
                ],
                resources: None,
            }],
            immutable: false,
        };
        assert_eq!(
            first_unconvertible(&role),
            Some("GET /api/nonsense/*".to_string())
        );

        let role = Role {
            name: "migrated".to_string(),
            description: String::new(),
            policies: vec![RolePolicy {
                effect: Effect::Allow,
                actions: vec![legacy("!/api/nowhere", "GET"), legacy("/api/version", "GET")],
                resources: None,
            }],
            immutable: false,
        };
        assert_eq!(first_unconvertible(&role), None);
    }

    #[test]
    fn path_overlap_rules() {
        assert!(paths_overlap("/api/workflow", "/api/workflow"));
        assert!(paths_overlap("/api/workflow/*", "/api/workflow"));
        assert!(paths_overlap("/api/workflow/*", "/api/workflow/w1/logs"));
        assert!(paths_overlap("/*", "/api/anything"));
        assert!(!paths_overlap("/api/workflow/*", "/api/bucket"));
        assert!(!paths_overlap("/api/pool/*/workflow", "/api/workflow"));
        assert!(paths_overlap("/api/pool/*/workflow", "/api/pool/prod/workflow"));
    }
}
