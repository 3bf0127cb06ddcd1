use serde::{Deserialize, Serialize};

use crate::action::{action_matches, is_universal_action, resource_matches};

/// A named collection of policies, loaded from the `roles` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub policies: Vec<RolePolicy>,
    #[serde(default)]
    pub immutable: bool,
}

/// Whether a matching policy grants or revokes the request.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

/// One `(effect, actions, resources)` entry of a role document.
///
/// An absent `resources` field is distinct from an explicitly empty one: the
/// converter rewrites absent to `["*"]`, while an empty list grants no scoped
/// resource at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RolePolicy {
    #[serde(default)]
    pub effect: Effect,
    #[serde(default)]
    pub actions: Vec<RoleAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
}

/// Serialized form of a policy action: either a semantic `resource:Verb`
/// reference, or a legacy path/method rule awaiting conversion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RoleAction {
    Semantic {
        action: String,
    },
    Legacy {
        base: String,
        path: String,
        method: String,
    },
}

/// Outcome of evaluating one or more roles against a resolved
/// `(action, resource)` pair. `denied` is set iff an explicit Deny matched.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Verdict {
    pub allowed: bool,
    pub denied: bool,
    pub matched: bool,
    pub matched_action: String,
    pub matched_resource: String,
    pub role_name: String,
}

impl RolePolicy {
    #[must_use]
    pub fn resources(&self) -> &[String] {
        self.resources.as_deref().unwrap_or_default()
    }

    fn admits_resource(&self, target: &str) -> bool {
        let resources = self.resources();
        if resources.is_empty() {
            // No scoped resource is granted; only a target without a scope
            // check passes.
            return target.is_empty();
        }
        resources.iter().any(|pattern| resource_matches(pattern, target))
    }

    fn matches(&self, pattern: &str, action: &str, resource: &str) -> bool {
        if is_universal_action(pattern) {
            // The only route by which an unregistered endpoint (empty action)
            // may match.
            return self.admits_resource(resource);
        }
        if action.is_empty() {
            return false;
        }
        action_matches(pattern, action) && self.admits_resource(resource)
    }
}

impl Role {
    /// Evaluate this role against a resolved `(action, resource)` pair.
    ///
    /// Policies are walked once: a matching Deny returns immediately, a
    /// matching Allow is remembered while the scan continues looking for
    /// Denies. Legacy actions are erased by conversion before a role reaches
    /// the evaluator and are skipped here.
    #[must_use]
    pub fn check(&self, action: &str, resource: &str) -> Verdict {
        let mut allow: Option<Verdict> = None;
        for policy in &self.policies {
            for role_action in &policy.actions {
                let RoleAction::Semantic { action: pattern } = role_action else {
                    continue;
                };
                if !policy.matches(pattern, action, resource) {
                    continue;
                }
                let verdict = Verdict {
                    allowed: policy.effect == Effect::Allow,
                    denied: policy.effect == Effect::Deny,
                    matched: true,
                    matched_action: if action.is_empty() {
                        "*:*".to_string()
                    } else {
                        action.to_string()
                    },
                    matched_resource: resource.to_string(),
                    role_name: self.name.clone(),
                };
                match policy.effect {
                    Effect::Deny => return verdict,
                    Effect::Allow => {
                        if allow.is_none() {
                            allow = Some(verdict);
                        }
                    }
                }
            }
        }
        allow.unwrap_or_default()
    }

    /// True if any policy still carries an unconverted legacy action.
    #[must_use]
    pub fn has_legacy_actions(&self) -> bool {
        self.policies.iter().any(|policy| {
            policy
                .actions
                .iter()
                .any(|action| matches!(action, RoleAction::Legacy { .. }))
        })
    }
}

/// Evaluate a resolved `(action, resource)` pair against every role.
///
/// Cross-role union semantics: the first Allow in role-list order wins
/// regardless of Denies in other roles; an explicit Deny is surfaced only
/// when no role allowed; otherwise no role had an opinion.
#[must_use]
pub fn check_roles(roles: &[Role], action: &str, resource: &str) -> Verdict {
    let mut deny: Option<Verdict> = None;
    for role in roles {
        let verdict = role.check(action, resource);
        if verdict.allowed {
            return verdict;
        }
        if verdict.denied && deny.is_none() {
            deny = Some(verdict);
        }
    }
    deny.unwrap_or_default()
}
