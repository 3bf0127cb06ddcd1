//! Matching rules for semantic actions and resource identifiers.
//!
//! A semantic action is a `resource:Verb` string such as `workflow:Create`.
//! A resource identifier is either empty (global actions that need no scope
//! check), `scope/id`, or `scope/*`.

/// Returns true if `pattern` matches any action, including the empty action
/// of an unregistered endpoint.
#[must_use]
pub fn is_universal_action(pattern: &str) -> bool {
    pattern == "*" || pattern == "*:*"
}

/// Match a policy action `pattern` against a resolved semantic `action`.
///
/// `*` and `*:*` match anything, `R:*` matches any verb on resource type
/// `R`, and `*:V` matches verb `V` on any resource type. An empty resolved
/// action (unregistered endpoint) is matched only by the universal wildcard.
#[must_use]
pub fn action_matches(pattern: &str, action: &str) -> bool {
    if is_universal_action(pattern) {
        return true;
    }
    if action.is_empty() {
        return false;
    }
    let Some((pattern_type, pattern_verb)) = pattern.split_once(':') else {
        return false;
    };
    let Some((resource_type, verb)) = action.split_once(':') else {
        return false;
    };
    (pattern_type == "*" || pattern_type == resource_type)
        && (pattern_verb == "*" || pattern_verb == verb)
}

/// Match a policy resource `pattern` against a resolved resource `target`.
///
/// An empty target matches every pattern. A `scope/*` on either side matches
/// the other when the scope prefixes agree; the wildcard target arises when a
/// workflow cannot be mapped back to its pool.
#[must_use]
pub fn resource_matches(pattern: &str, target: &str) -> bool {
    if pattern == "*" || target.is_empty() || pattern == target {
        return true;
    }
    let Some((pattern_scope, pattern_id)) = pattern.split_once('/') else {
        return false;
    };
    let Some((target_scope, target_id)) = target.split_once('/') else {
        return false;
    };
    pattern_scope == target_scope && (pattern_id == "*" || target_id == "*")
}
