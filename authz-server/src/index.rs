//! Pattern index derived once from the endpoint registry.
//!
//! Provides O(1) lookup for exact paths and specificity-ordered candidate
//! lists for everything else. Immutable after construction.

use std::collections::HashMap;

use crate::registry::{EndpointDef, METHOD_ANY};

#[derive(Debug)]
pub struct CompiledPattern {
    pub action: &'static str,
    pub path: &'static str,
    pub methods: &'static [&'static str],
    parts: Vec<&'static str>,
    is_exact: bool,
    has_trail_wild: bool,
    /// Index of the first `*` segment, -1 when none.
    wildcard_pos: i32,
    specificity: i32,
    /// Bucket key: the resource segment after the shared API root. The
    /// leading literal is identical across the whole registry and would not
    /// partition anything.
    prefix: Option<&'static str>,
}

impl CompiledPattern {
    fn new(def: &EndpointDef) -> Self {
        let parts: Vec<&'static str> = def.path.split('/').collect();
        let is_exact = !parts.contains(&"*");
        let has_trail_wild = parts.last() == Some(&"*");
        let wildcard_pos = parts
            .iter()
            .position(|part| *part == "*")
            .and_then(|pos| i32::try_from(pos).ok())
            .unwrap_or(-1);

        let mut specificity = if is_exact { 100 } else { 0 };
        for (i, part) in parts.iter().enumerate() {
            if *part != "*" && !part.is_empty() {
                specificity += 10 - i32::try_from(i).unwrap_or(10);
            }
        }

        let prefix = resource_segment(&parts).filter(|segment| *segment != "*");

        Self {
            action: def.action,
            path: def.path,
            methods: def.methods,
            parts,
            is_exact,
            has_trail_wild,
            wildcard_pos,
            specificity,
            prefix,
        }
    }

    pub fn matches_method(&self, method: &str) -> bool {
        self.methods
            .iter()
            .any(|m| *m == METHOD_ANY || m.eq_ignore_ascii_case(method))
    }

    /// Segment-wise path match. A trailing `*` consumes at least one extra
    /// segment; a middle `*` exactly one, so segment counts must line up.
    pub fn matches_path(&self, req_parts: &[&str]) -> bool {
        if self.has_trail_wild {
            req_parts.len() >= self.parts.len()
                && self.parts[..self.parts.len() - 1]
                    .iter()
                    .zip(req_parts)
                    .all(|(pattern, req)| *pattern == "*" || pattern == req)
        } else {
            req_parts.len() == self.parts.len()
                && self
                    .parts
                    .iter()
                    .zip(req_parts)
                    .all(|(pattern, req)| *pattern == "*" || pattern == req)
        }
    }
}

/// Second non-empty segment of a split path: `workflow` in
/// `/api/workflow/*`.
fn resource_segment<'a>(parts: &[&'a str]) -> Option<&'a str> {
    parts.iter().copied().filter(|part| !part.is_empty()).nth(1)
}

#[derive(Debug)]
pub struct PatternIndex {
    patterns: Vec<CompiledPattern>,
    /// path -> method -> pattern, for exact patterns only.
    exact: HashMap<&'static str, HashMap<&'static str, usize>>,
    by_method: HashMap<&'static str, Vec<usize>>,
    /// resource segment -> patterns, specificity-ordered.
    by_prefix: HashMap<&'static str, Vec<usize>>,
}

impl PatternIndex {
    #[must_use]
    pub fn new(endpoints: &[EndpointDef]) -> Self {
        let patterns: Vec<CompiledPattern> = endpoints.iter().map(CompiledPattern::new).collect();

        let mut exact: HashMap<&'static str, HashMap<&'static str, usize>> = HashMap::new();
        let mut by_method: HashMap<&'static str, Vec<usize>> = HashMap::new();
        let mut by_prefix: HashMap<&'static str, Vec<usize>> = HashMap::new();

        for (idx, pattern) in patterns.iter().enumerate() {
            if pattern.is_exact {
                let methods = exact.entry(pattern.path).or_default();
                for method in pattern.methods {
                    methods.insert(*method, idx);
                }
            }

            for method in pattern.methods {
                by_method.entry(*method).or_default().push(idx);
            }

            if let Some(prefix) = pattern.prefix {
                by_prefix.entry(prefix).or_default().push(idx);
            }
        }

        let order = |a: &usize, b: &usize| {
            let (a, b) = (&patterns[*a], &patterns[*b]);
            b.specificity
                .cmp(&a.specificity)
                .then(b.wildcard_pos.cmp(&a.wildcard_pos))
        };
        for list in by_method.values_mut() {
            list.sort_by(order);
        }
        for list in by_prefix.values_mut() {
            list.sort_by(order);
        }

        Self {
            patterns,
            exact,
            by_method,
            by_prefix,
        }
    }

    /// Resolve an already-normalized `(path, method)` to the most specific
    /// matching pattern.
    #[must_use]
    pub fn lookup(&self, path: &str, method: &str) -> Option<&CompiledPattern> {
        if let Some(methods) = self.exact.get(path) {
            if let Some(idx) = methods.get(method).or_else(|| methods.get(METHOD_ANY)) {
                return Some(&self.patterns[*idx]);
            }
        }

        let req_parts: Vec<&str> = path.split('/').collect();
        let prefix = resource_segment(&req_parts).unwrap_or_default();

        let mut candidates: Vec<usize> = self
            .by_prefix
            .get(prefix)
            .map(|idxs| {
                idxs.iter()
                    .copied()
                    .filter(|idx| self.patterns[*idx].matches_method(method))
                    .collect()
            })
            .unwrap_or_default();

        if candidates.is_empty() {
            for key in [method, METHOD_ANY] {
                if let Some(idxs) = self.by_method.get(key) {
                    candidates.extend(idxs.iter().copied());
                }
            }
            candidates.sort_unstable();
            candidates.dedup();
            candidates.sort_by(|a, b| {
                let (a, b) = (&self.patterns[*a], &self.patterns[*b]);
                b.specificity
                    .cmp(&a.specificity)
                    .then(b.wildcard_pos.cmp(&a.wildcard_pos))
            });
        }

        candidates
            .iter()
            .map(|idx| &self.patterns[*idx])
            .find(|pattern| pattern.matches_path(&req_parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ENDPOINTS;

    fn index() -> PatternIndex {
        PatternIndex::new(ENDPOINTS)
    }

    fn action_of(path: &str, method: &str) -> Option<&'static str> {
        index().lookup(path, method).map(|pattern| pattern.action)
    }

    #[test]
    fn exact_paths_win_over_wildcards() {
        assert_eq!(action_of("/api/workflow", "GET"), Some("workflow:List"));
        assert_eq!(action_of("/api/workflow", "POST"), Some("workflow:Create"));
        assert_eq!(action_of("/api/workflow/w1", "GET"), Some("workflow:Read"));
    }

    #[test]
    fn method_disambiguates_shared_paths() {
        assert_eq!(action_of("/api/bucket", "GET"), Some("bucket:List"));
        assert_eq!(action_of("/api/bucket", "POST"), Some("bucket:Create"));
        assert_eq!(action_of("/api/bucket/b1", "PUT"), Some("bucket:Update"));
        assert_eq!(action_of("/api/bucket/b1", "DELETE"), Some("bucket:Delete"));
    }

    #[test]
    fn trailing_wildcard_needs_at_least_one_segment() {
        assert_eq!(action_of("/api/agent", "GET"), None);
        assert_eq!(
            action_of("/api/agent/listener", "GET"),
            Some("internal:Operator")
        );
        assert_eq!(
            action_of("/api/agent/listener/status", "GET"),
            Some("internal:Operator")
        );
    }

    #[test]
    fn middle_wildcard_requires_equal_segment_count() {
        assert_eq!(
            action_of("/api/pool/prod/workflow", "POST"),
            Some("workflow:Create")
        );
        assert_eq!(action_of("/api/pool/prod/extra/workflow", "POST"), None);
        assert_eq!(
            action_of("/api/auth/user/u1/token", "POST"),
            Some("auth:Token")
        );
        assert_eq!(action_of("/api/auth/user/token", "POST"), None);
    }

    #[test]
    fn deeper_literals_beat_shallow_wildcards() {
        assert_eq!(
            action_of("/api/router/exec/w1", "WEBSOCKET"),
            Some("workflow:Exec")
        );
        assert_eq!(
            action_of("/api/router/backend-7/connect", "WEBSOCKET"),
            Some("internal:Router")
        );
    }

    #[test]
    fn wildcard_method_matches_everything() {
        for method in ["GET", "POST", "DELETE", "WEBSOCKET"] {
            assert_eq!(
                action_of("/api/agent/listener", method),
                Some("internal:Operator")
            );
        }
    }

    #[test]
    fn unknown_paths_resolve_to_nothing() {
        assert_eq!(action_of("/api/unknown", "GET"), None);
        assert_eq!(action_of("/metrics", "GET"), None);
    }

    #[test]
    fn prefix_buckets_partition_by_resource_segment() {
        let index = index();
        assert!(index.by_prefix.len() > 1, "buckets did not partition");
        for (prefix, idxs) in &index.by_prefix {
            for idx in idxs {
                assert_eq!(index.patterns[*idx].prefix, Some(*prefix));
            }
        }

        let workflow = index.by_prefix.get("workflow").expect("workflow bucket");
        let bucket = index.by_prefix.get("bucket").expect("bucket bucket");
        assert!(workflow.iter().all(|idx| !bucket.contains(idx)));
    }
}
