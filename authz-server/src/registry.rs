//! The endpoint registry: the authoritative enumeration of every path the
//! gateway exposes, keyed by semantic action.
//!
//! Paths are slash-delimited glob patterns. A trailing `*` consumes one or
//! more segments, a middle `*` exactly one. Method sets may contain the
//! standard HTTP verbs, `WEBSOCKET`, or `*`.

pub const METHOD_ANY: &str = "*";
pub const WEBSOCKET: &str = "WEBSOCKET";

#[derive(Debug, Clone, Copy)]
pub struct EndpointDef {
    pub action: &'static str,
    pub path: &'static str,
    pub methods: &'static [&'static str],
}

const fn endpoint(
    action: &'static str,
    path: &'static str,
    methods: &'static [&'static str],
) -> EndpointDef {
    EndpointDef {
        action,
        path,
        methods,
    }
}

/// Unknown paths resolve to no action and are denied by default at the
/// check handler unless a universal wildcard policy admits them.
pub const ENDPOINTS: &[EndpointDef] = &[
    endpoint("system:Version", "/api/version", &["GET"]),
    endpoint("auth:Login", "/api/auth/login", &["POST"]),
    endpoint("auth:Logout", "/api/auth/logout", &["POST"]),
    endpoint("auth:Token", "/api/auth/user/*/token", &["POST", "DELETE"]),
    endpoint("user:Read", "/api/user/*", &["GET"]),
    endpoint("user:Update", "/api/user/*", &["PUT"]),
    endpoint("profile:Read", "/api/profile", &["GET"]),
    endpoint("profile:Update", "/api/profile", &["PUT"]),
    endpoint("credentials:List", "/api/credentials", &["GET"]),
    endpoint("credentials:Create", "/api/credentials", &["POST"]),
    endpoint("credentials:Delete", "/api/credentials/*", &["DELETE"]),
    endpoint("app:Download", "/api/app/*", &["GET"]),
    endpoint("resources:Read", "/api/resources", &["GET"]),
    endpoint("pool:List", "/api/pool", &["GET"]),
    endpoint("bucket:List", "/api/bucket", &["GET"]),
    endpoint("bucket:Create", "/api/bucket", &["POST"]),
    endpoint("bucket:Read", "/api/bucket/*", &["GET"]),
    endpoint("bucket:Update", "/api/bucket/*", &["PUT"]),
    endpoint("bucket:Delete", "/api/bucket/*", &["DELETE"]),
    endpoint("config:List", "/api/configs", &["GET"]),
    endpoint("config:Read", "/api/configs/*", &["GET"]),
    endpoint("config:Write", "/api/configs/*", &["POST", "PUT"]),
    endpoint("config:Delete", "/api/configs/*", &["DELETE"]),
    endpoint("workflow:Create", "/api/workflow", &["POST"]),
    endpoint("workflow:Create", "/api/pool/*/workflow", &["POST"]),
    endpoint("workflow:List", "/api/workflow", &["GET"]),
    endpoint("workflow:Read", "/api/workflow/*", &["GET"]),
    endpoint("workflow:Update", "/api/workflow/*", &["PUT", "PATCH"]),
    endpoint("workflow:Delete", "/api/workflow/*", &["DELETE"]),
    endpoint("workflow:Exec", "/api/router/exec/*", &[WEBSOCKET]),
    endpoint("workflow:PortForward", "/api/router/portforward/*", &[WEBSOCKET]),
    endpoint("workflow:Rsync", "/api/router/rsync/*", &["POST", WEBSOCKET]),
    endpoint("workflow:WebServer", "/api/router/webserver/*", &["GET", WEBSOCKET]),
    endpoint("internal:Operator", "/api/agent/*", &[METHOD_ANY]),
    endpoint("internal:Logger", "/api/logger/*", &["POST"]),
    endpoint("internal:Router", "/api/router/*", &[WEBSOCKET]),
];
