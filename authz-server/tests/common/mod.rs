use authz_sdk::Client;
use authz_types::role::{Effect, Role, RoleAction, RolePolicy};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::sync::oneshot;

pub async fn setup(db_connection_string: &str) -> Client {
    let (port_tx, port_rx) = oneshot::channel();

    let config = authz_server::Config {
        listen_address: "127.0.0.1:0".to_string(),
        port_tx: Some(port_tx),
        db_connection_string: db_connection_string.to_string(),
        cache: authz_server::CacheConfig::default(),
        policy_reload_interval: None,
    };

    tokio::spawn(async move {
        if let Err(err) = authz_server::start(config, authz_server::shutdown_signal()).await {
            panic!("server error: {err}");
        }
    });

    let port = port_rx.await.expect("the server reports its port");
    Client::new(format!("http://localhost:{port}/v1"))
}

#[allow(dead_code)]
pub async fn setup_inmemory() -> Client {
    setup(":memory:").await
}

/// Boot a server against a file-backed database and hand back a second
/// connection to it, so tests can seed the tables owned by other services
/// (workflows, pools).
#[allow(dead_code)]
pub async fn setup_with_storage() -> (Client, SqlitePool, tempfile::TempDir) {
    let tmpdir = tempfile::tempdir().expect("a temporary directory");
    let db_path = tmpdir
        .path()
        .join("authz.db")
        .to_str()
        .expect("a valid path")
        .to_string();

    let sdk = setup(&db_path).await;

    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(SqliteConnectOptions::new().filename(&db_path))
        .await
        .expect("a connection to the test database");

    (sdk, db, tmpdir)
}

#[allow(dead_code)]
pub fn role(name: &str, policies: Vec<RolePolicy>) -> Role {
    Role {
        name: name.to_string(),
        description: String::new(),
        policies,
        immutable: false,
    }
}

#[allow(dead_code)]
pub fn policy(effect: Effect, actions: &[&str], resources: &[&str]) -> RolePolicy {
    RolePolicy {
        effect,
        actions: actions
            .iter()
            .map(|action| RoleAction::Semantic {
                action: (*action).to_string(),
            })
            .collect(),
        resources: Some(resources.iter().map(ToString::to_string).collect()),
    }
}
