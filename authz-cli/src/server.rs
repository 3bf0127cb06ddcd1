use clap::Args;

#[derive(Args, Debug)]
pub struct Server {
    /// Path to a TOML config file. Flags below are ignored when set.
    #[arg(short, long, env = "OSMO_AUTHZ_CONFIG")]
    config: Option<String>,

    #[arg(long, default_value = "127.0.0.1:9411", env = "OSMO_AUTHZ_LISTEN")]
    listen_address: String,

    #[arg(long, default_value = "sqlite://osmo-authz.db", env = "OSMO_AUTHZ_DB")]
    db_connection_string: String,

    #[arg(long, value_parser = humantime::parse_duration)]
    policy_reload_interval: Option<std::time::Duration>,
}

impl Server {
    pub async fn handle(self) {
        let config = match self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .unwrap_or_else(|err| panic!("failed to read config `{path}`: {err}"));
                toml::from_str(&raw)
                    .unwrap_or_else(|err| panic!("failed to parse config `{path}`: {err}"))
            }
            None => authz_server::Config {
                listen_address: self.listen_address,
                port_tx: None,
                db_connection_string: self.db_connection_string,
                cache: authz_server::CacheConfig::default(),
                policy_reload_interval: self.policy_reload_interval,
            },
        };

        if let Err(err) = authz_server::start(config, authz_server::shutdown_signal()).await {
            eprintln!("server error: {err}");
            std::process::exit(1);
        }
    }
}
