//! OSMO authorization sidecar command-line interface

mod check;
mod pools;
mod roles;
mod server;

use authz_sdk::Client;
use check::Check;
use clap::{command, Parser, Subcommand};
use pools::Pools;
use roles::Roles;
use server::Server;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(
        long,
        env = "OSMO_AUTHZ_ADDR",
        default_value = "http://127.0.0.1:9411/v1"
    )]
    authz_addr: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "start an authorization sidecar")]
    Server(Server),
    #[command(about = "run an ad-hoc authorization check")]
    Check(Check),
    #[command(about = "manage roles")]
    Roles(Roles),
    #[command(about = "list the pools the caller may create workflows in")]
    Pools(Pools),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let sdk = Client::new(cli.authz_addr.clone());

    match cli.command {
        Commands::Server(server) => server.handle().await,
        Commands::Check(check) => check.handle(&sdk).await,
        Commands::Roles(roles) => roles.handle(&sdk).await,
        Commands::Pools(pools) => pools.handle(&sdk).await,
    }
}
