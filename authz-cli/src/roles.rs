use authz_sdk::Client;
use authz_types::role::Role;
use clap::{Args, Subcommand};

use crate::check::print_json;

#[derive(Args, Debug)]
pub struct Roles {
    #[command(subcommand)]
    command: RoleCommands,
}

#[derive(Subcommand, Debug)]
enum RoleCommands {
    #[command(about = "list all roles")]
    List,
    #[command(about = "read one role")]
    Read { name: String },
    #[command(about = "create or replace a role from a JSON document")]
    Write {
        /// Path to a JSON role document
        file: String,
    },
    #[command(about = "delete a role")]
    Delete { name: String },
}

impl Roles {
    pub async fn handle(self, sdk: &Client) {
        let result = match self.command {
            RoleCommands::List => sdk.roles.list().await.map(|resp| print_json(&resp)),
            RoleCommands::Read { name } => sdk.roles.read(&name).await.map(|resp| print_json(&resp)),
            RoleCommands::Write { file } => {
                let raw = match std::fs::read_to_string(&file) {
                    Ok(raw) => raw,
                    Err(err) => {
                        eprintln!("failed to read `{file}`: {err}");
                        std::process::exit(1);
                    }
                };
                let role: Role = match serde_json::from_str(&raw) {
                    Ok(role) => role,
                    Err(err) => {
                        eprintln!("`{file}` is not a valid role document: {err}");
                        std::process::exit(1);
                    }
                };
                sdk.roles.write(role).await.map(|resp| print_json(&resp))
            }
            RoleCommands::Delete { name } => {
                sdk.roles.remove(&name).await.map(|resp| print_json(&resp))
            }
        };

        if let Err(err) = result {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
