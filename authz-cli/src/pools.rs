use authz_sdk::Client;
use clap::Args;

use crate::check::print_json;

#[derive(Args, Debug)]
pub struct Pools {
    #[arg(short, long, default_value = "")]
    user: String,

    /// Comma-separated role names
    #[arg(short, long, default_value = "")]
    roles: String,
}

impl Pools {
    pub async fn handle(self, sdk: &Client) {
        match sdk.pools.allowed(&self.user, &self.roles).await {
            Ok(resp) => print_json(&resp),
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        }
    }
}
