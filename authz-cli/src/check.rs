use authz_sdk::Client;
use authz_types::check::CheckRequest;
use clap::Args;

#[derive(Args, Debug)]
pub struct Check {
    /// Path of the request under authorization, e.g. /api/workflow/w1
    path: String,

    #[arg(short, long, default_value = "GET")]
    method: String,

    #[arg(short, long, default_value = "")]
    user: String,

    /// Comma-separated role names
    #[arg(short, long, default_value = "")]
    roles: String,
}

impl Check {
    pub async fn handle(self, sdk: &Client) {
        let req = CheckRequest::new(&self.method, &self.path, &self.user, &self.roles);
        match sdk.check.check(&req).await {
            Ok(resp) => print_json(&resp),
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        }
    }
}

pub fn print_json<T: serde::Serialize>(payload: &T) {
    match serde_json::to_string_pretty(payload) {
        Ok(raw) => println!("{raw}"),
        Err(err) => eprintln!("failed to render response: {err}"),
    }
}
