use rust_embed::RustEmbed;
use sqlx::SqlitePool;

use crate::error::{Error, ErrorType};

#[derive(RustEmbed)]
#[folder = "migrations/"]
struct Migrations;

/// Apply the embedded migration scripts in filename order. Statements are
/// idempotent, so re-running on an existing database is safe.
pub async fn migrate(pool: &SqlitePool) -> Result<(), Error> {
    let mut filenames: Vec<String> = Migrations::iter().map(|file| file.to_string()).collect();
    filenames.sort();

    for filename in filenames {
        let file = Migrations::get(&filename).ok_or_else(|| {
            Error::from(ErrorType::BadData(format!(
                "Missing embedded migration `{filename}`"
            )))
        })?;
        let script = std::str::from_utf8(file.data.as_ref()).map_err(|_| {
            Error::from(ErrorType::BadData(format!(
                "Migration `{filename}` is not valid UTF-8"
            )))
        })?;

        for statement in script.split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                continue;
            }
            sqlx::query(statement)
                .execute(pool)
                .await
                .map_err(|error| ErrorType::Migration {
                    filename: filename.clone(),
                    error,
                })?;
        }
    }
    Ok(())
}
