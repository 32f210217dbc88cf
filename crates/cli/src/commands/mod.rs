//! CLI subcommands.

pub mod migrate;
pub mod user;

/// Database URL from `STORE_DATABASE_URL`, falling back to `DATABASE_URL`.
fn database_url() -> Option<String> {
    dotenvy::dotenv().ok();

    std::env::var("STORE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}
