use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default, so an empty environment yields a working service.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub output_dir: PathBuf,
    pub counter_path: PathBuf,
    pub customers_path: PathBuf,
    /// Whitespace-separated command with `{copies}` / `{path}` placeholders.
    pub print_command: Option<String>,
    pub logo_path: PathBuf,
    pub contact_lines: Vec<String>,
    pub signatory: String,
    pub default_copies: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let default_copies = env_or("DEFAULT_COPIES", "3")
            .parse::<u32>()
            .context("DEFAULT_COPIES must be a positive integer")?;
        anyhow::ensure!(default_copies >= 1, "DEFAULT_COPIES must be at least 1");

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            output_dir: env_or("RECEIPTS_OUTPUT_DIR", "Receipts").into(),
            counter_path: env_or("RECEIPT_COUNTER_PATH", "receipt_number.json").into(),
            customers_path: env_or("CUSTOMERS_PATH", "customers.json").into(),
            print_command: std::env::var("PRINT_COMMAND")
                .ok()
                .filter(|cmd| !cmd.trim().is_empty()),
            logo_path: env_or("LOGO_PATH", "logo.png").into(),
            contact_lines: split_contact_lines(&env_or(
                "CONTACT_LINES",
                "Company Information Placeholder",
            )),
            signatory: env_or("SIGNATURE_NAME", "Name Placeholder"),
            default_copies,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// `|` separates lines of the contact block.
fn split_contact_lines(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
