//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::db::Database;
use clap::Parser;
use tracing::{error, info};

const MIN_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "Flashdeck", about = "Flashcard learning backend")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "7310")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, default_value = "flashdeck.db")]
    pub database: String,

    /// Path to file containing the access-token secret.
    /// Prefer using the ACCESS_TOKEN_SECRET env var instead
    #[arg(long)]
    pub access_secret_file: Option<String>,

    /// Path to file containing the refresh-token secret.
    /// Prefer using the REFRESH_TOKEN_SECRET env var instead
    #[arg(long)]
    pub refresh_secret_file: Option<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load a signing secret from an environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_secret(env_var: &str, secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var(env_var) {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var(env_var) };
        secret
    } else if let Some(path) = secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read secret file");
                return None;
            }
        }
    } else {
        error!(
            "Signing secret is required. Set the {} environment variable (recommended) or use the corresponding --*-secret-file flag",
            env_var
        );
        return None;
    };

    if secret.len() < MIN_SECRET_LENGTH {
        error!(
            "Secret from {} is shorter than {} characters. Use a longer secret",
            env_var, MIN_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Build ServerConfig from validated arguments.
pub fn build_config(db: Database, access_secret: String, refresh_secret: String) -> ServerConfig {
    ServerConfig {
        db,
        access_secret: access_secret.into_bytes(),
        refresh_secret: refresh_secret.into_bytes(),
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
