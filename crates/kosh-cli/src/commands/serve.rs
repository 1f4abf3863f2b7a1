//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use kosh_core::AnalysisConfig;
use kosh_server::{ServerConfig, API_KEYS_ENV};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
    analysis: AnalysisConfig,
) -> Result<()> {
    println!("🚀 Starting Kosh web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    let config = ServerConfig::from_env(!no_auth);

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else if config.api_keys.is_empty() {
        println!();
        println!(
            "   ⚠️  No API keys configured. Set {} or every request will be rejected.",
            API_KEYS_ENV
        );
    } else {
        println!(
            "   🔑 API keys: {} configured ({})",
            config.api_keys.len(),
            API_KEYS_ENV
        );
    }

    let db = open_db(db_path, no_encrypt)?;

    kosh_server::serve_with_config(db, host, port, config, analysis)
        .await
        .context("Server error")
}
