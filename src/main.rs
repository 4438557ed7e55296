// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! taskd - personal task management service
//!
//! Entry point for the HTTP server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use taskd::config::Settings;
use taskd::error::Result;
use taskd::http::{router, AppState};
use taskd::store::Database;

#[derive(Parser)]
#[command(name = "taskd", version, about = "Personal task management service")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,
    },
    /// Write a default configuration file
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.server.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::InitConfig) => {
            let path = cli
                .config
                .unwrap_or_else(Settings::default_config_path);
            Settings::write_default(&path)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
        Some(Commands::Serve { bind }) => serve(settings, bind).await,
        None => serve(settings, None).await,
    }
}

async fn serve(settings: Settings, bind: Option<String>) -> Result<()> {
    let bind_addr = bind.unwrap_or_else(|| settings.server.bind_addr.clone());

    let db = Database::new(&settings.database.path);
    db.init()?;
    info!(path = %settings.database.path.display(), "database ready");

    let state = AppState::from_settings(settings, db)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::try_parse_from(["taskd"]).expect("valid command parsing");
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_serve_with_bind_override() {
        let cli = Cli::try_parse_from(["taskd", "serve", "--bind", "0.0.0.0:9000"])
            .expect("valid command parsing");
        assert!(matches!(
            cli.command,
            Some(Commands::Serve { bind: Some(ref b) }) if b == "0.0.0.0:9000"
        ));
    }

    #[test]
    fn test_init_config_with_global_config_flag() {
        let cli = Cli::try_parse_from(["taskd", "init-config", "--config", "/tmp/taskd.toml"])
            .expect("valid command parsing");
        assert!(matches!(cli.command, Some(Commands::InitConfig)));
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/tmp/taskd.toml"))
        );
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["taskd", "frobnicate"]).is_err());
    }
}
