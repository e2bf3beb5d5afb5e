use std::{env, path::PathBuf};

use clap::Parser;

use crate::error::AppError;

/// Serve a directory of markdown files in the browser.
#[derive(Debug, Parser)]
#[command(name = "mdview", version, about)]
pub struct Cli {
    /// Workspace directory to serve (defaults to the current directory)
    pub root: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub root_dir: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub client_dist: PathBuf,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_env(&Cli::parse())
    }

    pub fn from_env(cli: &Cli) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let host = cli
            .host
            .clone()
            .or_else(|| env::var("SERVER_HOST").ok())
            .unwrap_or_else(|| "127.0.0.1".into());

        let port: u16 = match cli.port {
            Some(port) => port,
            None => env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3456".into())
                .parse()
                .map_err(|err| AppError::Config(format!("invalid SERVER_PORT: {err}")))?,
        };

        let root_dir = cli
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from(env::var("MDVIEW_ROOT").unwrap_or_else(|_| ".".into())));

        let log_dir = env::var("MDVIEW_LOG_DIR").ok().map(PathBuf::from);

        let client_dist = PathBuf::from(
            env::var("MDVIEW_CLIENT_DIST").unwrap_or_else(|_| "./client/dist".into()),
        );

        Ok(Self {
            host,
            port,
            root_dir,
            log_dir,
            client_dist,
        })
    }
}
