//! CLI command implementations
//!
//! Both commands load the same JSON config file. `init` creates it with
//! defaults when missing; `serve` falls back to defaults (with a warning)
//! so a fresh checkout can serve in-memory with zero setup.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::http_server::{HttpConfig, HttpServer};
use crate::observability::Logger;
use crate::service::IncidentService;
use crate::store::{IncidentRepository, MemoryStore, SqliteStore};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// HTTP server section
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_database_path() -> String {
    "./incidents.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the file when present, defaults otherwise
    pub fn load_or_default(path: &Path) -> CliResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Logger::warn(
                "CONFIG_DEFAULTED",
                &[("path", path.display().to_string().as_str())],
            );
            Ok(Self::default())
        }
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.database_path.trim().is_empty() {
            return Err(CliError::config_error("database_path must not be empty"));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be > 0"));
        }

        Ok(())
    }
}

/// Parse arguments and dispatch to the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Command::Init { config } => init(&config),
        Command::Serve { config, memory } => serve(&config, memory),
    }
}

/// Create the config file (when absent) and the database schema
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = if config_path.exists() {
        Config::load(config_path)?
    } else {
        let config = Config::default();
        let content = serde_json::to_string_pretty(&config)?;
        fs::write(config_path, content)
            .map_err(|e| CliError::config_error(format!("Failed to write config: {}", e)))?;
        Logger::info(
            "CONFIG_CREATED",
            &[("path", config_path.display().to_string().as_str())],
        );
        config
    };

    let store = SqliteStore::open(Path::new(&config.database_path))
        .map_err(|e| CliError::boot_failed(e.to_string()))?;
    store
        .init_schema()
        .map_err(|e| CliError::boot_failed(e.to_string()))?;

    Logger::info(
        "INIT_COMPLETE",
        &[("database", config.database_path.as_str())],
    );
    Ok(())
}

/// Boot the store and serve HTTP until shutdown
pub fn serve(config_path: &Path, memory: bool) -> CliResult<()> {
    let config = Config::load_or_default(config_path)?;

    if memory {
        let service = Arc::new(IncidentService::new(MemoryStore::new()));
        Logger::info("STORE_OPENED", &[("backend", "memory")]);
        return run_server(service, config.http);
    }

    let store = SqliteStore::open(Path::new(&config.database_path))
        .map_err(|e| CliError::boot_failed(e.to_string()))?;
    store
        .init_schema()
        .map_err(|e| CliError::boot_failed(e.to_string()))?;
    Logger::info(
        "STORE_OPENED",
        &[
            ("backend", "sqlite"),
            ("database", config.database_path.as_str()),
        ],
    );

    let service = Arc::new(IncidentService::new(store));
    run_server(service, config.http)
}

fn run_server<R: IncidentRepository + 'static>(
    service: Arc<IncidentService<R>>,
    http: HttpConfig,
) -> CliResult<()> {
    let server = HttpServer::new(service, http);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::boot_failed(format!("Failed to start runtime: {}", e)))?;

    runtime
        .block_on(server.start())
        .map_err(|e| CliError::boot_failed(e.to_string()))
}
