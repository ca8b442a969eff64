use colored::Colorize;
use config::{Config, ConfigError, DatabaseConfig};
use log::{error, info};
use radio_collab::{Collab, DatabaseError, MemoryDatabase, SurrealDatabase, Tokens};
use radio_server::ServerContext;
use thiserror::Error;
use tokio::runtime::{self, Runtime};

use crate::logging::LogColor;

mod config;
mod logging;

pub struct Radio {
    config: Config,
    context: ServerContext,
    runtime: Runtime,
}

#[derive(Debug, Error)]
enum RadioError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not initialize database: {0}")]
    Database(#[from] DatabaseError),

    #[error("Could not start the server: {0}")]
    Server(#[from] std::io::Error),

    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl Radio {
    fn new() -> Result<Self, RadioError> {
        let config = Config::from_env()?;
        config.warn_insecure_defaults();

        info!("Building async runtime...");
        let runtime = runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("radio-async")
            .build()
            .map_err(|e| RadioError::Fatal(e.to_string()))?;

        let tokens = Tokens::new(config.jwt_secret.as_bytes(), config.token_ttl);

        let collab = match &config.database {
            DatabaseConfig::Memory => Collab::new(MemoryDatabase::new(), tokens),
            DatabaseConfig::Surreal(options) => {
                info!("Connecting to database at {}...", options.url);
                let database = runtime.block_on(SurrealDatabase::new(options))?;

                Collab::new(database, tokens)
            }
        };

        Ok(Self {
            context: ServerContext::new(collab),
            config,
            runtime,
        })
    }

    fn run(self) -> Result<(), RadioError> {
        let Self {
            config,
            context,
            runtime,
        } = self;

        runtime.block_on(radio_server::run_server(context, config.server))?;

        Ok(())
    }
}

impl RadioError {
    fn hint(&self) -> String {
        match self {
            RadioError::Config(_) => "Check the RADIO_* environment variables and try again.".to_string(),
            RadioError::Database(_) => "This is a database error. Make sure the SurrealDB instance is running and the RADIO_DATABASE_* credentials are correct, or unset RADIO_DATABASE_URL to use the in-memory store.".to_string(),
            RadioError::Server(_) => "Make sure RADIO_SERVER_PORT is not already in use.".to_string(),
            RadioError::Fatal(_) => "This error is fatal, and should not happen.".to_string(),
        }
    }
}

fn main() {
    if let Err(error) = logging::init_logger() {
        eprintln!("Could not initialize logging: {}", error);
        return;
    }

    let result = Radio::new().and_then(|radio| {
        info!("Initialized successfully.");
        radio.run()
    });

    if let Err(error) = result {
        error!(
            "{} Read the error below to troubleshoot the issue.",
            "Radio failed to start!".bold().color(LogColor::RED)
        );
        error!("{}", error);
        error!(
            "{}",
            format!("Hint: {}", error.hint())
                .color(LogColor::DIMMED)
                .italic()
        );
    }
}
