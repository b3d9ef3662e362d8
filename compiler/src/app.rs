//! Core application

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::cli::{self, CliConfig, Commands, OutputFormat};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME, APP_NAME_LOWER, ENV_LOG, STDIN_PATH};
use crate::data::filters::compile_request;
use crate::data::schema::Catalog;
use crate::data::sql::Backend;
use crate::data::statement::CompiledQuery;

pub struct CoreApp {
    pub config: AppConfig,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config)?;
        match command {
            Commands::Dialects => {
                print!("{}", app.dialects_listing());
                Ok(())
            }
            Commands::Compile { request, format } => {
                let json = read_request(&request)?;
                let query = app.compile(&json)?;
                println!("{}", render(&query, format)?);
                Ok(())
            }
        }
    }

    pub fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        Ok(Self { config })
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_writer(io::stderr)
            .with_env_filter(filter)
            .init();
    }

    /// Compile a JSON request against the configured schema catalog
    pub fn compile(&self, request_json: &str) -> Result<CompiledQuery> {
        let catalog = Catalog::load_from_file(self.config.schema_path()?)?;
        let query = compile_request(
            &catalog,
            request_json,
            self.config.dialect.dialect(),
            &self.config.parameter_prefix,
        )
        .with_context(|| format!("Failed to compile request for {}", self.config.dialect))?;

        tracing::info!(
            dialect = %self.config.dialect,
            parameters = query.parameters.len(),
            "Request compiled"
        );
        Ok(query)
    }

    /// One line per dialect, the configured one marked with `*`
    pub fn dialects_listing(&self) -> String {
        let mut out = format!("{} dialects:\n", APP_NAME);
        for backend in Backend::ALL {
            let marker = if backend == self.config.dialect { "*" } else { " " };
            out.push_str(&format!("{} {}\n", marker, backend));
        }
        out
    }
}

/// Read a request from a file, or from stdin when the path is `-`
fn read_request(path: &Path) -> Result<String> {
    if path.as_os_str() == STDIN_PATH {
        tracing::debug!("Reading request from stdin");
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        return Ok(buf);
    }
    tracing::debug!(path = %path.display(), "Reading request file");
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {}", path.display()))
}

/// Format a compiled query for printing
fn render(query: &CompiledQuery, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(query).context("Failed to serialize compiled query")
        }
        OutputFormat::Sql => {
            let mut out = format!("{};", query.sql);
            for param in &query.parameters {
                out.push_str(&format!(
                    "\n-- {} ({}) = {}",
                    param.name, param.kind, param.value
                ));
            }
            Ok(out)
        }
    }
}
