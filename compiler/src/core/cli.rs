use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_DIALECT, ENV_PARAM_PREFIX, ENV_SCHEMA, STDIN_PATH};
use crate::data::sql::Backend;

#[derive(Parser)]
#[command(name = "sieve")]
#[command(version, about = "Compile entity filters into parameterized SQL", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (JSON)
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Target SQL dialect: sqlite, postgres, duckdb, clickhouse, mssql, mysql
    #[arg(long, short = 'd', global = true, env = ENV_DIALECT, value_parser = parse_backend)]
    pub dialect: Option<Backend>,

    /// Prefix for generated parameter names
    #[arg(long, global = true, env = ENV_PARAM_PREFIX)]
    pub param_prefix: Option<String>,

    /// Schema catalog file (JSON)
    #[arg(long, short = 's', global = true, env = ENV_SCHEMA)]
    pub schema: Option<PathBuf>,
}

/// Parse a dialect from CLI/env string
fn parse_backend(s: &str) -> Result<Backend, String> {
    s.parse()
}

/// Parse output format from CLI string
fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    match s.to_lowercase().as_str() {
        "sql" => Ok(OutputFormat::Sql),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!(
            "Invalid output format '{}'. Valid options: sql, json",
            s
        )),
    }
}

/// How compiled queries are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// SQL text followed by a parameter listing
    #[default]
    Sql,
    /// `{"sql": ..., "parameters": [...]}`
    Json,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Compile a filter request into a SELECT statement
    Compile {
        /// Request file (JSON), or "-" for stdin
        #[arg(long, short = 'r', default_value = STDIN_PATH)]
        request: PathBuf,

        /// Output format: sql or json
        #[arg(long, short = 'f', default_value = "sql", value_parser = parse_output_format)]
        format: OutputFormat,
    },
    /// List supported SQL dialects
    Dialects,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub dialect: Option<Backend>,
    pub param_prefix: Option<String>,
    pub schema: Option<PathBuf>,
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            dialect: cli.dialect,
            param_prefix: cli.param_prefix.clone(),
            schema: cli.schema.clone(),
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    (CliConfig::from(&cli), cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("sql"), Ok(OutputFormat::Sql));
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert!(parse_output_format("yaml").unwrap_err().contains("sql, json"));
    }

    #[test]
    fn test_parse_backend_aliases() {
        assert_eq!(parse_backend("postgresql"), Ok(Backend::Postgres));
        assert_eq!(parse_backend("sqlserver"), Ok(Backend::Mssql));
        assert!(parse_backend("oracle").is_err());
    }

    #[test]
    fn test_compile_command_args() {
        let cli = Cli::try_parse_from([
            "sieve",
            "compile",
            "--request",
            "req.json",
            "--dialect",
            "mysql",
            "--format",
            "json",
        ])
        .unwrap();

        let config = CliConfig::from(&cli);
        assert_eq!(config.dialect, Some(Backend::Mysql));
        assert!(config.schema.is_none());
        match cli.command {
            Commands::Compile { request, format } => {
                assert_eq!(request, PathBuf::from("req.json"));
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_compile_reads_stdin_by_default() {
        let cli = Cli::try_parse_from(["sieve", "compile"]).unwrap();
        match cli.command {
            Commands::Compile { request, format } => {
                assert_eq!(request, PathBuf::from(STDIN_PATH));
                assert_eq!(format, OutputFormat::Sql);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
