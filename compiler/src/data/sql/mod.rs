//! SQL abstraction layer for multi-database support
//!
//! This module provides abstractions for generating SQL that works across
//! different database backends (SQLite, PostgreSQL, DuckDB, ClickHouse,
//! SQL Server, MySQL).

mod clickhouse_dialect;
mod dialect;
mod duckdb_dialect;
mod mssql_dialect;
mod mysql_dialect;
mod postgres_dialect;
mod sqlite_dialect;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use clickhouse_dialect::ClickhouseDialect;
pub use dialect::SqlDialect;
pub use duckdb_dialect::DuckdbDialect;
pub use mssql_dialect::MssqlDialect;
pub use mysql_dialect::MysqlDialect;
pub use postgres_dialect::PostgresDialect;
pub use sqlite_dialect::SqliteDialect;

/// Database backend identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Postgres,
    Duckdb,
    Clickhouse,
    Mssql,
    Mysql,
}

impl Backend {
    pub const ALL: [Backend; 6] = [
        Backend::Sqlite,
        Backend::Postgres,
        Backend::Duckdb,
        Backend::Clickhouse,
        Backend::Mssql,
        Backend::Mysql,
    ];

    /// Get the SQL dialect for this backend
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Backend::Sqlite => &SqliteDialect,
            Backend::Postgres => &PostgresDialect,
            Backend::Duckdb => &DuckdbDialect,
            Backend::Clickhouse => &ClickhouseDialect,
            Backend::Mssql => &MssqlDialect,
            Backend::Mysql => &MysqlDialect,
        }
    }

    /// Get the backend name
    pub fn name(&self) -> &'static str {
        self.dialect().name()
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "duckdb" => Ok(Backend::Duckdb),
            "clickhouse" => Ok(Backend::Clickhouse),
            "mssql" | "sqlserver" => Ok(Backend::Mssql),
            "mysql" => Ok(Backend::Mysql),
            _ => Err(format!(
                "Invalid dialect '{}'. Valid options: sqlite, postgres, duckdb, clickhouse, mssql, mysql",
                s
            )),
        }
    }
}
