pub mod file;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_socket_addr, validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_DATABASE_URL: &str = "http://127.0.0.1:5984";
pub const DEFAULT_TECH_DATABASE: &str = "techs";
pub const DEFAULT_SOFTWARE_DATABASE: &str = "software";

#[derive(Debug, Clone, Parser)]
#[command(name = "software-catalog")]
#[command(about = "Internal software catalog HTTP API")]
pub struct CliArgs {
    /// Optional TOML configuration file; explicit flags win over it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub bind: Option<String>,

    #[arg(long)]
    pub database_url: Option<String>,

    #[arg(long)]
    pub tech_database: Option<String>,

    #[arg(long)]
    pub software_database: Option<String>,

    /// Serve from the in-memory store instead of CouchDB.
    #[arg(long)]
    pub memory_store: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub database_url: String,
    pub tech_database: String,
    pub software_database: String,
    pub memory_store: bool,
    pub verbose: bool,
    pub log_json: bool,
}

impl CliArgs {
    /// Merge CLI flags, the optional config file, and defaults, in that
    /// order of precedence.
    pub fn resolve(self) -> Result<ServerConfig> {
        let file = match &self.config {
            Some(path) => file::FileConfig::load(path)?,
            None => file::FileConfig::default(),
        };

        Ok(ServerConfig {
            bind: self
                .bind
                .or(file.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            database_url: self
                .database_url
                .or(file.database_url)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            tech_database: self
                .tech_database
                .or(file.tech_database)
                .unwrap_or_else(|| DEFAULT_TECH_DATABASE.to_string()),
            software_database: self
                .software_database
                .or(file.software_database)
                .unwrap_or_else(|| DEFAULT_SOFTWARE_DATABASE.to_string()),
            memory_store: self.memory_store,
            verbose: self.verbose,
            log_json: self.log_json,
        })
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("bind", &self.bind)?;
        validate_url("database_url", &self.database_url)?;
        validate_non_empty_string("tech_database", &self.tech_database)?;
        validate_non_empty_string("software_database", &self.software_database)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn bare_args() -> CliArgs {
        CliArgs {
            config: None,
            bind: None,
            database_url: None,
            tech_database: None,
            software_database: None,
            memory_store: false,
            verbose: false,
            log_json: false,
        }
    }

    #[test]
    fn test_defaults_apply_without_file_or_flags() {
        let config = bare_args().resolve().unwrap();
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.tech_database, DEFAULT_TECH_DATABASE);
        assert_eq!(config.software_database, DEFAULT_SOFTWARE_DATABASE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_flags_win_over_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind = \"0.0.0.0:9000\"").unwrap();
        writeln!(file, "database_url = \"http://couch.internal:5984\"").unwrap();

        let mut args = bare_args();
        args.config = Some(file.path().to_path_buf());
        args.bind = Some("127.0.0.1:7000".to_string());

        let config = args.resolve().unwrap();
        assert_eq!(config.bind, "127.0.0.1:7000");
        assert_eq!(config.database_url, "http://couch.internal:5984");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = bare_args().resolve().unwrap();
        config.bind = "not-an-address".to_string();
        assert!(config.validate().is_err());

        let mut config = bare_args().resolve().unwrap();
        config.database_url = "ftp://couch".to_string();
        assert!(config.validate().is_err());

        let mut config = bare_args().resolve().unwrap();
        config.tech_database = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
