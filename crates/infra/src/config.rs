//! Configuration loading and representation.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. optional `config/default.{toml,json,yaml}` (or the file named by `STOCKREPORT_CONFIG`)
//! 3. environment variables `STOCKREPORT__<KEY>`

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_FILE_VAR: &str = "STOCKREPORT_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "config/default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pdf,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Printed in the page footer of every report.
    pub company_name: Option<String>,
    pub output_format: OutputFormat,
    pub wkhtmltopdf_path: String,
    pub page_margin: String,
    /// JSON stock snapshot loaded into the in-memory store at startup.
    pub data_file: Option<String>,
    pub log_level: String,
    pub log_json: bool,
}

impl AppConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Config::builder()
        .set_default("host", "0.0.0.0")?
        .set_default("port", 8080)?
        .set_default("output_format", "pdf")?
        .set_default("wkhtmltopdf_path", "wkhtmltopdf")?
        .set_default("page_margin", "0.50in")?
        .set_default("log_level", "info")?
        .set_default("log_json", true)
}

/// Load configuration from defaults, the optional config file and the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let file = std::env::var(CONFIG_FILE_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    tracing::debug!(file = %file, "loading configuration");

    let cfg = builder()?
        .add_source(File::with_name(&file).required(false))
        .add_source(
            Environment::with_prefix("STOCKREPORT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    cfg.try_deserialize()
}

/// Load configuration from defaults and one explicit file (no environment).
pub fn load_config_from_file(path: &str) -> Result<AppConfig, ConfigError> {
    builder()?
        .add_source(File::with_name(path))
        .build()?
        .try_deserialize()
}
