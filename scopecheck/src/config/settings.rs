use anyhow::Result;
use scopecheck_dwarf::check::{
    DEFAULT_FLAGS_MARKER, DEFAULT_PRODUCER_MARKER, DEFAULT_SYNTHETIC_FILE,
};
use scopecheck_dwarf::LocationBasis;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Log level enumeration for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

impl LogLevel {
    /// Convert to tracing level filter
    pub fn to_tracing_level_filter(self) -> tracing::level_filters::LevelFilter {
        match self {
            LogLevel::Error => tracing::level_filters::LevelFilter::ERROR,
            LogLevel::Warn => tracing::level_filters::LevelFilter::WARN,
            LogLevel::Info => tracing::level_filters::LevelFilter::INFO,
            LogLevel::Debug => tracing::level_filters::LevelFilter::DEBUG,
            LogLevel::Trace => tracing::level_filters::LevelFilter::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(anyhow::anyhow!(
                "Invalid log level: {}. Valid options: error, warn, info, debug, trace",
                s
            )),
        }
    }
}

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub check: CheckConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Log level filter (overridden by --log-level, -v and RUST_LOG)
    #[serde(default)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Producer substring selecting the toolchain (overridden by --producer-marker)
    #[serde(default = "default_producer_marker")]
    pub producer_marker: String,
    /// Producer substring of unoptimized builds (overridden by --flags-marker)
    #[serde(default = "default_flags_marker")]
    pub flags_marker: String,
    /// Source file name of compiler-generated functions (overridden by --synthetic-file)
    #[serde(default = "default_synthetic_file")]
    pub synthetic_file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CheckConfig {
    /// Statements the location list is matched against (overridden by --location-basis)
    #[serde(default)]
    pub location_basis: LocationBasis,
}

// Default value functions
fn default_producer_marker() -> String {
    DEFAULT_PRODUCER_MARKER.to_string()
}

fn default_flags_marker() -> String {
    DEFAULT_FLAGS_MARKER.to_string()
}

fn default_synthetic_file() -> String {
    DEFAULT_SYNTHETIC_FILE.to_string()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            producer_marker: default_producer_marker(),
            flags_marker: default_flags_marker(),
            synthetic_file: default_synthetic_file(),
        }
    }
}

impl Config {
    /// Load configuration from files with fallback search
    pub fn load() -> Result<Self> {
        let config_paths = Self::get_config_search_paths();

        for path in &config_paths {
            if path.exists() {
                info!("Loading configuration from: {}", path.display());
                return Self::load_from_file(path);
            } else {
                debug!("Configuration file not found: {}", path.display());
            }
        }

        info!("No configuration file found, using default settings");
        Ok(Self::default())
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to read configuration file '{}': {}",
                path.display(),
                e
            )
        })?;

        Self::parse(&content, &path.display().to_string())
    }

    /// Parse TOML text; `origin` names the source in error messages
    pub fn parse(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Self::create_friendly_toml_error(origin, content, e))
    }

    /// Load configuration with explicit config file path (for --config flag)
    pub fn load_with_explicit_path<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let path = config_path.as_ref();
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "Specified configuration file does not exist: {}",
                path.display()
            ));
        }
        Self::load_from_file(path)
    }

    /// Create a user-friendly error message for TOML parsing errors
    fn create_friendly_toml_error(
        file_path: &str,
        content: &str,
        error: toml::de::Error,
    ) -> anyhow::Error {
        let error_msg = format!("Configuration file parsing error in '{}'", file_path);

        let Some(span) = error.span() else {
            return anyhow::anyhow!(
                "{}\n\n{}\n\nSuggestion: {}",
                error_msg,
                error,
                Self::get_error_suggestion(&error.to_string())
            );
        };

        let mut current_pos = 0;
        let mut line_num: usize = 1;
        let mut col_num: usize = 1;
        let lines: Vec<&str> = content.lines().collect();
        for line in &lines {
            let line_len = line.len() + 1;
            if current_pos + line_len > span.start {
                col_num = span.start - current_pos + 1;
                break;
            }
            current_pos += line_len;
            line_num += 1;
        }
        let context_line = lines.get(line_num.saturating_sub(1)).unwrap_or(&"");

        anyhow::anyhow!(
            "{}\n\nError at line {}, column {}:\n{}\n\n{}\n{}^\n\nSuggestion: {}",
            error_msg,
            line_num,
            col_num,
            error,
            context_line,
            " ".repeat(col_num.saturating_sub(1)),
            Self::get_error_suggestion(&error.to_string())
        )
    }

    /// Provide helpful suggestions based on common configuration errors
    fn get_error_suggestion(error_msg: &str) -> &'static str {
        if error_msg.contains("log_level") {
            "Valid log levels are: 'error', 'warn', 'info', 'debug', 'trace'"
        } else if error_msg.contains("location_basis") || error_msg.contains("`scope`") {
            "Valid location bases are: 'scope', 'function'"
        } else if error_msg.contains("invalid type") {
            "Check the value type - strings should be in quotes"
        } else {
            "Sections are [general], [filter] and [check]; check the file syntax"
        }
    }

    /// Get configuration file search paths in priority order
    fn get_config_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. ~/.scopecheck/config.toml (user-level config)
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".scopecheck").join("config.toml"));
        }

        // 2. ./scopecheck.toml (project-level config)
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(current_dir.join("scopecheck.toml"));
        }

        paths
    }
}
