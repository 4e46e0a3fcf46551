//! Configuration management for smaps-analyzer.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use serde::{Deserialize, Serialize};
use smaps_analyzer::{ConfigError, OutputFormat, ReportOptions, SortField};
use smaps_analyzer::Result as AnalyzerResult;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_SORT_FIELD: &str = "pss";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Effective configuration; every value is optional so files can be partial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Report selection
    /// "pss" | "rss" | "size" | "anon"
    #[serde(alias = "sort-field", alias = "type")]
    pub sort_field: Option<String>,
    #[serde(alias = "full-map")]
    pub full_map: Option<bool>,
    #[serde(alias = "show-stack")]
    pub show_stack: Option<bool>,
    #[serde(alias = "show-thread-stack")]
    pub show_thread_stack: Option<bool>,
    #[serde(alias = "show-shared-object")]
    pub show_shared_object: Option<bool>,
    #[serde(alias = "show-dex")]
    pub show_dex: Option<bool>,
    #[serde(alias = "process-name")]
    pub process_name: Option<String>,
    /// "text" | "json"
    #[serde(alias = "output-format")]
    pub output_format: Option<String>,

    // Multi-process analysis
    pub parallelism: Option<usize>,
    #[serde(alias = "max-processes")]
    pub max_processes: Option<usize>,
    #[serde(alias = "output-dir")]
    pub output_dir: Option<PathBuf>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sort_field: Some(DEFAULT_SORT_FIELD.into()),
            full_map: Some(false),
            show_stack: Some(false),
            show_thread_stack: Some(false),
            show_shared_object: Some(false),
            show_dex: Some(false),
            process_name: None,
            output_format: Some("text".into()),
            parallelism: None,
            max_processes: None,
            output_dir: None,
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
        }
    }
}

impl Config {
    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        let level = self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
        match level.to_ascii_lowercase().as_str() {
            "off" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ConfigError::UnknownLogLevel(level.to_string())),
        }
    }
}

/// Validate effective config (used by --check-config and before analysis).
///
/// Returns the typed report options; `process_name` is only the configured
/// label and may be empty.
pub fn validate_effective_config(cfg: &Config) -> AnalyzerResult<ReportOptions> {
    let sort_field: SortField = cfg
        .sort_field
        .as_deref()
        .unwrap_or(DEFAULT_SORT_FIELD)
        .parse()?;
    let format: OutputFormat = cfg.output_format.as_deref().unwrap_or("text").parse()?;
    cfg.log_level()?;

    Ok(ReportOptions {
        sort_field,
        show_zero: cfg.full_map.unwrap_or(false),
        stack: cfg.show_stack.unwrap_or(false),
        thread_stack: cfg.show_thread_stack.unwrap_or(false),
        shared_object: cfg.show_shared_object.unwrap_or(false),
        dex: cfg.show_dex.unwrap_or(false),
        process_name: cfg.process_name.clone().unwrap_or_default(),
        format,
    })
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(field) = &args.sort_field {
        config.sort_field = Some(field.clone());
    }
    if let Some(name) = &args.process_name {
        config.process_name = Some(name.clone());
    }
    if let Some(format) = &args.format {
        config.output_format = Some(format.clone());
    }

    // Switches only ever turn things on
    if args.full_map {
        config.full_map = Some(true);
    }
    if args.stack {
        config.show_stack = Some(true);
    }
    if args.thread_stack {
        config.show_thread_stack = Some(true);
    }
    if args.shared_object {
        config.show_shared_object = Some(true);
    }
    if args.dex {
        config.show_dex = Some(true);
    }

    if let Some(dir) = &args.output_dir {
        config.output_dir = Some(dir.clone());
    }
    if args.parallelism.is_some() {
        config.parallelism = args.parallelism;
    }
    if args.max_processes.is_some() {
        config.max_processes = args.max_processes;
    }
    if let Some(level) = &args.log_level {
        config.log_level = Some(format!("{:?}", level).to_ascii_lowercase());
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = if let Some(p) = path {
        // An explicitly named file must exist
        if !p.exists() {
            return Err(format!("Config file not found: {}", p.display()).into());
        }
        p.to_path_buf()
    } else {
        // Try default locations
        let defaults = [
            "/etc/smaps-analyzer/config.yaml",
            "/etc/smaps-analyzer/config.yml",
            "/etc/smaps-analyzer/config.json",
            "./smaps-analyzer.yaml",
            "./smaps-analyzer.yml",
            "./smaps-analyzer.json",
        ];

        match defaults.iter().find(|p| Path::new(p).exists()) {
            Some(p) => PathBuf::from(p),
            None => return Ok(Config::default()),
        }
    };

    let content = fs::read_to_string(&path)?;
    parse_config(&content, &path)
}

/// Parses config content, choosing the format from the file extension.
fn parse_config(content: &str, path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Renders a configuration in the requested format.
pub fn render_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, &format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    use smaps_analyzer::Error;

    #[test]
    fn test_default_config_is_valid() {
        let opts = validate_effective_config(&Config::default()).unwrap();
        assert_eq!(opts.sort_field, SortField::Pss);
        assert_eq!(opts.format, OutputFormat::Text);
        assert!(!opts.show_zero);
        assert!(opts.process_name.is_empty());
    }

    #[test]
    fn test_unknown_sort_field_rejected() {
        let cfg = Config {
            sort_field: Some("bogus".into()),
            ..Config::default()
        };
        let err = validate_effective_config(&cfg).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::UnknownSortField(ref f)) if f == "bogus"
        ));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_unknown_format_and_log_level_rejected() {
        let cfg = Config {
            output_format: Some("xml".into()),
            ..Config::default()
        };
        assert!(matches!(
            validate_effective_config(&cfg).unwrap_err(),
            Error::Config(ConfigError::UnknownOutputFormat(ref f)) if f == "xml"
        ));

        let cfg = Config {
            log_level: Some("loud".into()),
            ..Config::default()
        };
        assert!(matches!(
            validate_effective_config(&cfg).unwrap_err(),
            Error::Config(ConfigError::UnknownLogLevel(ref l)) if l == "loud"
        ));
    }

    #[test]
    fn test_cli_overrides_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("smaps-analyzer.yaml");
        fs::write(
            &path,
            "sort_field: rss\nshow_dex: true\nprocess_name: from-file\n",
        )
        .unwrap();

        let args = Args::try_parse_from([
            "smaps-analyzer",
            "-c",
            path.to_str().unwrap(),
            "-t",
            "size",
            "-S",
        ])
        .unwrap();
        let cfg = resolve_config(&args).unwrap();
        let opts = validate_effective_config(&cfg).unwrap();

        assert_eq!(opts.sort_field, SortField::Size);
        assert!(opts.dex);
        assert!(opts.stack);
        assert_eq!(opts.process_name, "from-file");
    }

    #[test]
    fn test_cli_log_level_overrides_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("smaps-analyzer.yaml");
        fs::write(&path, "log_level: debug\n").unwrap();

        let args = Args::try_parse_from(["smaps-analyzer", "-c", path.to_str().unwrap()]).unwrap();
        let cfg = resolve_config(&args).unwrap();
        assert!(matches!(cfg.log_level(), Ok(LogLevel::Debug)));

        let args = Args::try_parse_from([
            "smaps-analyzer",
            "-c",
            path.to_str().unwrap(),
            "--log-level",
            "error",
        ])
        .unwrap();
        let cfg = resolve_config(&args).unwrap();
        assert!(matches!(cfg.log_level(), Ok(LogLevel::Error)));
    }

    #[test]
    fn test_parse_config_formats() {
        let json = parse_config(r#"{"type": "anon", "full_map": true}"#, Path::new("c.json")).unwrap();
        assert_eq!(json.sort_field.as_deref(), Some("anon"));
        assert_eq!(json.full_map, Some(true));

        let toml = parse_config("show-stack = true\n", Path::new("c.toml")).unwrap();
        assert_eq!(toml.show_stack, Some(true));
        // Missing keys stay unset
        assert_eq!(toml.sort_field, None);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        assert!(load_config(Some(Path::new("/nonexistent/smaps-analyzer.yaml"))).is_err());
    }

    #[test]
    fn test_render_config_round_trips_through_yaml() {
        let rendered = render_config(&Config::default(), &ConfigFormat::Yaml).unwrap();
        let parsed: Config = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed.sort_field.as_deref(), Some(DEFAULT_SORT_FIELD));
        assert_eq!(parsed.log_level.as_deref(), Some(DEFAULT_LOG_LEVEL));
    }
}
