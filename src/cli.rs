//! CLI arguments and subcommands for smaps-analyzer.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "smaps-analyzer",
    about = "Analyze Linux /proc/<pid>/smaps per mapped object",
    long_about = "A utility to analyze smaps on Linux. It requires either an smaps file \
                  or a pid to analyze. Per default only objects which have a value will be \
                  shown. You can list zero objects by specifying the --full-map argument.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input smaps file to parse ("-" for stdin); may be repeated
    #[arg(short = 'f', long = "file", conflicts_with_all = ["pid", "process_string"])]
    pub files: Vec<PathBuf>,

    /// Pid to analyze, equivalent to --file=/proc/<pid>/smaps; may be repeated
    #[arg(short = 'p', long = "pid", conflicts_with = "process_string")]
    pub pid: Vec<u32>,

    /// Analyze every local process whose name contains this pattern
    #[arg(short = 'm', long)]
    pub process_string: Option<String>,

    /// Column to sort output by: pss, rss, size, anon
    #[arg(short = 't', long = "type")]
    pub sort_field: Option<String>,

    /// List full smap list, even for objects that have a zero count
    #[arg(short = 'F', long)]
    pub full_map: bool,

    /// List all stack maps
    #[arg(short = 'S', long)]
    pub stack: bool,

    /// List all thread stack maps
    #[arg(short = 'T', long)]
    pub thread_stack: bool,

    /// List all shared object maps (.so maps)
    #[arg(short = 's', long)]
    pub shared_object: bool,

    /// List all DEX maps
    #[arg(short = 'd', long)]
    pub dex: bool,

    /// Process name to show in the report headers
    #[arg(short = 'P', long)]
    pub process_name: Option<String>,

    /// Report format: text or json
    #[arg(long)]
    pub format: Option<String>,

    /// Write one report per process into this directory
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Parallel analysis threads (0 = auto)
    #[arg(long)]
    pub parallelism: Option<usize>,

    /// Maximum number of processes to analyze with --process-string
    #[arg(long)]
    pub max_processes: Option<usize>,

    /// Log level
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,
}

impl Args {
    pub fn has_input(&self) -> bool {
        !self.files.is_empty() || !self.pid.is_empty() || self.process_string.is_some()
    }
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration and smaps accessibility
    Check,

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}
