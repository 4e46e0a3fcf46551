//! smaps-analyzer library
//!
//! Parses `/proc/<pid>/smaps` reports into per-object memory statistics and
//! renders sorted listings and a summary.
//!
//! # Features
//!
//! - **Name-based aggregation**: all mappings of one object are merged
//! - **Categories**: stack, thread stack, shared object and DEX/ART maps
//! - **Sorting**: by PSS, RSS, size (VSS) or anonymous memory
//! - **Output**: the classic text layout or JSON
//!
//! # Usage
//!
//! ```rust
//! use smaps_analyzer::{build_report, parse_smaps, ReportOptions, SortField};
//!
//! let smaps = "\
//! 7ffd3c1e0000-7ffd3c201000 rw-p 00000000 00:00 0   [stack]
//! Size:                132 kB
//! Pss:                  16 kB
//! ";
//!
//! let table = parse_smaps(smaps);
//! let opts = ReportOptions {
//!     sort_field: "anon".parse::<SortField>().unwrap(),
//!     process_name: "demo".to_string(),
//!     ..ReportOptions::default()
//! };
//!
//! let report = build_report(&table, &opts);
//! assert_eq!(report.summary.stack_pss, 16);
//! println!("{}", report);
//! ```

pub mod error;
pub mod report;
pub mod scanner;
pub mod smaps;
pub mod source;

// Re-export main types for convenience
pub use error::{ConfigError, Error, Result};
pub use report::{
    build_report, category_total, filtered, sort_regions, thread_stack_total, OutputFormat,
    Report, ReportOptions, SortField, Summary,
};
pub use smaps::{parse_smaps, MemoryField, MemoryStats, Region, RegionFilter, SmapTable};
pub use source::SmapsSource;

/// Reads, parses and renders one source.
///
/// Returns the rendered report; nothing is written on error.
pub fn analyze(source: &SmapsSource, opts: &ReportOptions) -> Result<String> {
    let content = source.read_to_string()?;
    let table = parse_smaps(&content);
    build_report(&table, opts).render(opts.format)
}
