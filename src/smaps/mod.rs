//! Parsing of `/proc/<pid>/smaps` text into per-object memory statistics.
//!
//! This module provides:
//! - `line`: head line detection and field extraction
//! - `stats`: the fixed set of per-region counters
//! - `parser`: the aggregation pass producing a [`SmapTable`]
//! - `classifier`: name-based region categories

pub mod classifier;
pub mod line;
pub mod parser;
pub mod stats;

// Re-export commonly used types
pub use classifier::{is_dex, is_shared_object, is_stack, is_thread_stack, RegionFilter};
pub use line::{extract_field, is_head_line, object_name, UNKNOWN_REGION};
pub use parser::{parse_smap_lines, parse_smaps, Region, SmapTable};
pub use stats::{MemoryField, MemoryStats};
