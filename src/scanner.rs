//! Local process discovery for multi-process analysis.
//!
//! Scans a proc root for numeric entries that expose an `smaps` file and
//! selects the processes whose name contains a pattern.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::source::SmapsSource;

/// A process whose smaps can be analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcEntry {
    pub pid: u32,
    pub name: String,
    pub proc_path: PathBuf,
}

impl ProcEntry {
    pub fn source(&self) -> SmapsSource {
        SmapsSource::File(self.proc_path.join("smaps"))
    }

    /// Label used in report headers, e.g. `surfaceflinger (612)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.pid)
    }

    /// Report file name used when writing to an output directory.
    pub fn report_file_name(&self) -> String {
        format!("{}-{}.smap.analyzed", self.name.replace('/', "_"), self.pid)
    }
}

/// Scans `root` for processes with an `smaps` file, ordered by pid.
pub fn collect_proc_entries(root: &Path, max: Option<usize>) -> Vec<(u32, PathBuf)> {
    let mut out = Vec::new();
    if let Ok(entries) = fs::read_dir(root) {
        for entry in entries.flatten() {
            let p = entry.path();
            let name = match p.file_name().and_then(|s| s.to_str()) {
                Some(v) => v,
                None => continue,
            };
            if !name.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if !p.join("smaps").exists() {
                continue;
            }
            let pid: u32 = match name.parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            out.push((pid, p));
        }
    }
    out.sort_by_key(|(pid, _)| *pid);
    if let Some(maxp) = max {
        out.truncate(maxp);
    }
    out
}

/// Reads process name from comm file or extracts from cmdline.
pub fn read_process_name(proc_path: &Path) -> Option<String> {
    let comm = proc_path.join("comm");
    if let Ok(s) = fs::read_to_string(&comm) {
        let t = s.trim();
        if !t.is_empty() {
            return Some(t.into());
        }
    }

    let cmd = proc_path.join("cmdline");
    if let Ok(content) = fs::read(&cmd) {
        if !content.is_empty() {
            let parts: Vec<&str> = content
                .split(|&b| b == 0u8)
                .filter_map(|s| std::str::from_utf8(s).ok())
                .collect();
            if !parts.is_empty() {
                if let Some(name) = Path::new(parts[0]).file_name() {
                    return name.to_str().map(|s| s.to_string());
                }
            }
        }
    }
    None
}

/// Finds processes whose name contains `pattern`.
///
/// `max` limits the number of matches returned.
pub fn find_processes(root: &Path, pattern: &str, max: Option<usize>) -> Vec<ProcEntry> {
    let mut matches = Vec::new();
    for (pid, proc_path) in collect_proc_entries(root, None) {
        let name = match read_process_name(&proc_path) {
            Some(name) => name,
            None => {
                trace!("Skipping process {}: could not read name", pid);
                continue;
            }
        };
        if !name.contains(pattern) {
            continue;
        }
        matches.push(ProcEntry {
            pid,
            name,
            proc_path,
        });
        if max.is_some_and(|m| matches.len() >= m) {
            break;
        }
    }
    debug!(
        "Found {} processes matching '{}' under {}",
        matches.len(),
        pattern,
        root.display()
    );
    matches
}
