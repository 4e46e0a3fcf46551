//! Input sources for smaps text.
//!
//! The whole input is read into memory before parsing.

use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

/// Where a smaps report is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmapsSource {
    File(PathBuf),
    Stdin,
    /// `/proc/<pid>/smaps` under the given proc root.
    Pid { pid: u32, proc_root: PathBuf },
}

impl SmapsSource {
    /// File argument as given on the command line; `-` selects stdin.
    pub fn from_file_arg(arg: &Path) -> Self {
        if arg.as_os_str() == "-" {
            SmapsSource::Stdin
        } else {
            SmapsSource::File(arg.to_path_buf())
        }
    }

    pub fn pid(pid: u32) -> Self {
        SmapsSource::Pid {
            pid,
            proc_root: PathBuf::from("/proc"),
        }
    }

    /// Path that will be opened, if any.
    pub fn path(&self) -> Option<PathBuf> {
        match self {
            SmapsSource::File(p) => Some(p.clone()),
            SmapsSource::Stdin => None,
            SmapsSource::Pid { pid, proc_root } => {
                Some(proc_root.join(pid.to_string()).join("smaps"))
            }
        }
    }

    /// Default display label when no process name is given.
    pub fn label(&self) -> String {
        match self {
            SmapsSource::File(p) => p.display().to_string(),
            SmapsSource::Stdin => "stdin".to_string(),
            SmapsSource::Pid { pid, .. } => format!("pid {}", pid),
        }
    }

    /// Reads the complete input.
    pub fn read_to_string(&self) -> Result<String> {
        let content = match self.path() {
            Some(path) => fs::read_to_string(&path),
            None => {
                let mut buf = String::new();
                io::stdin().lock().read_to_string(&mut buf).map(|_| buf)
            }
        }
        .map_err(|source| Error::Source {
            origin: self.to_string(),
            source,
        })?;

        debug!("Read {} bytes from {}", content.len(), self);
        Ok(content)
    }
}

impl fmt::Display for SmapsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(path) => write!(f, "{}", path.display()),
            None => f.write_str("<stdin>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_arg() {
        assert_eq!(SmapsSource::from_file_arg(Path::new("-")), SmapsSource::Stdin);
        assert_eq!(
            SmapsSource::from_file_arg(Path::new("/tmp/app.smap")),
            SmapsSource::File(PathBuf::from("/tmp/app.smap"))
        );
    }

    #[test]
    fn test_pid_path_and_label() {
        let src = SmapsSource::pid(42);
        assert_eq!(src.path(), Some(PathBuf::from("/proc/42/smaps")));
        assert_eq!(src.label(), "pid 42");
        assert_eq!(src.to_string(), "/proc/42/smaps");
        assert_eq!(SmapsSource::Stdin.to_string(), "<stdin>");
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let src = SmapsSource::File(PathBuf::from("/nonexistent/smaps-analyzer/smaps"));
        match src.read_to_string() {
            Err(Error::Source { origin, source }) => {
                assert_eq!(origin, "/nonexistent/smaps-analyzer/smaps");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected source error, got {:?}", other.map(|s| s.len())),
        }
    }
}
