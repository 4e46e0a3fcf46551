//! Line-level recognizers for smaps text.
//!
//! Head lines open a region block (`<start>-<end> perms offset dev inode   path`).
//! Detail lines carry `Key:   N kB` counters.

use once_cell::sync::Lazy;
use regex::Regex;

/// Name assigned to regions whose head line carries no path.
pub const UNKNOWN_REGION: &str = "unknown";

static HEAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{8,}-[0-9a-f]{8,}").expect("valid head regex"));

static FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+):\s*(\d+) kB").expect("valid field regex"));

static NAME_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" {3,}").expect("valid separator regex"));

/// Returns true if the line starts a new region block.
pub fn is_head_line(line: &str) -> bool {
    HEAD_RE.is_match(line)
}

/// Extracts the region name from a head line.
///
/// The kernel pads the inode column before the pathname, so the name is
/// everything after the first run of three or more spaces. A line without
/// that run, or with only trailing whitespace after it, is named `"unknown"`
/// rather than `""`.
pub fn object_name(line: &str) -> &str {
    match NAME_SEPARATOR_RE.find(line) {
        Some(m) => {
            let name = line[m.end()..].trim_end();
            if name.is_empty() {
                UNKNOWN_REGION
            } else {
                name
            }
        }
        None => UNKNOWN_REGION,
    }
}

/// Extracts `(lower-cased key, kB value)` from a detail line.
///
/// `Name:` and `VmFlags:` lines are skipped, as is anything that does not
/// look like a kilobyte counter.
pub fn extract_field(line: &str) -> Option<(String, u64)> {
    if line.starts_with("Name:") || line.starts_with("VmFlags:") {
        return None;
    }
    let caps = FIELD_RE.captures(line)?;
    let key = caps.get(1)?.as_str().to_lowercase();
    let kb = caps.get(2)?.as_str().parse().ok()?;
    Some((key, kb))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Tests for is_head_line
    // -------------------------------------------------------------------------

    #[test]
    fn test_is_head_line_accepts_address_ranges() {
        assert!(is_head_line(
            "7f1c2a400000-7f1c2a421000 r-xp 00000000 08:02 173521      /usr/lib/libc.so.6"
        ));
        assert!(is_head_line("00400000-00452000 r-xp 00000000 08:02 173521"));
        assert!(is_head_line(
            "0000000000-0000000010 rw-p 00000000 00:00 0   [stack]"
        ));
    }

    #[test]
    fn test_is_head_line_rejects_detail_and_short_addresses() {
        assert!(!is_head_line("Pss:                 100 kB"));
        assert!(!is_head_line("VmFlags: rd wr mr mw me ac sd"));
        assert!(!is_head_line(""));
        // Fewer than 8 hex digits
        assert!(!is_head_line("0040000-00452000 r-xp"));
        // Upper-case hex is not emitted by the kernel
        assert!(!is_head_line("7F1C2A400000-7F1C2A421000 r-xp"));
        // Must be anchored at the start
        assert!(!is_head_line(" 00400000-00452000 r-xp"));
    }

    // -------------------------------------------------------------------------
    // Tests for object_name
    // -------------------------------------------------------------------------

    #[test]
    fn test_object_name_after_padding() {
        assert_eq!(
            object_name("7f1c2a400000-7f1c2a421000 r-xp 00000000 08:02 173521      /usr/lib/libc.so.6"),
            "/usr/lib/libc.so.6"
        );
        assert_eq!(
            object_name("0000000000-0000000010 rw-p 00000000 00:00 0   [stack]  "),
            "[stack]"
        );
        // Interior spaces of the name are preserved
        assert_eq!(
            object_name("70000000-70001000 rw-p 00000000 00:00 0      [anon:thread signal stack]"),
            "[anon:thread signal stack]"
        );
    }

    #[test]
    fn test_object_name_unknown() {
        assert_eq!(
            object_name("00400000-00452000 rw-p 00000000 00:00 0"),
            UNKNOWN_REGION
        );
        assert_eq!(
            object_name("00400000-00452000 rw-p 00000000 00:00 0      "),
            UNKNOWN_REGION
        );
        assert_eq!(object_name(""), UNKNOWN_REGION);
    }

    // -------------------------------------------------------------------------
    // Tests for extract_field
    // -------------------------------------------------------------------------

    #[test]
    fn test_extract_field() {
        assert_eq!(
            extract_field("Pss:                 100 kB"),
            Some(("pss".to_string(), 100))
        );
        assert_eq!(
            extract_field("Shared_Clean:          4 kB"),
            Some(("shared_clean".to_string(), 4))
        );
        assert_eq!(
            extract_field("SwapPss:0 kB"),
            Some(("swappss".to_string(), 0))
        );
    }

    #[test]
    fn test_extract_field_skips_metadata_lines() {
        assert_eq!(extract_field("Name:           [anon:libc_malloc]"), None);
        assert_eq!(extract_field("VmFlags: rd wr mr mw me ac sd"), None);
        // Even if crafted to look numeric
        assert_eq!(extract_field("Name: 12 kB"), None);
        assert_eq!(extract_field("VmFlags: 12 kB"), None);
    }

    #[test]
    fn test_extract_field_ignores_non_counters() {
        assert_eq!(extract_field("THPeligible:    0"), None);
        assert_eq!(extract_field("ProtectionKey:         0"), None);
        assert_eq!(extract_field("Pss: 1.5 kB"), None);
        assert_eq!(extract_field("Pss: 12 MB"), None);
        assert_eq!(extract_field("garbage"), None);
        // Too large for u64
        assert_eq!(extract_field("Pss: 99999999999999999999999 kB"), None);
    }
}
