//! Region classification by name.
//!
//! The categories mirror what Android and glibc write into smaps pathnames:
//! `[stack]`, `[anon:stack_and_tls:<tid>]`, `*.so`, and ART/DEX images.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static STACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*stack.*\]").expect("valid stack regex"));

static THREAD_STACK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\[anon:stack_and_tls:\d+)|(anon:thread signal stack)|(anon:dalvik-thread local mark stack)",
    )
    .expect("valid thread stack regex")
});

const DEX_SUFFIXES: [&str; 3] = [".dex", ".odex", ".art"];

/// `[stack]`, `[anon:stack_and_tls:123]` and other bracketed stack annotations.
pub fn is_stack(name: &str) -> bool {
    STACK_RE.is_match(name)
}

/// Per-thread stacks; these are accounted by their anonymous memory.
pub fn is_thread_stack(name: &str) -> bool {
    THREAD_STACK_RE.is_match(name)
}

pub fn is_shared_object(name: &str) -> bool {
    name.ends_with(".so")
}

pub fn is_dex(name: &str) -> bool {
    DEX_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Selects which regions a listing or total covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionFilter {
    #[default]
    All,
    Stack,
    ThreadStack,
    SharedObject,
    Dex,
}

impl RegionFilter {
    pub fn matches(self, name: &str) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Stack => is_stack(name),
            RegionFilter::ThreadStack => is_thread_stack(name),
            RegionFilter::SharedObject => is_shared_object(name),
            RegionFilter::Dex => is_dex(name),
        }
    }
}
