//! Report engine over a parsed [`SmapTable`].
//!
//! Regions are sorted by the selected metric, filtered into per-category
//! listings and summed into a summary block. A [`Report`] borrows the table
//! and can be rendered as text (via `Display`) or JSON.

mod text;

use serde::Serialize;
use std::str::FromStr;

use crate::error::{ConfigError, Result};
use crate::smaps::{MemoryField, Region, RegionFilter, SmapTable};

/// Metric used to order listings and to decide whether a row is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Pss,
    Rss,
    Size,
    Anonymous,
}

impl SortField {
    pub fn field(self) -> MemoryField {
        match self {
            SortField::Pss => MemoryField::Pss,
            SortField::Rss => MemoryField::Rss,
            SortField::Size => MemoryField::Size,
            SortField::Anonymous => MemoryField::Anonymous,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Pss => "pss",
            SortField::Rss => "rss",
            SortField::Size => "size",
            SortField::Anonymous => "anonymous",
        }
    }
}

impl FromStr for SortField {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pss" => Ok(SortField::Pss),
            "rss" => Ok(SortField::Rss),
            "size" => Ok(SortField::Size),
            "anon" | "anonymous" => Ok(SortField::Anonymous),
            _ => Err(ConfigError::UnknownSortField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::UnknownOutputFormat(s.to_string())),
        }
    }
}

/// Validated report settings.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub sort_field: SortField,
    /// List rows whose sort metric is zero.
    pub show_zero: bool,
    pub stack: bool,
    pub thread_stack: bool,
    pub shared_object: bool,
    pub dex: bool,
    /// Label printed in the listing and summary headers.
    pub process_name: String,
    pub format: OutputFormat,
}

/// Orders regions by `sort_field`, highest first, then by name.
pub fn sort_regions(table: &SmapTable, sort_field: SortField) -> Vec<&Region> {
    let field = sort_field.field();
    let mut rows: Vec<&Region> = table.iter().collect();
    rows.sort_by(|a, b| {
        b.stats
            .get(field)
            .cmp(&a.stats.get(field))
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

/// Regions accepted by `filter`, dropping zero rows unless `show_zero` is set.
pub fn filtered<'s, 'a: 's>(
    regions: &'s [&'a Region],
    filter: RegionFilter,
    sort_field: SortField,
    show_zero: bool,
) -> impl Iterator<Item = &'a Region> + 's {
    let field = sort_field.field();
    regions
        .iter()
        .copied()
        .filter(move |r| filter.matches(&r.name) && (show_zero || r.stats.get(field) > 0))
}

/// Sums `field` over the regions accepted by `filter`.
pub fn category_total<'a, I>(regions: I, field: MemoryField, filter: RegionFilter) -> u64
where
    I: IntoIterator<Item = &'a Region>,
{
    regions
        .into_iter()
        .filter(|r| filter.matches(&r.name))
        .fold(0u64, |acc, r| acc.saturating_add(r.stats.get(field)))
}

/// Thread stacks are private by nature, so they are counted by anonymous memory.
pub fn thread_stack_total<'a, I>(regions: I) -> u64
where
    I: IntoIterator<Item = &'a Region>,
{
    category_total(regions, MemoryField::Anonymous, RegionFilter::ThreadStack)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row<'a> {
    pub name: &'a str,
    pub pss: u64,
    pub rss: u64,
    pub size: u64,
    pub anonymous: u64,
}

impl<'a> From<&'a Region> for Row<'a> {
    fn from(r: &'a Region) -> Self {
        Self {
            name: &r.name,
            pss: r.stats.pss,
            rss: r.stats.rss,
            size: r.stats.size,
            anonymous: r.stats.anonymous,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Listing<'a> {
    pub title: &'static str,
    pub filter: RegionFilter,
    pub rows: Vec<Row<'a>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub pss: u64,
    pub rss: u64,
    pub size: u64,
    pub shared_clean: u64,
    pub shared_dirty: u64,
    pub private_clean: u64,
    pub private_dirty: u64,
    pub anonymous: u64,
    pub swap: u64,
    pub swap_pss: u64,
    pub stack_pss: u64,
    pub stack_size: u64,
    pub thread_stack_anonymous: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_object_pss: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_object_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dex_pss: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dex_size: Option<u64>,
}

impl Summary {
    /// Labelled summary lines in display order; unrequested totals are omitted.
    pub fn lines(&self) -> Vec<(&'static str, u64)> {
        let mut lines = vec![
            ("PSS", self.pss),
            ("RSS", self.rss),
            ("Size (VSS)", self.size),
            ("Shared_Clean", self.shared_clean),
            ("Shared_Dirty", self.shared_dirty),
            ("Private_Clean", self.private_clean),
            ("Private_Dirty", self.private_dirty),
            ("Anonymous", self.anonymous),
            ("Swap", self.swap),
            ("Swap PSS", self.swap_pss),
            ("Stacks PSS", self.stack_pss),
            ("Stacks VSS", self.stack_size),
            ("Thread Stacks (anon)", self.thread_stack_anonymous),
        ];
        let optional = [
            ("All SO map PSS", self.shared_object_pss),
            ("All SO map VSS", self.shared_object_size),
            ("All DEX map PSS", self.dex_pss),
            ("All DEX map VSS", self.dex_size),
        ];
        lines.extend(
            optional
                .into_iter()
                .filter_map(|(label, value)| value.map(|v| (label, v))),
        );
        lines
    }
}

/// A complete report for one process.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub process_name: &'a str,
    pub sort_field: SortField,
    pub objects: Listing<'a>,
    pub categories: Vec<Listing<'a>>,
    pub summary: Summary,
}

impl Report<'_> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Renders in the requested format.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => self.to_json(),
        }
    }
}

/// Builds the full report: object listing, requested categories, summary.
pub fn build_report<'a>(table: &'a SmapTable, opts: &'a ReportOptions) -> Report<'a> {
    let sorted = sort_regions(table, opts.sort_field);
    let listing = |title: &'static str, filter: RegionFilter| Listing {
        title,
        filter,
        rows: filtered(&sorted, filter, opts.sort_field, opts.show_zero)
            .map(Row::from)
            .collect(),
    };

    let objects = listing("Per object data", RegionFilter::All);

    let requested = [
        (opts.stack, "Stack maps", RegionFilter::Stack),
        (opts.thread_stack, "Thread stack maps", RegionFilter::ThreadStack),
        (opts.shared_object, "All SO maps", RegionFilter::SharedObject),
        (opts.dex, "All DEX maps", RegionFilter::Dex),
    ];
    let categories = requested
        .into_iter()
        .filter(|(wanted, _, _)| *wanted)
        .map(|(_, title, filter)| listing(title, filter))
        .collect();

    let total = |field: MemoryField, filter: RegionFilter| category_total(table, field, filter);
    let all = |field: MemoryField| total(field, RegionFilter::All);

    let summary = Summary {
        pss: all(MemoryField::Pss),
        rss: all(MemoryField::Rss),
        size: all(MemoryField::Size),
        shared_clean: all(MemoryField::SharedClean),
        shared_dirty: all(MemoryField::SharedDirty),
        private_clean: all(MemoryField::PrivateClean),
        private_dirty: all(MemoryField::PrivateDirty),
        anonymous: all(MemoryField::Anonymous),
        swap: all(MemoryField::Swap),
        swap_pss: all(MemoryField::SwapPss),
        stack_pss: total(MemoryField::Pss, RegionFilter::Stack),
        stack_size: total(MemoryField::Size, RegionFilter::Stack),
        thread_stack_anonymous: thread_stack_total(table),
        shared_object_pss: opts
            .shared_object
            .then(|| total(MemoryField::Pss, RegionFilter::SharedObject)),
        shared_object_size: opts
            .shared_object
            .then(|| total(MemoryField::Size, RegionFilter::SharedObject)),
        dex_pss: opts.dex.then(|| total(MemoryField::Pss, RegionFilter::Dex)),
        dex_size: opts.dex.then(|| total(MemoryField::Size, RegionFilter::Dex)),
    };

    Report {
        process_name: &opts.process_name,
        sort_field: opts.sort_field,
        objects,
        categories,
        summary,
    }
}
