//! Aggregation of smaps blocks into per-name regions.
//!
//! A forward pass over the lines groups each head line with the detail lines
//! that follow it. Blocks sharing a name are merged, so a library mapped as
//! several segments ends up as one region.

use ahash::AHashMap as HashMap;
use serde::Serialize;
use tracing::{debug, trace};

use super::line::{extract_field, is_head_line, object_name, UNKNOWN_REGION};
use super::stats::{MemoryField, MemoryStats};

/// One named region with its accumulated counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub name: String,
    pub stats: MemoryStats,
}

/// Mapping from region name to region, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct SmapTable {
    regions: Vec<Region>,
    index: HashMap<String, usize>,
}

impl SmapTable {
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.index.get(name).map(|&i| &self.regions[i])
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    /// Returns the index of `name`, creating an empty region if needed.
    fn entry(&mut self, name: &str) -> (usize, bool) {
        if let Some(&i) = self.index.get(name) {
            return (i, true);
        }
        let i = self.regions.len();
        self.regions.push(Region {
            name: name.to_string(),
            stats: MemoryStats::default(),
        });
        self.index.insert(name.to_string(), i);
        (i, false)
    }
}

impl<'a> IntoIterator for &'a SmapTable {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

enum State {
    ScanningForHead,
    Accumulating(usize),
}

/// Parses smaps text into a [`SmapTable`].
///
/// Never fails: unrecognized lines are skipped. Detail lines that appear
/// before the first head line are counted against the `"unknown"` region.
pub fn parse_smaps(content: &str) -> SmapTable {
    parse_smap_lines(content.lines())
}

/// Same as [`parse_smaps`], over pre-split lines (newlines already stripped).
pub fn parse_smap_lines<'a, I>(lines: I) -> SmapTable
where
    I: IntoIterator<Item = &'a str>,
{
    let mut table = SmapTable::default();
    let mut state = State::ScanningForHead;
    let mut line_count = 0usize;
    let mut block_count = 0usize;
    let mut merged_blocks = 0usize;

    for line in lines {
        line_count += 1;

        if is_head_line(line) {
            let (i, merged) = table.entry(object_name(line));
            block_count += 1;
            if merged {
                merged_blocks += 1;
            }
            state = State::Accumulating(i);
            continue;
        }

        let region = match state {
            State::Accumulating(i) => i,
            State::ScanningForHead => {
                debug!("Detail data before first head line, using '{}'", UNKNOWN_REGION);
                let (i, _) = table.entry(UNKNOWN_REGION);
                state = State::Accumulating(i);
                i
            }
        };

        let Some((key, kb)) = extract_field(line) else {
            continue;
        };
        match MemoryField::from_key(&key) {
            Some(field) => table.regions[region].stats.add(field, kb),
            None => trace!("Ignoring unrecognized smaps field '{}'", key),
        }
    }

    debug!(
        "Parsed {} lines into {} regions ({} blocks, {} merged)",
        line_count,
        table.len(),
        block_count,
        merged_blocks
    );

    table
}
