//! Per-region memory counters.
//!
//! Every counter is a kilobyte total accumulated over all smaps blocks that
//! share a region name. Unset counters read as zero.

use serde::Serialize;

/// Field kinds understood by the aggregator, keyed by their lower-cased
/// smaps label (`Shared_Clean:` becomes `shared_clean`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryField {
    Size,
    KernelPageSize,
    MmuPageSize,
    Rss,
    Pss,
    PssDirty,
    SharedClean,
    SharedDirty,
    PrivateClean,
    PrivateDirty,
    Referenced,
    Anonymous,
    Ksm,
    LazyFree,
    AnonHugePages,
    ShmemPmdMapped,
    FilePmdMapped,
    SharedHugetlb,
    PrivateHugetlb,
    Swap,
    SwapPss,
    Locked,
}

impl MemoryField {
    /// Maps a lower-cased smaps key to its field kind.
    pub fn from_key(key: &str) -> Option<Self> {
        let field = match key {
            "size" => Self::Size,
            "kernelpagesize" => Self::KernelPageSize,
            "mmupagesize" => Self::MmuPageSize,
            "rss" => Self::Rss,
            "pss" => Self::Pss,
            "pss_dirty" => Self::PssDirty,
            "shared_clean" => Self::SharedClean,
            "shared_dirty" => Self::SharedDirty,
            "private_clean" => Self::PrivateClean,
            "private_dirty" => Self::PrivateDirty,
            "referenced" => Self::Referenced,
            "anonymous" => Self::Anonymous,
            "ksm" => Self::Ksm,
            "lazyfree" => Self::LazyFree,
            "anonhugepages" => Self::AnonHugePages,
            "shmempmdmapped" => Self::ShmemPmdMapped,
            "filepmdmapped" => Self::FilePmdMapped,
            "shared_hugetlb" => Self::SharedHugetlb,
            "private_hugetlb" => Self::PrivateHugetlb,
            "swap" => Self::Swap,
            "swappss" => Self::SwapPss,
            "locked" => Self::Locked,
            _ => return None,
        };
        Some(field)
    }
}

/// Accumulated kilobyte counters of one region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    pub size: u64,
    pub kernel_page_size: u64,
    pub mmu_page_size: u64,
    pub rss: u64,
    pub pss: u64,
    pub pss_dirty: u64,
    pub shared_clean: u64,
    pub shared_dirty: u64,
    pub private_clean: u64,
    pub private_dirty: u64,
    pub referenced: u64,
    pub anonymous: u64,
    pub ksm: u64,
    pub lazy_free: u64,
    pub anon_huge_pages: u64,
    pub shmem_pmd_mapped: u64,
    pub file_pmd_mapped: u64,
    pub shared_hugetlb: u64,
    pub private_hugetlb: u64,
    pub swap: u64,
    pub swap_pss: u64,
    pub locked: u64,
}

impl MemoryStats {
    pub fn get(&self, field: MemoryField) -> u64 {
        *self.slot(field)
    }

    /// Adds `kb` to the counter, saturating at `u64::MAX`.
    pub fn add(&mut self, field: MemoryField, kb: u64) {
        let slot = self.slot_mut(field);
        *slot = slot.saturating_add(kb);
    }

    fn slot(&self, field: MemoryField) -> &u64 {
        match field {
            MemoryField::Size => &self.size,
            MemoryField::KernelPageSize => &self.kernel_page_size,
            MemoryField::MmuPageSize => &self.mmu_page_size,
            MemoryField::Rss => &self.rss,
            MemoryField::Pss => &self.pss,
            MemoryField::PssDirty => &self.pss_dirty,
            MemoryField::SharedClean => &self.shared_clean,
            MemoryField::SharedDirty => &self.shared_dirty,
            MemoryField::PrivateClean => &self.private_clean,
            MemoryField::PrivateDirty => &self.private_dirty,
            MemoryField::Referenced => &self.referenced,
            MemoryField::Anonymous => &self.anonymous,
            MemoryField::Ksm => &self.ksm,
            MemoryField::LazyFree => &self.lazy_free,
            MemoryField::AnonHugePages => &self.anon_huge_pages,
            MemoryField::ShmemPmdMapped => &self.shmem_pmd_mapped,
            MemoryField::FilePmdMapped => &self.file_pmd_mapped,
            MemoryField::SharedHugetlb => &self.shared_hugetlb,
            MemoryField::PrivateHugetlb => &self.private_hugetlb,
            MemoryField::Swap => &self.swap,
            MemoryField::SwapPss => &self.swap_pss,
            MemoryField::Locked => &self.locked,
        }
    }

    fn slot_mut(&mut self, field: MemoryField) -> &mut u64 {
        match field {
            MemoryField::Size => &mut self.size,
            MemoryField::KernelPageSize => &mut self.kernel_page_size,
            MemoryField::MmuPageSize => &mut self.mmu_page_size,
            MemoryField::Rss => &mut self.rss,
            MemoryField::Pss => &mut self.pss,
            MemoryField::PssDirty => &mut self.pss_dirty,
            MemoryField::SharedClean => &mut self.shared_clean,
            MemoryField::SharedDirty => &mut self.shared_dirty,
            MemoryField::PrivateClean => &mut self.private_clean,
            MemoryField::PrivateDirty => &mut self.private_dirty,
            MemoryField::Referenced => &mut self.referenced,
            MemoryField::Anonymous => &mut self.anonymous,
            MemoryField::Ksm => &mut self.ksm,
            MemoryField::LazyFree => &mut self.lazy_free,
            MemoryField::AnonHugePages => &mut self.anon_huge_pages,
            MemoryField::ShmemPmdMapped => &mut self.shmem_pmd_mapped,
            MemoryField::FilePmdMapped => &mut self.file_pmd_mapped,
            MemoryField::SharedHugetlb => &mut self.shared_hugetlb,
            MemoryField::PrivateHugetlb => &mut self.private_hugetlb,
            MemoryField::Swap => &mut self.swap,
            MemoryField::SwapPss => &mut self.swap_pss,
            MemoryField::Locked => &mut self.locked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_known_fields() {
        assert_eq!(MemoryField::from_key("pss"), Some(MemoryField::Pss));
        assert_eq!(
            MemoryField::from_key("shared_clean"),
            Some(MemoryField::SharedClean)
        );
        assert_eq!(MemoryField::from_key("swappss"), Some(MemoryField::SwapPss));
        assert_eq!(
            MemoryField::from_key("anonymous"),
            Some(MemoryField::Anonymous)
        );
    }

    #[test]
    fn test_from_key_is_case_sensitive_and_rejects_unknown() {
        // Callers lower-case before lookup
        assert_eq!(MemoryField::from_key("Pss"), None);
        assert_eq!(MemoryField::from_key("thpeligible"), None);
        assert_eq!(MemoryField::from_key(""), None);
    }

    #[test]
    fn test_add_accumulates_and_saturates() {
        let mut stats = MemoryStats::default();
        assert_eq!(stats.get(MemoryField::Rss), 0);

        stats.add(MemoryField::Rss, 10);
        stats.add(MemoryField::Rss, 32);
        assert_eq!(stats.get(MemoryField::Rss), 42);
        assert_eq!(stats.rss, 42);

        stats.add(MemoryField::Swap, u64::MAX);
        stats.add(MemoryField::Swap, 1);
        assert_eq!(stats.swap, u64::MAX);

        // Other counters untouched
        assert_eq!(stats.pss, 0);
    }
}
