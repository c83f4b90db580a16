//! Directory-versus-catalog name diff.

use std::collections::BTreeSet;

/// The three views of a directory listing against the catalog.
///
/// Every name from either side lands in exactly one of the three sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncDiff {
    /// On disk but not in the catalog.
    pub disk_only: BTreeSet<String>,
    /// In the catalog but missing from disk.
    pub catalog_only: BTreeSet<String>,
    /// Present on both sides.
    pub both: BTreeSet<String>,
}

impl SyncDiff {
    /// Whether disk and catalog hold the same names.
    pub fn is_in_sync(&self) -> bool {
        self.disk_only.is_empty() && self.catalog_only.is_empty()
    }

    /// Every name seen on either side.
    pub fn all_names(&self) -> BTreeSet<String> {
        self.disk_only
            .iter()
            .chain(&self.catalog_only)
            .chain(&self.both)
            .cloned()
            .collect()
    }
}

/// Compare on-disk names with catalog names.
///
/// Names compare exactly (case-sensitive); duplicates collapse.
pub fn diff_names<D, C, S, T>(disk: D, catalog: C) -> SyncDiff
where
    D: IntoIterator<Item = S>,
    C: IntoIterator<Item = T>,
    S: Into<String>,
    T: Into<String>,
{
    let disk: BTreeSet<String> = disk.into_iter().map(Into::into).collect();
    let catalog: BTreeSet<String> = catalog.into_iter().map(Into::into).collect();

    SyncDiff {
        disk_only: disk.difference(&catalog).cloned().collect(),
        catalog_only: catalog.difference(&disk).cloned().collect(),
        both: disk.intersection(&catalog).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn assert_partition(disk: &[&str], catalog: &[&str]) {
        let diff = diff_names(disk.iter().copied(), catalog.iter().copied());
        let union: BTreeSet<String> = set(disk).union(&set(catalog)).cloned().collect();
        assert_eq!(diff.all_names(), union);

        let total = diff.disk_only.len() + diff.catalog_only.len() + diff.both.len();
        assert_eq!(total, union.len(), "views overlap for {disk:?} / {catalog:?}");
    }

    #[test]
    fn test_three_views() {
        let diff = diff_names(["a.wad", "b.zip", "c.pk3"], ["b.zip", "c.pk3", "d.wad"]);
        assert_eq!(diff.disk_only, set(&["a.wad"]));
        assert_eq!(diff.catalog_only, set(&["d.wad"]));
        assert_eq!(diff.both, set(&["b.zip", "c.pk3"]));
        assert!(!diff.is_in_sync());
    }

    #[test]
    fn test_partition_holds() {
        assert_partition(&[], &[]);
        assert_partition(&["a"], &[]);
        assert_partition(&[], &["a"]);
        assert_partition(&["a", "b"], &["a", "b"]);
        assert_partition(&["a", "a", "b"], &["b", "c", "c"]);
        assert_partition(&["A.wad"], &["a.wad"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let diff = diff_names(vec!["x", "x", "y"], vec!["y", "y"]);
        assert_eq!(diff.disk_only, set(&["x"]));
        assert_eq!(diff.both, set(&["y"]));
        assert!(diff.catalog_only.is_empty());
    }

    #[test]
    fn test_case_sensitive() {
        let diff = diff_names(["DOOM2.zip"], ["doom2.zip"]);
        assert_eq!(diff.disk_only, set(&["DOOM2.zip"]));
        assert_eq!(diff.catalog_only, set(&["doom2.zip"]));
        assert!(diff.both.is_empty());
    }

    #[test]
    fn test_in_sync() {
        let diff = diff_names(set(&["a", "b"]), set(&["b", "a"]));
        assert!(diff.is_in_sync());
        assert_eq!(diff.both.len(), 2);
    }
}
