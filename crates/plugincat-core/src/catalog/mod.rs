/// The plugin catalog: merging rescans and applying user edits.
///
/// A catalog is an ordered list of [`PluginRecord`]s with unique paths.
/// Rescans only ever append: an entry whose path is already known is left
/// exactly as it is, so favorites, notes, and hand-edited fields survive.
/// Nothing here deletes entries for files that have disappeared; removal is
/// always an explicit [`Catalog::remove`].
pub mod export;
pub mod filter;
pub mod store;

pub use filter::CatalogFilter;
pub use store::CatalogStore;

use crate::error::CatalogError;
use crate::model::{Bitness, PluginFormat, PluginRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Result of merging a scan into an existing catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub catalog: Vec<PluginRecord>,
    /// Number of scanned records appended as new entries.
    pub added: usize,
}

/// Merge `scanned` into `existing`.
///
/// Existing entries keep their position and every field. Scanned records
/// with a new path are appended in scan order; a path repeated within
/// `scanned` (overlapping roots) is appended once.
pub fn merge_scan<I>(existing: Vec<PluginRecord>, scanned: I) -> MergeOutcome
where
    I: IntoIterator<Item = PluginRecord>,
{
    let mut known: HashSet<PathBuf> = existing.iter().map(|r| r.path.clone()).collect();
    let mut catalog = existing;
    let before = catalog.len();

    for record in scanned {
        if known.insert(record.path.clone()) {
            catalog.push(record);
        }
    }

    let added = catalog.len() - before;
    MergeOutcome { catalog, added }
}

/// Field changes a user can make to an entry. `None` leaves a field alone.
///
/// The path is deliberately absent: it is the entry's identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordEdit {
    pub name: Option<String>,
    pub vendor: Option<String>,
    pub format: Option<PluginFormat>,
    pub bitness: Option<Bitness>,
}

/// An ordered, path-unique collection of plugin records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<PluginRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from records, keeping the first entry for any repeated path.
    pub fn from_records(records: Vec<PluginRecord>) -> Self {
        merge_scan(Vec::new(), records).catalog.into()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PluginRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<PluginRecord> {
        self.records
    }

    pub fn get(&self, path: &Path) -> Option<&PluginRecord> {
        self.records.iter().find(|r| r.path == path)
    }

    fn get_mut(&mut self, path: &Path) -> Result<&mut PluginRecord, CatalogError> {
        self.records
            .iter_mut()
            .find(|r| r.path == path)
            .ok_or_else(|| CatalogError::NotFound(path.to_path_buf()))
    }

    /// Merge freshly scanned records; returns how many were new.
    pub fn merge<I>(&mut self, scanned: I) -> usize
    where
        I: IntoIterator<Item = PluginRecord>,
    {
        let outcome = merge_scan(std::mem::take(&mut self.records), scanned);
        self.records = outcome.catalog;
        outcome.added
    }

    /// Add an entry by hand. Fails if the path is already cataloged.
    pub fn add_manual(&mut self, record: PluginRecord) -> Result<(), CatalogError> {
        if self.get(&record.path).is_some() {
            return Err(CatalogError::DuplicatePath(record.path));
        }
        self.records.push(record);
        Ok(())
    }

    /// Remove and return the entry for `path`.
    pub fn remove(&mut self, path: &Path) -> Result<PluginRecord, CatalogError> {
        let index = self
            .records
            .iter()
            .position(|r| r.path == path)
            .ok_or_else(|| CatalogError::NotFound(path.to_path_buf()))?;
        Ok(self.records.remove(index))
    }

    /// Flip the favorite flag; returns the new value.
    pub fn toggle_favorite(&mut self, path: &Path) -> Result<bool, CatalogError> {
        let record = self.get_mut(path)?;
        record.favorite = !record.favorite;
        Ok(record.favorite)
    }

    pub fn set_favorite(&mut self, path: &Path, favorite: bool) -> Result<(), CatalogError> {
        self.get_mut(path)?.favorite = favorite;
        Ok(())
    }

    pub fn set_notes(&mut self, path: &Path, notes: impl Into<String>) -> Result<(), CatalogError> {
        self.get_mut(path)?.notes = notes.into();
        Ok(())
    }

    /// Apply a field edit to the entry at `path`.
    pub fn edit(&mut self, path: &Path, edit: RecordEdit) -> Result<(), CatalogError> {
        let record = self.get_mut(path)?;
        if let Some(name) = edit.name {
            record.name = name;
        }
        if let Some(vendor) = edit.vendor {
            record.vendor = vendor;
        }
        if let Some(format) = edit.format {
            record.format = format;
        }
        if let Some(bitness) = edit.bitness {
            record.bitness = bitness;
        }
        Ok(())
    }

    /// Entries matching `filter`, in catalog order.
    pub fn filter<'a>(&'a self, filter: &'a CatalogFilter) -> impl Iterator<Item = &'a PluginRecord> {
        self.records.iter().filter(move |r| filter.matches(r))
    }
}

impl From<Vec<PluginRecord>> for Catalog {
    fn from(records: Vec<PluginRecord>) -> Self {
        Self { records }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(path: &str) -> PluginRecord {
        PluginRecord::scanned(
            crate::model::record::file_stem(Path::new(path)),
            PluginFormat::Vst3,
            Bitness::Bit64,
            PathBuf::from(path),
            String::new(),
        )
    }

    #[test]
    fn merge_into_empty_appends_everything() {
        let out = merge_scan(Vec::new(), vec![rec("/p/a.vst3"), rec("/p/b.vst3")]);
        assert_eq!(out.added, 2);
        assert_eq!(out.catalog.len(), 2);
    }

    #[test]
    fn merge_keeps_existing_entries_untouched() {
        let mut known = rec("/p/a.vst3");
        known.notes = "great".into();
        known.favorite = true;
        known.name = "Renamed by hand".into();

        let out = merge_scan(vec![known.clone()], vec![rec("/p/a.vst3"), rec("/p/b.vst3")]);
        assert_eq!(out.added, 1);
        assert_eq!(out.catalog.len(), 2);
        assert_eq!(out.catalog[0], known);
        assert_eq!(out.catalog[1].path, PathBuf::from("/p/b.vst3"));
    }

    #[test]
    fn merge_is_idempotent() {
        let scanned = vec![rec("/p/a.vst3"), rec("/p/b.vst3")];
        let first = merge_scan(Vec::new(), scanned.clone());
        let second = merge_scan(first.catalog.clone(), scanned);
        assert_eq!(second.added, 0);
        assert_eq!(second.catalog, first.catalog);
    }

    #[test]
    fn merge_preserves_order() {
        let existing = vec![rec("/p/z.vst3"), rec("/p/m.vst3")];
        let out = merge_scan(
            existing,
            vec![rec("/p/c.vst3"), rec("/p/m.vst3"), rec("/p/a.vst3")],
        );
        let paths: Vec<_> = out.catalog.iter().map(|r| r.path.clone()).collect();
        assert_eq!(
            paths,
            ["/p/z.vst3", "/p/m.vst3", "/p/c.vst3", "/p/a.vst3"]
                .iter()
                .map(PathBuf::from)
                .collect::<Vec<_>>()
        );
        assert_eq!(out.added, 2);
    }

    #[test]
    fn merge_dedups_within_scan() {
        let out = merge_scan(Vec::new(), vec![rec("/p/a.vst3"), rec("/p/a.vst3")]);
        assert_eq!(out.added, 1);
    }

    #[test]
    fn edits_by_path() {
        let mut catalog = Catalog::from_records(vec![rec("/p/a.vst3"), rec("/p/b.vst3")]);
        let b = Path::new("/p/b.vst3");

        assert!(catalog.toggle_favorite(b).unwrap());
        assert!(!catalog.toggle_favorite(b).unwrap());
        catalog.set_favorite(b, true).unwrap();
        catalog.set_notes(b, "sidechain input").unwrap();
        catalog
            .edit(
                b,
                RecordEdit {
                    vendor: Some("FabFilter".into()),
                    bitness: Some(Bitness::Bit32),
                    ..Default::default()
                },
            )
            .unwrap();

        let entry = catalog.get(b).unwrap();
        assert!(entry.favorite);
        assert_eq!(entry.notes, "sidechain input");
        assert_eq!(entry.vendor, "FabFilter");
        assert_eq!(entry.bitness, Bitness::Bit32);
        assert_eq!(entry.name, "b");
    }

    #[test]
    fn edits_survive_rescan() {
        let mut catalog = Catalog::from_records(vec![rec("/p/a.vst3")]);
        let a = Path::new("/p/a.vst3");
        catalog.set_notes(a, "x").unwrap();
        catalog.set_favorite(a, true).unwrap();

        let added = catalog.merge(vec![rec("/p/a.vst3")]);
        assert_eq!(added, 0);
        let entry = catalog.get(a).unwrap();
        assert!(entry.favorite);
        assert_eq!(entry.notes, "x");
    }

    #[test]
    fn unknown_path_is_not_found() {
        let mut catalog = Catalog::new();
        let missing = Path::new("/nope.dll");
        assert!(matches!(
            catalog.toggle_favorite(missing),
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(catalog.remove(missing), Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn manual_add_rejects_duplicates_and_remove_works() {
        let mut catalog = Catalog::new();
        catalog
            .add_manual(PluginRecord::manual(PathBuf::from("/p/x.dll"), PluginFormat::Vst2))
            .unwrap();
        let dup = catalog.add_manual(PluginRecord::manual(
            PathBuf::from("/p/x.dll"),
            PluginFormat::Vst2,
        ));
        assert!(matches!(dup, Err(CatalogError::DuplicatePath(_))));

        let removed = catalog.remove(Path::new("/p/x.dll")).unwrap();
        assert_eq!(removed.name, "x");
        assert!(catalog.is_empty());
    }
}
