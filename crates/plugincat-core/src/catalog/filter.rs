/// Catalog filtering: name search plus format, bitness, and favorite toggles.
use crate::model::{Bitness, PluginFormat, PluginRecord};

/// A conjunction of optional criteria. The default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Case-insensitive substring of the display name.
    pub search: Option<String>,
    pub format: Option<PluginFormat>,
    pub bitness: Option<Bitness>,
    pub favorites_only: bool,
}

impl CatalogFilter {
    pub fn matches(&self, record: &PluginRecord) -> bool {
        if let Some(search) = &self.search {
            if !record.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        if self.format.is_some_and(|f| f != record.format) {
            return false;
        }
        if self.bitness.is_some_and(|b| b != record.bitness) {
            return false;
        }
        !self.favorites_only || record.favorite
    }
}
