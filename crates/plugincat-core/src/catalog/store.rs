/// JSON persistence for the catalog.
///
/// The file is a pretty-printed JSON array of records, the same layout the
/// catalog has always used (`plugins.json`). Loading never fails: a missing
/// or unreadable file yields an empty catalog. Saving writes a temp file in
/// the target's directory and renames it over the target, so an interrupted
/// save leaves either the old catalog or the new one, never a torn file.
use crate::catalog::Catalog;
use crate::error::CatalogError;
use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Default catalog file name, relative to the working directory.
pub const DEFAULT_CATALOG_FILE: &str = "plugins.json";

/// A catalog file on disk.
///
/// All writes through one store are serialized: [`CatalogStore::update`]
/// holds the store's lock across load, modify, and save.
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the catalog. Absent, unreadable, or corrupt files give an empty catalog.
    pub fn load(&self) -> Catalog {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No catalog at {}, starting empty", self.path.display());
                return Catalog::new();
            }
            Err(err) => {
                warn!("Cannot read catalog {}: {err}; starting empty", self.path.display());
                return Catalog::new();
            }
        };

        match serde_json::from_str::<Catalog>(&text) {
            Ok(catalog) => {
                debug!("Loaded {} entries from {}", catalog.len(), self.path.display());
                // Collapse any duplicate paths from hand edits.
                Catalog::from_records(catalog.into_records())
            }
            Err(err) => {
                warn!("Catalog {} is corrupt ({err}); starting empty", self.path.display());
                Catalog::new()
            }
        }
    }

    /// Replace the catalog file with `catalog`.
    pub fn save(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let _guard = self.write_lock.lock();
        self.write_atomic(catalog)
    }

    /// Load, apply `f`, and save, holding the write lock throughout.
    ///
    /// Nothing is written if `f` panics.
    pub fn update<R>(&self, f: impl FnOnce(&mut Catalog) -> R) -> Result<R, CatalogError> {
        let _guard = self.write_lock.lock();
        let mut catalog = self.load();
        let result = f(&mut catalog);
        self.write_atomic(&catalog)?;
        Ok(result)
    }

    /// Like [`CatalogStore::update`] for fallible edits: the catalog is saved
    /// only when `f` returns `Ok`, and the file is left untouched otherwise.
    pub fn try_update<R>(
        &self,
        f: impl FnOnce(&mut Catalog) -> Result<R, CatalogError>,
    ) -> Result<R, CatalogError> {
        let _guard = self.write_lock.lock();
        let mut catalog = self.load();
        let result = f(&mut catalog)?;
        self.write_atomic(&catalog)?;
        Ok(result)
    }

    fn write_atomic(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let io_err = |source: std::io::Error| CatalogError::Io {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_vec_pretty(catalog)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.write_all(b"\n").map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;

        tmp.persist(&self.path)
            .map_err(|err| CatalogError::Persist {
                path: self.path.clone(),
                source: err.error,
            })?;

        debug!("Saved {} entries to {}", catalog.len(), self.path.display());
        Ok(())
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_FILE)
    }
}
