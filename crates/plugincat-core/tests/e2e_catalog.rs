/// End-to-end catalog tests: scan a real folder, merge into a persisted
/// catalog, annotate, rescan, and export.
use plugincat_core::catalog::export::export_csv;
use plugincat_core::catalog::{CatalogFilter, CatalogStore};
use plugincat_core::inspect::NoVersionInfo;
use plugincat_core::scanner::Scanner;
use plugincat_core::{merge_scan, Catalog, PluginFormat};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

fn rescan(root: &Path) -> Vec<plugincat_core::PluginRecord> {
    Scanner::new()
        .with_version_source(Box::new(NoVersionInfo))
        .scan(&[root.to_path_buf()])
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// Rediscovering an annotated entry keeps its notes; a new file is appended.
#[test]
fn rescan_keeps_notes_and_appends_new() {
    let plugins = TempDir::new().unwrap();
    let a = plugins.path().join("a.vst3");
    touch(&a);

    let first = merge_scan(Vec::new(), rescan(plugins.path()));
    assert_eq!(first.added, 1);
    let mut catalog = Catalog::from(first.catalog);
    catalog.set_notes(&a, "great").unwrap();

    touch(&plugins.path().join("b.vst3"));
    let second = merge_scan(catalog.clone().into_records(), rescan(plugins.path()));

    assert_eq!(second.added, 1);
    assert_eq!(second.catalog.len(), 2);
    assert_eq!(second.catalog[0], catalog.records()[0]);
    assert_eq!(second.catalog[0].notes, "great");
    assert!(second.catalog[1].path.ends_with("b.vst3"));
}

/// Merging the same scan twice adds nothing the second time.
#[test]
fn merge_twice_is_idempotent() {
    let plugins = TempDir::new().unwrap();
    touch(&plugins.path().join("x.vst3"));
    touch(&plugins.path().join("y.component"));

    let once = merge_scan(Vec::new(), rescan(plugins.path()));
    let twice = merge_scan(once.catalog.clone(), rescan(plugins.path()));
    assert_eq!(once.added, 2);
    assert_eq!(twice.added, 0);
    assert_eq!(twice.catalog, once.catalog);
}

/// Files that vanish between scans stay in the catalog.
#[test]
fn vanished_files_are_not_removed() {
    let plugins = TempDir::new().unwrap();
    let gone = plugins.path().join("gone.vst3");
    touch(&gone);

    let mut catalog = Catalog::from_records(rescan(plugins.path()));
    fs::remove_file(&gone).unwrap();
    assert_eq!(catalog.merge(rescan(plugins.path())), 0);
    assert!(catalog.get(&gone).is_some());
}

/// The full workflow through the store: scan, save, annotate, rescan, reload.
#[test]
fn store_workflow_preserves_annotations() {
    let plugins = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    let synth = plugins.path().join("Synth.vst3");
    touch(&synth);

    let store = CatalogStore::new(data.path().join("plugins.json"));
    let added = store.update(|c| c.merge(rescan(plugins.path()))).unwrap();
    assert_eq!(added, 1);

    store
        .update(|c| {
            c.toggle_favorite(&synth).unwrap();
            c.set_notes(&synth, "lush pads").unwrap();
        })
        .unwrap();

    touch(&plugins.path().join("Comp.component"));
    let added = store.update(|c| c.merge(rescan(plugins.path()))).unwrap();
    assert_eq!(added, 1);

    let catalog = store.load();
    assert_eq!(catalog.len(), 2);
    let entry = catalog.get(&synth).unwrap();
    assert!(entry.favorite);
    assert_eq!(entry.notes, "lush pads");

    let favorites_filter = CatalogFilter {
        favorites_only: true,
        ..Default::default()
    };
    let favorites: Vec<_> = catalog.filter(&favorites_filter).collect();
    assert_eq!(favorites.len(), 1);

    let au: Vec<_> = catalog
        .filter(&CatalogFilter {
            format: Some(PluginFormat::Au),
            ..Default::default()
        })
        .map(|r| r.name.clone())
        .collect();
    assert_eq!(au, ["Comp"]);
}

/// `save(load())` with no edits reproduces the same records in the same order.
#[test]
fn load_save_round_trip() {
    let plugins = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    for name in ["c.vst3", "a.vst3", "b.component"] {
        touch(&plugins.path().join(name));
    }
    let store = CatalogStore::new(data.path().join("plugins.json"));
    store.save(&Catalog::from_records(rescan(plugins.path()))).unwrap();

    let loaded = store.load();
    store.save(&loaded).unwrap();
    assert_eq!(store.load(), loaded);
    assert_eq!(loaded.len(), 3);
}

/// A corrupt catalog file degrades to an empty catalog, and the next save repairs it.
#[test]
fn corrupt_catalog_recovers_on_next_save() {
    let data = TempDir::new().unwrap();
    let path = data.path().join("plugins.json");
    fs::write(&path, "{{ definitely not json").unwrap();

    let store = CatalogStore::new(&path);
    assert!(store.load().is_empty());

    let plugins = TempDir::new().unwrap();
    touch(&plugins.path().join("z.vst3"));
    store.update(|c| c.merge(rescan(plugins.path()))).unwrap();
    assert_eq!(store.load().len(), 1);
}

/// Export writes the fixed header and one row per entry.
#[test]
fn export_writes_all_rows() {
    let plugins = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    touch(&plugins.path().join("one.vst3"));
    touch(&plugins.path().join("two.vst3"));

    let catalog = Catalog::from_records(rescan(plugins.path()));
    let dest: PathBuf = out.path().join("plugins.csv");
    export_csv(catalog.records(), &dest).unwrap();

    let text = fs::read_to_string(&dest).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "Name,Vendor,Format,Bitness,Favorite,Notes,Path");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("one,,VST3,64-bit,No,,"));
}

/// A file whose name is not valid UTF-8 is reported and skipped; the rest of
/// the scan still merges and saves.
#[cfg(target_os = "linux")]
#[test]
fn non_utf8_file_name_does_not_block_save() {
    use plugincat_core::scanner::progress::ScanProgress;
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    use std::sync::atomic::AtomicBool;

    let plugins = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    touch(&plugins.path().join("good.vst3"));
    touch(&plugins.path().join(OsStr::from_bytes(b"bad\xff.vst3")));

    let mut errors = Vec::new();
    let mut scanned = Vec::new();
    let summary = Scanner::new()
        .with_version_source(Box::new(NoVersionInfo))
        .scan_with(
            &[plugins.path().to_path_buf()],
            &AtomicBool::new(false),
            |msg| match msg {
                ScanProgress::Found(record) => scanned.push(record),
                ScanProgress::Error { path, .. } => errors.push(path),
                _ => {}
            },
        );
    assert_eq!(summary.error_count, 1);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("bad"));
    assert_eq!(scanned.len(), 1);

    let store = CatalogStore::new(data.path().join("plugins.json"));
    let added = store.update(|c| c.merge(scanned)).unwrap();
    assert_eq!(added, 1);
    let catalog = store.load();
    assert_eq!(catalog.len(), 1);
    assert!(catalog.records()[0].path.ends_with("good.vst3"));
}
