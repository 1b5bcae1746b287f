/// Directory walker using `jwalk`.
///
/// Walks one root at a time with `sort(true)`, so entries come out in file
/// name order within each directory and two scans of an unchanged tree emit
/// records in the same order. Symlinks are cataloged but never followed.
///
/// # Bundles
///
/// VST3 and AU plugins are usually bundles: directories named `Foo.vst3` or
/// `Foo.component` holding the real binary somewhere inside. A bundle is
/// cataloged as a single record and the walker is told not to descend into
/// it (`read_children_path = None`), so the inner `Contents/x86_64-win/Foo.vst3`
/// of a Windows VST3 bundle is not cataloged twice. A root that is itself a
/// bundle is cataloged the same way.
use crate::classify::{kind_for_extension, FileKind};
use crate::scanner::progress::{ScanProgress, ScanSummary};
use crate::scanner::Scanner;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Send an `Update` every this many visited files.
const UPDATE_INTERVAL: u64 = 500;

/// Whether a walk ran to the end of its root or stopped on cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WalkOutcome {
    Finished,
    Cancelled,
}

/// `true` for directory names that are plugin bundles.
fn is_bundle_dir_name(name: &std::ffi::OsStr) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| kind_for_extension(ext).is_bundle_format())
        .unwrap_or(false)
}

/// Walk `root`, emitting a `Found` message for every accepted plugin.
///
/// `root` must exist; the caller filters missing roots. Counters in
/// `summary` accumulate across roots.
pub(crate) fn walk_root<F>(
    scanner: &Scanner,
    root: &Path,
    cancel: &AtomicBool,
    summary: &mut ScanSummary,
    sink: &mut F,
) -> WalkOutcome
where
    F: FnMut(ScanProgress),
{
    // A root that is itself a bundle is one record, like a bundle found inside a root.
    if root.is_dir() {
        if let Some(name) = root.file_name() {
            if is_bundle_dir_name(name) {
                let kind = scanner.classifier.classify(&name.to_string_lossy()).kind;
                emit_record(scanner, root, kind, summary, sink);
                return WalkOutcome::Finished;
            }
        }
    }

    let parallelism = if scanner.threads <= 1 {
        jwalk::Parallelism::Serial
    } else {
        jwalk::Parallelism::RayonNewPool(scanner.threads)
    };

    let walker = jwalk::WalkDir::new(root)
        .sort(true)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(parallelism)
        .process_read_dir(|_depth, _path, _state, children| {
            for child in children.iter_mut().flatten() {
                if child.file_type().is_dir() && is_bundle_dir_name(child.file_name()) {
                    child.read_children_path = None;
                }
            }
        });

    for entry_result in walker {
        if cancel.load(Ordering::Relaxed) {
            return WalkOutcome::Cancelled;
        }

        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                // jwalk errors are typically access-denied on directories.
                summary.error_count += 1;
                let err_path = err
                    .path()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_default();
                debug!("Skipping unreadable entry {err_path}: {err}");
                sink(ScanProgress::Error {
                    path: err_path,
                    message: format!("{err}"),
                });
                continue;
            }
        };

        let path: PathBuf = entry.path();
        let file_type = entry.file_type();

        // A symlink is cataloged under its own path; look through it only to
        // learn whether it points at a file or a bundle directory.
        let is_dir = if file_type.is_symlink() {
            match std::fs::metadata(&path) {
                Ok(meta) => meta.is_dir(),
                Err(err) => {
                    summary.error_count += 1;
                    sink(ScanProgress::Error {
                        path: path.to_string_lossy().into_owned(),
                        message: format!("{err}"),
                    });
                    continue;
                }
            }
        } else {
            file_type.is_dir()
        };

        // The root itself is a container, not a candidate.
        if entry.depth == 0 && is_dir {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let classification = scanner.classifier.classify(&file_name);

        if is_dir {
            // Plain folders are walked, not cataloged; a folder named `x.dll`
            // is not a plugin either.
            if !classification.kind.is_bundle_format() {
                continue;
            }
        } else {
            summary.files_seen += 1;
            if summary.files_seen % UPDATE_INTERVAL == 0 {
                sink(ScanProgress::Update {
                    files_seen: summary.files_seen,
                    plugins_found: summary.plugins_found,
                    current_path: path.to_string_lossy().into_owned(),
                });
            }
            if classification.kind == FileKind::NotAPlugin {
                continue;
            }
        }

        if classification.excluded {
            debug!("Skipping excluded library {}", path.display());
            continue;
        }

        emit_record(scanner, &path, classification.kind, summary, sink);
    }

    WalkOutcome::Finished
}

/// Inspect one accepted entry and send it as `Found`.
///
/// The catalog is stored as JSON, so a path that is not valid UTF-8 cannot be
/// saved; it is reported as an error and skipped.
fn emit_record<F>(
    scanner: &Scanner,
    path: &Path,
    kind: FileKind,
    summary: &mut ScanSummary,
    sink: &mut F,
) where
    F: FnMut(ScanProgress),
{
    if path.to_str().is_none() {
        summary.error_count += 1;
        debug!("Skipping non-UTF-8 path {}", path.display());
        sink(ScanProgress::Error {
            path: path.to_string_lossy().into_owned(),
            message: "path is not valid UTF-8 and cannot be cataloged".into(),
        });
        return;
    }

    if let Some(record) = scanner.inspect(path, kind) {
        summary.plugins_found += 1;
        sink(ScanProgress::Found(record));
    }
}
