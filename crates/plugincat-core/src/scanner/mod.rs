/// Scanner module: walks plugin folders and builds catalog records.
///
/// Three entry points, all built on the same walk:
/// - [`scan`] / [`Scanner::scan`]: synchronous, returns the finished batch.
/// - [`Scanner::scan_with`]: synchronous, streams [`ScanProgress`] to a
///   callback and honours a cancel flag between files.
/// - [`start_scan`]: runs `scan_with` on a background thread and delivers
///   progress over a bounded crossbeam channel.
///
/// Scanning is read-only and never fails as a whole: missing roots are
/// skipped, unreadable entries are reported and skipped, and header or
/// version-resource problems degrade to `Unknown`/absent fields.
pub mod progress;
mod walk;

use crate::classify::{Classifier, FileKind};
use crate::config::ScanConfig;
use crate::inspect::{detect_bitness, VersionInfoSource, VersionLookup};
use crate::model::record::file_stem;
use crate::model::{Bitness, PluginRecord};
use crate::platform;
use progress::{ScanProgress, ScanSummary};

use crossbeam_channel::Receiver;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info};
use walk::WalkOutcome;

/// Discovery engine: classifier, version-resource source, walker settings.
pub struct Scanner {
    classifier: Classifier,
    version_source: Box<dyn VersionInfoSource>,
    threads: usize,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Built-in exclusions, the platform's version source, one walker
    /// thread per logical CPU.
    pub fn new() -> Self {
        Self {
            classifier: Classifier::new(),
            version_source: platform::default_version_source(),
            threads: num_cpus::get(),
        }
    }

    /// Scanner honouring a [`ScanConfig`]'s exclusions and thread count.
    /// Roots are passed separately to the scan calls.
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            classifier: Classifier::with_exclusions(&config.excluded_files),
            version_source: platform::default_version_source(),
            threads: config.thread_count(),
        }
    }

    /// Replace the version-resource source.
    pub fn with_version_source(mut self, source: Box<dyn VersionInfoSource>) -> Self {
        self.version_source = source;
        self
    }

    /// Set walker parallelism; `1` walks on the calling thread.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Build the record for one accepted file or bundle.
    ///
    /// `.dll` candidates get header inspection and a version-resource
    /// lookup; VST3 and AU are assumed 64-bit and named after the file stem.
    pub fn inspect(&self, path: &Path, kind: FileKind) -> Option<PluginRecord> {
        let format = kind.format()?;
        let stem = file_stem(path);

        let record = match kind {
            FileKind::Vst2Candidate => {
                let bitness = detect_bitness(path);
                let lookup = self.version_source.read(path);
                if let VersionLookup::Missing = lookup {
                    debug!("No version resource in {}", path.display());
                }
                let info = lookup.info();
                let name = info
                    .and_then(|i| i.product_name.clone())
                    .unwrap_or(stem);
                let vendor = info
                    .and_then(|i| i.company_name.clone())
                    .unwrap_or_default();
                PluginRecord::scanned(name, format, bitness, path.to_path_buf(), vendor)
            }
            FileKind::Vst3 | FileKind::Au => PluginRecord::scanned(
                stem,
                format,
                Bitness::Bit64,
                path.to_path_buf(),
                String::new(),
            ),
            FileKind::NotAPlugin => return None,
        };
        Some(record)
    }

    /// Scan `roots` in order and return every record found.
    pub fn scan(&self, roots: &[PathBuf]) -> Vec<PluginRecord> {
        let mut records = Vec::new();
        let never = AtomicBool::new(false);
        self.scan_with(roots, &never, |msg| {
            if let ScanProgress::Found(record) = msg {
                records.push(record);
            }
        });
        records
    }

    /// Scan `roots` in order, streaming progress to `sink`.
    ///
    /// `cancel` is checked before every entry. The final message is always
    /// `Complete` or `Cancelled`.
    pub fn scan_with<F>(&self, roots: &[PathBuf], cancel: &AtomicBool, mut sink: F) -> ScanSummary
    where
        F: FnMut(ScanProgress),
    {
        let start = Instant::now();
        let mut summary = ScanSummary::default();

        for root in roots {
            if !root.exists() {
                debug!("Skipping missing root {}", root.display());
                sink(ScanProgress::RootSkipped(root.clone()));
                continue;
            }
            let root = std::path::absolute(root).unwrap_or_else(|_| root.clone());
            info!("Scanning {}", root.display());

            if walk::walk_root(self, &root, cancel, &mut summary, &mut sink)
                == WalkOutcome::Cancelled
            {
                summary.cancelled = true;
                break;
            }
        }

        summary.duration = start.elapsed();
        if summary.cancelled {
            info!(
                "Scan cancelled after {} plugins in {:?}",
                summary.plugins_found, summary.duration
            );
            sink(ScanProgress::Cancelled);
        } else {
            info!(
                "Scan complete: {} plugins in {} files ({} errors) in {:?}",
                summary.plugins_found, summary.files_seen, summary.error_count, summary.duration
            );
            sink(ScanProgress::Complete {
                duration: summary.duration,
                plugins_found: summary.plugins_found,
                error_count: summary.error_count,
            });
        }
        summary
    }
}

/// Scan `roots` with the default scanner.
pub fn scan(roots: &[PathBuf]) -> Vec<PluginRecord> {
    Scanner::new().scan(roots)
}

/// Maximum number of progress messages that may queue up in the channel.
///
/// Every discovered plugin is one message, so the consumer must keep
/// draining; if it falls behind the scanner blocks rather than buffering
/// without bound.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a running or completed background scan.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    /// Join handle for the scan thread.
    _thread: Option<thread::JoinHandle<()>>,
}

/// Everything a background scan reported, collected by [`ScanHandle::wait`].
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub records: Vec<PluginRecord>,
    /// `(path, message)` for every non-fatal error.
    pub errors: Vec<(String, String)>,
    pub cancelled: bool,
}

impl ScanHandle {
    /// Request the scan to stop before the next file.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Block until the scan finishes, collecting records and errors.
    pub fn wait(self) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        for msg in self.progress_rx.iter() {
            match msg {
                ScanProgress::Found(record) => outcome.records.push(record),
                ScanProgress::Error { path, message } => outcome.errors.push((path, message)),
                ScanProgress::Complete { .. } => break,
                ScanProgress::Cancelled => {
                    outcome.cancelled = true;
                    break;
                }
                ScanProgress::RootSkipped(_) | ScanProgress::Update { .. } => {}
            }
        }
        outcome
    }
}

/// Start a scan of `roots` on a background thread.
///
/// If the receiving side is dropped, the scan cancels itself.
pub fn start_scan(scanner: Scanner, roots: Vec<PathBuf>) -> ScanHandle {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let thread = thread::Builder::new()
        .name("plugincat-scanner".into())
        .spawn(move || {
            info!("Starting background scan of {} roots", roots.len());
            scanner.scan_with(&roots, &cancel_clone, |msg| {
                if progress_tx.send(msg).is_err() {
                    cancel_clone.store(true, Ordering::Relaxed);
                }
            });
        })
        .expect("failed to spawn scanner thread");

    ScanHandle {
        progress_rx,
        cancel_flag,
        _thread: Some(thread),
    }
}
