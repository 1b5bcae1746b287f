/// Scan progress reporting: messages emitted by the walker, either to a
/// callback (`Scanner::scan_with`) or over a crossbeam channel from the
/// background scan thread (`start_scan`).
use crate::model::PluginRecord;
use std::path::PathBuf;
use std::time::Duration;

/// Progress updates emitted while scanning.
///
/// Records are streamed as they are found, so a caller that stops early
/// still holds every record reported up to that point.
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// A plugin file or bundle was cataloged.
    Found(PluginRecord),
    /// A root folder does not exist and was skipped.
    RootSkipped(PathBuf),
    /// Periodic update with running totals.
    Update {
        files_seen: u64,
        plugins_found: u64,
        current_path: String,
    },
    /// A non-fatal error (e.g. permission denied on one folder).
    Error { path: String, message: String },
    /// Scanning finished.
    Complete {
        duration: Duration,
        plugins_found: u64,
        error_count: u64,
    },
    /// Scan was cancelled; records already reported remain valid.
    Cancelled,
}

/// Totals for a finished (or cancelled) scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Non-directory entries visited, plugin or not.
    pub files_seen: u64,
    pub plugins_found: u64,
    pub error_count: u64,
    pub duration: Duration,
    pub cancelled: bool,
}
