/// plugincat Core: plugin discovery, header inspection, and the catalog.
///
/// This crate contains all business logic with zero UI dependencies.
/// Front ends (the bundled CLI, or anything else) own presentation state and
/// call into the stateless scan and merge functions here.
///
/// # Modules
///
/// - [`model`]: `PluginRecord` and its format/bitness tags.
/// - [`classify`]: File-name based plugin format classification.
/// - [`inspect`]: PE header probing and version-resource lookup.
/// - [`platform`]: Default plugin folders and the Windows version-resource API.
/// - [`scanner`]: Directory walking with incremental progress reporting.
/// - [`catalog`]: Merging rescans, user edits, filtering, persistence, export.
/// - [`config`]: Scan configuration (extra roots and exclusions).
pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod inspect;
pub mod model;
pub mod platform;
pub mod scanner;

pub use catalog::{merge_scan, Catalog, MergeOutcome};
pub use model::{Bitness, PluginFormat, PluginRecord};
pub use scanner::scan;
