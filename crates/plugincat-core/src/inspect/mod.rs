/// Binary inspection: executable header probing and version-resource lookup.
///
/// Both inspections are best-effort: every failure is an explicit variant
/// (`PeProbe::NotExecutable`, `VersionLookup::Missing`, ...) so callers can
/// tell "looked and found nothing" from "could not look".
pub mod pe;
pub mod version;

pub use pe::{detect_bitness, probe_pe, PeProbe};
pub use version::{NoVersionInfo, VersionInfo, VersionInfoSource, VersionLookup};
