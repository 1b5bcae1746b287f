/// Platform-specific functionality: conventional plugin folders and the
/// Windows version-resource API.
pub mod folders;
#[cfg(windows)]
pub mod version_info;

pub use folders::default_plugin_folders;

use crate::inspect::VersionInfoSource;

/// The version-resource source for the platform this binary was built for.
///
/// Windows reads `VS_VERSIONINFO` through `version.dll`; elsewhere lookups
/// report [`VersionLookup::Unsupported`](crate::inspect::VersionLookup::Unsupported).
pub fn default_version_source() -> Box<dyn VersionInfoSource> {
    #[cfg(windows)]
    {
        Box::new(version_info::WindowsVersionInfo)
    }

    #[cfg(not(windows))]
    {
        Box::new(crate::inspect::NoVersionInfo)
    }
}
