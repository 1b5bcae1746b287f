/// Version-resource lookup capability.
///
/// Product, company, and description strings live in a DLL's embedded
/// `VS_VERSIONINFO` resource. Reading it goes through the platform's version
/// API, so the capability is a trait: Windows provides a real source in
/// `platform::version_info` and every other platform uses [`NoVersionInfo`].
/// The choice is made once, at startup, by
/// [`crate::platform::default_version_source`].
use std::path::Path;

/// The three string fields read from a version resource.
///
/// Each field is independently optional; empty strings are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionInfo {
    pub product_name: Option<String>,
    pub company_name: Option<String>,
    pub file_description: Option<String>,
}

impl VersionInfo {
    /// Build from raw field values, dropping empty and whitespace-only strings.
    pub fn new(
        product_name: Option<String>,
        company_name: Option<String>,
        file_description: Option<String>,
    ) -> Self {
        Self {
            product_name: non_empty(product_name),
            company_name: non_empty(company_name),
            file_description: non_empty(file_description),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim_end_matches('\0').trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Outcome of a version-resource lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionLookup {
    /// A resource with a translation table was found.
    Found(VersionInfo),
    /// The file is missing, has no version resource, or no translation entry.
    Missing,
    /// This platform has no version-resource API; the lookup was not attempted.
    Unsupported,
}

impl VersionLookup {
    /// The info if one was found.
    pub fn info(&self) -> Option<&VersionInfo> {
        match self {
            Self::Found(info) => Some(info),
            Self::Missing | Self::Unsupported => None,
        }
    }
}

/// Something that can read version resources from a binary.
pub trait VersionInfoSource: Send + Sync {
    fn read(&self, path: &Path) -> VersionLookup;
}

/// Source for platforms without a version-resource API.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVersionInfo;

impl VersionInfoSource for NoVersionInfo {
    fn read(&self, _path: &Path) -> VersionLookup {
        VersionLookup::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_become_absent() {
        let info = VersionInfo::new(
            Some("Serum\0".into()),
            Some("   ".into()),
            Some(String::new()),
        );
        assert_eq!(info.product_name.as_deref(), Some("Serum"));
        assert_eq!(info.company_name, None);
        assert_eq!(info.file_description, None);
    }

    #[test]
    fn no_version_info_is_unsupported() {
        let lookup = NoVersionInfo.read(Path::new("C:/x.dll"));
        assert_eq!(lookup, VersionLookup::Unsupported);
        assert!(lookup.info().is_none());
    }
}
