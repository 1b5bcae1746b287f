/// A single entry in the plugin catalog.
///
/// Records are keyed by `path`: it is the only field used to correlate a
/// freshly scanned record with one already in the catalog. `format` and
/// `bitness` are advisory classifications taken from the file name and the
/// executable header, never from loading the plugin.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Plugin binary format, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum PluginFormat {
    #[serde(rename = "VST2")]
    Vst2,
    #[serde(rename = "VST3")]
    Vst3,
    #[serde(rename = "AU")]
    Au,
    Unknown,
}

impl PluginFormat {
    /// Label used in the catalog file, listings and CSV export.
    pub fn label(self) -> &'static str {
        match self {
            Self::Vst2 => "VST2",
            Self::Vst3 => "VST3",
            Self::Au => "AU",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a user-supplied label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "vst2" | "vst" => Some(Self::Vst2),
            "vst3" => Some(Self::Vst3),
            "au" | "component" => Some(Self::Au),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

// Unrecognised labels in an older or hand-edited catalog degrade to `Unknown`.
impl From<String> for PluginFormat {
    fn from(label: String) -> Self {
        Self::from_label(&label).unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for PluginFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Target processor word size of a plugin binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Bitness {
    #[serde(rename = "32-bit")]
    Bit32,
    #[serde(rename = "64-bit")]
    Bit64,
    Unknown,
}

impl Bitness {
    /// Label used in the catalog file, listings and CSV export.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bit32 => "32-bit",
            Self::Bit64 => "64-bit",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a user-supplied label. Accepts `32`, `32-bit`, `x86`, etc.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "32" | "32-bit" | "32bit" | "x86" => Some(Self::Bit32),
            "64" | "64-bit" | "64bit" | "x64" => Some(Self::Bit64),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl From<String> for Bitness {
    fn from(label: String) -> Self {
        Self::from_label(&label).unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for Bitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One discovered (or manually added) plugin binary.
///
/// Field order and names match the on-disk `plugins.json` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRecord {
    /// Display name: version-resource product name if present, else the file stem.
    pub name: String,
    pub format: PluginFormat,
    pub bitness: Bitness,
    /// Absolute filesystem path. The record's identity within a catalog.
    pub path: PathBuf,
    /// Company name from the version resource, or empty.
    #[serde(default)]
    pub vendor: String,
    /// Free-text user notes.
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub favorite: bool,
}

impl PluginRecord {
    /// Create a record as the scanner emits it: no notes, not a favorite.
    pub fn scanned(
        name: String,
        format: PluginFormat,
        bitness: Bitness,
        path: PathBuf,
        vendor: String,
    ) -> Self {
        Self {
            name,
            format,
            bitness,
            path,
            vendor,
            notes: String::new(),
            favorite: false,
        }
    }

    /// Create a record for a plugin added by hand.
    ///
    /// The name defaults to the file stem; bitness is left `Unknown` until
    /// the user edits it.
    pub fn manual(path: PathBuf, format: PluginFormat) -> Self {
        let name = file_stem(&path);
        Self::scanned(name, format, Bitness::Unknown, path, String::new())
    }
}

/// File name without its final extension, lossily converted to UTF-8.
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
