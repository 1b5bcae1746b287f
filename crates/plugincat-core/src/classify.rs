/// Plugin format classification based on file names.
///
/// A pure function of the name: `.dll` is a VST2 candidate, `.vst3` is VST3,
/// `.component` is an Audio Unit, everything else is not a plugin. VST2
/// candidates are additionally checked against a set of well-known runtime
/// libraries that ship next to plugins but are never plugins themselves.
use crate::model::PluginFormat;
use std::collections::HashSet;

/// Lowercase file names of DLLs that are skipped outright.
///
/// These are redistributable runtimes and embedded browser loaders that
/// plugin installers drop into the same folders as the plugin binaries.
pub const EXCLUDED_FILES: &[&str] = &[
    "webview2loader.dll",
    "embeddedbrowserwebview.dll",
    "libcef.dll",
    "chrome_elf.dll",
    "d3dcompiler_47.dll",
    "libegl.dll",
    "libglesv2.dll",
    "vcruntime140.dll",
    "vcruntime140_1.dll",
    "msvcp140.dll",
    "msvcp140_1.dll",
    "msvcp140_2.dll",
    "concrt140.dll",
    "ucrtbase.dll",
    "ffmpeg.dll",
];

/// What a file name says about the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// `.dll`: possibly a VST2 plugin, header inspection decides bitness.
    Vst2Candidate,
    /// `.vst3` file or bundle.
    Vst3,
    /// `.component` Audio Unit bundle.
    Au,
    NotAPlugin,
}

impl FileKind {
    /// The catalog format tag for this kind, if it is a plugin at all.
    pub fn format(self) -> Option<PluginFormat> {
        match self {
            Self::Vst2Candidate => Some(PluginFormat::Vst2),
            Self::Vst3 => Some(PluginFormat::Vst3),
            Self::Au => Some(PluginFormat::Au),
            Self::NotAPlugin => None,
        }
    }

    /// Bundle formats (VST3, AU) may be directories rather than files.
    pub fn is_bundle_format(self) -> bool {
        matches!(self, Self::Vst3 | Self::Au)
    }
}

/// Result of classifying one file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: FileKind,
    /// `true` if the name is on the exclusion list; the file is skipped.
    pub excluded: bool,
}

impl Classification {
    /// `true` if the scanner should produce a record for this file.
    pub fn is_accepted(&self) -> bool {
        !self.excluded && self.kind != FileKind::NotAPlugin
    }
}

/// Map a file extension (without the dot) to a [`FileKind`].
///
/// Zero-heap-allocation: the extension is lowercased into a fixed-size stack
/// buffer. Anything longer than the longest plugin extension is rejected
/// before lowercasing.
pub fn kind_for_extension(ext: &str) -> FileKind {
    let bytes = ext.as_bytes();
    if bytes.len() > 16 {
        return FileKind::NotAPlugin;
    }

    let mut lower = [0u8; 16];
    for (dest, &src) in lower.iter_mut().zip(bytes.iter()) {
        *dest = src.to_ascii_lowercase();
    }
    let lower_str = match std::str::from_utf8(&lower[..bytes.len()]) {
        Ok(s) => s,
        Err(_) => return FileKind::NotAPlugin,
    };

    match lower_str {
        "dll" => FileKind::Vst2Candidate,
        "vst3" => FileKind::Vst3,
        "component" => FileKind::Au,
        _ => FileKind::NotAPlugin,
    }
}

/// Classifier with the built-in exclusion set plus any configured extras.
#[derive(Debug, Clone)]
pub struct Classifier {
    excluded: HashSet<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    /// Classifier using only [`EXCLUDED_FILES`].
    pub fn new() -> Self {
        Self {
            excluded: EXCLUDED_FILES.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Classifier that also skips `extra` file names (matched case-insensitively).
    pub fn with_exclusions<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classifier = Self::new();
        classifier
            .excluded
            .extend(extra.into_iter().map(|s| s.as_ref().to_lowercase()));
        classifier
    }

    /// `true` if `file_name` is in the exclusion set.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.excluded.contains(&file_name.to_lowercase())
    }

    /// Classify a bare file name (no directory components).
    pub fn classify(&self, file_name: &str) -> Classification {
        let kind = match file_name.rsplit_once('.') {
            // A leading dot is a hidden file, not an extension.
            Some((stem, ext)) if !stem.is_empty() => kind_for_extension(ext),
            _ => FileKind::NotAPlugin,
        };
        let excluded = kind == FileKind::Vst2Candidate && self.is_excluded(file_name);
        Classification { kind, excluded }
    }
}

/// Classify `file_name` against the built-in exclusion set.
pub fn classify_file_name(file_name: &str) -> Classification {
    Classifier::new().classify(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_map_case_insensitively() {
        assert_eq!(classify_file_name("Serum.dll").kind, FileKind::Vst2Candidate);
        assert_eq!(classify_file_name("Serum.DLL").kind, FileKind::Vst2Candidate);
        assert_eq!(classify_file_name("Pro-Q 3.vst3").kind, FileKind::Vst3);
        assert_eq!(classify_file_name("Pro-Q 3.VST3").kind, FileKind::Vst3);
        assert_eq!(classify_file_name("Diva.component").kind, FileKind::Au);
    }

    #[test]
    fn other_names_are_not_plugins() {
        for name in ["readme.txt", "Serum", "Serum.dll.bak", ".dll", "x.vst", "x.aaxplugin", ""] {
            let c = classify_file_name(name);
            assert_eq!(c.kind, FileKind::NotAPlugin, "{name}");
            assert!(!c.excluded, "{name}");
            assert!(!c.is_accepted(), "{name}");
        }
    }

    #[test]
    fn long_extension_rejected() {
        assert_eq!(
            kind_for_extension("averyveryverylongextension"),
            FileKind::NotAPlugin
        );
    }

    #[test]
    fn exclusion_matches_whole_name_case_insensitively() {
        let c = classify_file_name("WebView2Loader.dll");
        assert_eq!(c.kind, FileKind::Vst2Candidate);
        assert!(c.excluded);
        assert!(!c.is_accepted());

        let c = classify_file_name("myWebView2Loader.dll");
        assert!(!c.excluded);
        assert!(c.is_accepted());
    }

    #[test]
    fn exclusions_only_apply_to_dlls() {
        let classifier = Classifier::with_exclusions(["Helper.vst3"]);
        assert!(!classifier.classify("helper.vst3").excluded);
    }

    #[test]
    fn configured_exclusions_extend_defaults() {
        let classifier = Classifier::with_exclusions(["Installer Helper.DLL"]);
        assert!(classifier.classify("installer helper.dll").excluded);
        assert!(classifier.classify("webview2loader.dll").excluded);
        assert!(!classifier.classify("Serum_x64.dll").excluded);
    }

    #[test]
    fn kind_formats() {
        assert_eq!(FileKind::Vst2Candidate.format(), Some(PluginFormat::Vst2));
        assert_eq!(FileKind::Au.format(), Some(PluginFormat::Au));
        assert_eq!(FileKind::NotAPlugin.format(), None);
        assert!(FileKind::Vst3.is_bundle_format());
        assert!(!FileKind::Vst2Candidate.is_bundle_format());
    }
}
