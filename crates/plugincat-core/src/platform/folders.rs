/// Conventional plugin install folders.
///
/// The list covers the usual VST2, VST3 and Audio Unit locations on Windows
/// and macOS. Entries built from environment variables are left out when the
/// variable is unset. Folders that do not exist are returned anyway; the
/// scanner skips them.
use std::path::PathBuf;

/// Returns the default scan roots in scan order.
pub fn default_plugin_folders() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    // Windows-style roots built from environment variables. These resolve
    // only on Windows in practice, but the lookup is harmless elsewhere.
    let env_roots: [(&str, &str); 6] = [
        ("ProgramFiles", r"Steinberg\VstPlugins"),
        ("ProgramFiles(x86)", r"Steinberg\VstPlugins"),
        ("ProgramFiles", "VSTPlugins"),
        ("ProgramFiles(x86)", "VSTPlugins"),
        ("CommonProgramFiles", "VST2"),
        ("CommonProgramFiles", "VST3"),
    ];
    for (var, rel) in env_roots {
        if let Some(base) = std::env::var_os(var) {
            dirs.push(PathBuf::from(base).join(rel));
        }
    }

    // macOS system-wide locations.
    dirs.push(PathBuf::from("/Library/Audio/Plug-Ins/VST"));
    dirs.push(PathBuf::from("/Library/Audio/Plug-Ins/VST3"));
    dirs.push(PathBuf::from("/Library/Audio/Plug-Ins/Components"));

    // macOS per-user locations.
    #[cfg(target_os = "macos")]
    if let Some(home) = std::env::var_os("HOME") {
        let user = PathBuf::from(home).join("Library/Audio/Plug-Ins");
        dirs.push(user.join("VST"));
        dirs.push(user.join("VST3"));
        dirs.push(user.join("Components"));
    }

    dirs.dedup();
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_system_audio_unit_folder() {
        let dirs = default_plugin_folders();
        assert!(dirs
            .iter()
            .any(|d| d == &PathBuf::from("/Library/Audio/Plug-Ins/Components")));
    }

    #[test]
    fn no_duplicate_adjacent_entries() {
        let dirs = default_plugin_folders();
        assert!(dirs.windows(2).all(|w| w[0] != w[1]));
    }
}
