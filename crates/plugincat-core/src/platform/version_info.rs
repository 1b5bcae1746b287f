/// Version-resource reading through the Windows version API.
///
/// Mirrors the documented `GetFileVersionInfoSizeW` → `GetFileVersionInfoW`
/// → `VerQueryValueW` sequence. Size and translation lookups are fatal to
/// the whole read; each string field is looked up independently.
use crate::inspect::{VersionInfo, VersionInfoSource, VersionLookup};
use std::ffi::c_void;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use windows::core::PCWSTR;
use windows::Win32::Storage::FileSystem::{
    GetFileVersionInfoSizeW, GetFileVersionInfoW, VerQueryValueW,
};

/// Reads `ProductName`, `CompanyName`, and `FileDescription` via `version.dll`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsVersionInfo;

impl VersionInfoSource for WindowsVersionInfo {
    fn read(&self, path: &Path) -> VersionLookup {
        if !path.exists() {
            return VersionLookup::Missing;
        }

        let path_wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();
        let path_pcwstr = PCWSTR(path_wide.as_ptr());

        let size = unsafe { GetFileVersionInfoSizeW(path_pcwstr, None) };
        if size == 0 {
            return VersionLookup::Missing;
        }

        let mut block = vec![0u8; size as usize];
        let loaded = unsafe {
            GetFileVersionInfoW(path_pcwstr, 0, size, block.as_mut_ptr() as *mut c_void)
        };
        if let Err(err) = loaded {
            tracing::debug!("GetFileVersionInfoW failed for {}: {err}", path.display());
            return VersionLookup::Missing;
        }

        let Some(translation) = query_bytes(&block, r"\VarFileInfo\Translation") else {
            return VersionLookup::Missing;
        };
        if translation.len() < 4 {
            return VersionLookup::Missing;
        }
        let lang = u16::from_le_bytes([translation[0], translation[1]]);
        let codepage = u16::from_le_bytes([translation[2], translation[3]]);

        let field = |name: &str| {
            query_string(
                &block,
                &format!(r"\StringFileInfo\{lang:04x}{codepage:04x}\{name}"),
            )
        };

        VersionLookup::Found(VersionInfo::new(
            field("ProductName"),
            field("CompanyName"),
            field("FileDescription"),
        ))
    }
}

/// Null-terminated UTF-16 copy of `s`.
fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Raw `VerQueryValueW` call: returns the value pointer and its length unit count.
fn query_raw(block: &[u8], sub_block: &str) -> Option<(*const c_void, u32)> {
    let sub_wide = to_wide(sub_block);
    let mut value: *mut c_void = std::ptr::null_mut();
    let mut len = 0u32;
    let found = unsafe {
        VerQueryValueW(
            block.as_ptr() as *const c_void,
            PCWSTR(sub_wide.as_ptr()),
            &mut value,
            &mut len,
        )
    };
    if !found.as_bool() || value.is_null() {
        return None;
    }
    Some((value as *const c_void, len))
}

/// Binary value (the translation table). `len` is in bytes.
fn query_bytes(block: &[u8], sub_block: &str) -> Option<Vec<u8>> {
    let (ptr, len) = query_raw(block, sub_block)?;
    // SAFETY: VerQueryValueW returns a pointer into `block` valid for `len` bytes.
    let bytes = unsafe { std::slice::from_raw_parts(ptr as *const u8, len as usize) };
    Some(bytes.to_vec())
}

/// String value. `len` is in UTF-16 units and may include the terminator.
fn query_string(block: &[u8], sub_block: &str) -> Option<String> {
    let (ptr, len) = query_raw(block, sub_block)?;
    // SAFETY: string values point into `block` and span `len` UTF-16 units.
    let units = unsafe { std::slice::from_raw_parts(ptr as *const u16, len as usize) };
    let end = units.iter().position(|&c| c == 0).unwrap_or(units.len());
    Some(String::from_utf16_lossy(&units[..end]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_missing() {
        let lookup = WindowsVersionInfo.read(Path::new(r"C:\definitely\not\here.dll"));
        assert_eq!(lookup, VersionLookup::Missing);
    }

    #[test]
    fn system_dll_has_company_name() {
        let root = std::env::var_os("SystemRoot").expect("SystemRoot is set on Windows");
        let kernel32 = Path::new(&root).join("System32").join("kernel32.dll");
        let lookup = WindowsVersionInfo.read(&kernel32);
        let info = lookup.info().expect("kernel32.dll carries a version resource");
        assert!(info.company_name.is_some());
    }
}
