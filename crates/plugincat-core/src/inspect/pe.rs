/// Target-architecture detection from a Windows PE header.
///
/// Only the two signatures and the COFF machine field are read:
///
/// ```text
/// offset 0      "MZ"                   legacy DOS header
/// offset 60     u32 LE  e_lfanew       offset of the PE header
/// e_lfanew      "PE\0\0"               PE signature
/// e_lfanew + 4  u16 LE  Machine        target processor
/// ```
///
/// Nothing here ever fails: I/O problems and malformed headers are reported
/// as explicit [`PeProbe`] variants and map to [`Bitness::Unknown`].
use crate::model::Bitness;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Bytes of the DOS header read up front.
pub const DOS_HEADER_LEN: usize = 64;

/// Offset of the little-endian `e_lfanew` field within the DOS header.
const E_LFANEW_OFFSET: usize = 60;

/// `IMAGE_FILE_MACHINE_AMD64`.
pub const MACHINE_AMD64: u16 = 0x8664;
/// `IMAGE_FILE_MACHINE_I386`.
pub const MACHINE_I386: u16 = 0x014c;

/// Outcome of probing a file's executable header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeProbe {
    /// Both signatures present; carries the raw COFF machine code.
    Machine(u16),
    /// Missing `MZ` or `PE\0\0` signature, or the header is truncated.
    NotExecutable,
    /// The file could not be opened or read.
    Unreadable(io::ErrorKind),
}

impl From<PeProbe> for Bitness {
    fn from(probe: PeProbe) -> Self {
        match probe {
            PeProbe::Machine(MACHINE_AMD64) => Bitness::Bit64,
            PeProbe::Machine(MACHINE_I386) => Bitness::Bit32,
            _ => Bitness::Unknown,
        }
    }
}

/// Probe the PE header of the file at `path`.
pub fn probe_pe(path: &Path) -> PeProbe {
    match File::open(path) {
        Ok(mut file) => probe_pe_reader(&mut file),
        Err(err) => PeProbe::Unreadable(err.kind()),
    }
}

/// Probe the PE header from any seekable reader positioned at the file start.
pub fn probe_pe_reader<R: Read + Seek>(reader: &mut R) -> PeProbe {
    match read_machine(reader) {
        Ok(Some(machine)) => PeProbe::Machine(machine),
        Ok(None) => PeProbe::NotExecutable,
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => PeProbe::NotExecutable,
        Err(err) => PeProbe::Unreadable(err.kind()),
    }
}

/// Read the machine field. `Ok(None)` means a signature did not match.
fn read_machine<R: Read + Seek>(reader: &mut R) -> io::Result<Option<u16>> {
    let mut dos = [0u8; DOS_HEADER_LEN];
    reader.read_exact(&mut dos)?;
    if &dos[..2] != b"MZ" {
        return Ok(None);
    }

    let e_lfanew = u32::from_le_bytes([
        dos[E_LFANEW_OFFSET],
        dos[E_LFANEW_OFFSET + 1],
        dos[E_LFANEW_OFFSET + 2],
        dos[E_LFANEW_OFFSET + 3],
    ]);
    reader.seek(SeekFrom::Start(u64::from(e_lfanew)))?;

    let mut pe = [0u8; 6];
    reader.read_exact(&mut pe)?;
    if &pe[..4] != b"PE\0\0" {
        return Ok(None);
    }

    Ok(Some(u16::from_le_bytes([pe[4], pe[5]])))
}

/// Detect the bitness of a DLL. Any failure yields [`Bitness::Unknown`].
pub fn detect_bitness(path: &Path) -> Bitness {
    Bitness::from(probe_pe(path))
}
