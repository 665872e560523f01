//! Memory-image and CPU-snapshot file I/O
//!
//! Three on-disk formats:
//! - Raw image: a flat byte stream loaded at a caller-supplied 24-bit
//!   offset.
//! - LLVM-MOS simulator image: repeating records of little-endian 16-bit
//!   base address, little-endian 16-bit length, then `length` data bytes;
//!   end of file ends the stream, zero-length records are skipped.
//! - CPU snapshot: the single-line textual record from
//!   [`Cpu::to_record`], optionally followed by one trailing newline,
//!   at most 1024 bytes.
//!
//! Loads are all-or-nothing: files are parsed and validated in a scratch
//! buffer and only then committed, so a failed load leaves memory and CPU
//! untouched. Loaded bytes go through the flag-free bulk path, making a
//! file load indistinguishable from any other CPU-invisible write.

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info};
use thiserror::Error;

use crate::cpu::{Cpu, SnapshotError};
use crate::memory::{Memory, MEMORY_SIZE};

/// Maximum size of a CPU snapshot file in bytes
pub const SNAPSHOT_MAX_LEN: u64 = 1024;

/// File load/save failures
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file does not exist
    #[error("file does not exist")]
    NotFound,
    /// Access to the file was denied
    #[error("permission denied")]
    PermissionDenied,
    /// Too many symbolic links while resolving the path
    #[error("symbolic link loop")]
    SymlinkLoop,
    /// The path is longer than the OS allows
    #[error("file name too long")]
    NameTooLong,
    /// The file exceeds what the target can hold
    #[error("file is too large")]
    TooLarge,
    /// The data would extend past the top of memory
    #[error("data would wrap past the top of memory")]
    WouldWrap,
    /// The file structure is invalid
    #[error("file is corrupt: {0}")]
    Corrupt(&'static str),
    /// The snapshot record failed to parse
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// Any other I/O failure
    #[error(transparent)]
    Io(io::Error),
}

#[cfg(unix)]
fn classify_io(err: io::Error) -> LoadError {
    use nix::errno::Errno;
    match err.raw_os_error() {
        Some(code) if code == Errno::ELOOP as i32 => return LoadError::SymlinkLoop,
        Some(code) if code == Errno::ENAMETOOLONG as i32 => return LoadError::NameTooLong,
        _ => {}
    }
    match err.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound,
        io::ErrorKind::PermissionDenied => LoadError::PermissionDenied,
        _ => LoadError::Io(err),
    }
}

#[cfg(not(unix))]
fn classify_io(err: io::Error) -> LoadError {
    match err.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound,
        io::ErrorKind::PermissionDenied => LoadError::PermissionDenied,
        _ => LoadError::Io(err),
    }
}

/// Load a raw binary image into memory at `base_addr`
///
/// Returns the number of bytes loaded. Rejects files that would extend
/// past the 24-bit address space.
pub fn load_raw_image(
    path: impl AsRef<Path>,
    mem: &mut Memory,
    base_addr: u32,
) -> Result<usize, LoadError> {
    let path = path.as_ref();
    let size = fs::metadata(path).map_err(classify_io)?.len();

    if size > MEMORY_SIZE as u64 {
        return Err(LoadError::TooLarge);
    }
    if size + base_addr as u64 > MEMORY_SIZE as u64 {
        return Err(LoadError::WouldWrap);
    }

    let data = fs::read(path).map_err(classify_io)?;
    mem.load_slice(base_addr, &data);

    info!(
        "loaded {} bytes from {} at {:06x}",
        data.len(),
        path.display(),
        base_addr
    );
    Ok(data.len())
}

/// Load an LLVM-MOS simulator-format image into memory
///
/// Returns the total number of data bytes loaded. All records are parsed
/// and validated before anything is written to memory.
pub fn load_mos_image(path: impl AsRef<Path>, mem: &mut Memory) -> Result<usize, LoadError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(classify_io)?;

    // First pass: collect (base, data range) for every record
    let mut sections: Vec<(u32, std::ops::Range<usize>)> = Vec::new();
    let mut pos = 0usize;
    while pos < data.len() {
        if pos + 4 > data.len() {
            return Err(LoadError::Corrupt("truncated section header"));
        }
        let base = u16::from_le_bytes([data[pos], data[pos + 1]]) as u32;
        let len = u16::from_le_bytes([data[pos + 2], data[pos + 3]]) as usize;
        pos += 4;

        if len == 0 {
            continue;
        }
        if base as usize + len > MEMORY_SIZE {
            return Err(LoadError::WouldWrap);
        }
        if pos + len > data.len() {
            return Err(LoadError::Corrupt("truncated section data"));
        }

        debug!("section base {:04x} length {:04x}", base, len);
        sections.push((base, pos..pos + len));
        pos += len;
    }

    // Second pass: commit
    let mut total = 0;
    for (base, range) in sections {
        total += range.len();
        mem.load_slice(base, &data[range]);
    }

    info!("loaded {} bytes from {}", total, path.display());
    Ok(total)
}

/// Save a contiguous memory range to a file
pub fn save_memory_image(
    path: impl AsRef<Path>,
    mem: &Memory,
    base_addr: u32,
    len: usize,
) -> Result<(), LoadError> {
    if base_addr as usize + len > MEMORY_SIZE {
        return Err(LoadError::WouldWrap);
    }

    let mut buf = vec![0u8; len];
    mem.save_slice(base_addr, &mut buf);
    fs::write(path, &buf).map_err(classify_io)
}

/// Load a CPU snapshot file
///
/// The CPU is only modified if the whole record parses.
pub fn load_cpu_snapshot(path: impl AsRef<Path>, cpu: &mut Cpu) -> Result<(), LoadError> {
    let path = path.as_ref();
    let size = fs::metadata(path).map_err(classify_io)?.len();
    if size > SNAPSHOT_MAX_LEN {
        return Err(LoadError::TooLarge);
    }

    let text = fs::read_to_string(path).map_err(classify_io)?;
    cpu.from_record(&text)?;
    Ok(())
}

/// Save a CPU snapshot file (the record plus a trailing newline)
pub fn save_cpu_snapshot(path: impl AsRef<Path>, cpu: &Cpu) -> Result<(), LoadError> {
    let mut record = cpu.to_record();
    record.push('\n');
    fs::write(path, record).map_err(classify_io)
}
