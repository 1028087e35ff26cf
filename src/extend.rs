//! File growth for extendable mappings.

use std::fs::File;

use crate::errors::{MmapRegionError, Result};

/// Ensure `file` is at least `offset + size` bytes long, growing it if needed.
///
/// Never truncates: a file already covering the range is left untouched.
/// Mapping a range the backing file does not cover is undefined at access
/// time (SIGBUS on first fault), so this must complete before the mapping
/// call is issued.
///
/// # Errors
///
/// Returns `MmapRegionError::Extension` if the length query or the growth
/// fails; the file keeps its previous length.
pub(crate) fn allocate_region(file: &File, offset: u64, size: u64) -> Result<()> {
    let end = offset.checked_add(size).ok_or_else(|| {
        MmapRegionError::Extension(format!(
            "region end overflows: offset={offset}, size={size}"
        ))
    })?;
    let current = file
        .metadata()
        .map_err(|e| MmapRegionError::Extension(format!("length query failed: {e}")))?
        .len();
    if current >= end {
        return Ok(());
    }
    file.set_len(end)
        .map_err(|e| MmapRegionError::Extension(format!("grow to {end} bytes failed: {e}")))
}
