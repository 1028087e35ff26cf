//! Path-level convenience for opening and mapping a file in one call.
//!
//! The core [`MappedFile`] API takes an already-open [`std::fs::File`];
//! these wrappers do the open with mode-appropriate options first.

use std::fs::OpenOptions;
use std::path::Path;

use crate::errors::Result;
use crate::mmap::{Access, MappedFile};
use crate::region::Region;

/// Open the file at `path` and map the given region.
///
/// [`Access::ReadOnly`] opens the file read-only; the writable modes open it
/// read-write. The file is never created or truncated here.
///
/// # Errors
///
/// Returns `MmapRegionError::Io` if the open fails, otherwise errors from
/// [`MappedFile::map_region`].
pub fn map_path_region<P: AsRef<Path>>(
    path: P,
    region: Region,
    access: Access,
) -> Result<MappedFile> {
    let file = if matches!(access, Access::ReadOnly) {
        OpenOptions::new().read(true).open(path)?
    } else {
        OpenOptions::new().read(true).write(true).open(path)?
    };
    let mut mapped = MappedFile::new();
    mapped.map_region(file, region, access)?;
    Ok(mapped)
}

/// Open the file at `path` and map it in its entirety.
///
/// # Errors
///
/// Returns errors from [`map_path_region`].
pub fn map_path<P: AsRef<Path>>(path: P, access: Access) -> Result<MappedFile> {
    map_path_region(path, Region::WholeFile, access)
}
