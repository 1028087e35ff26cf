//! Flush behavior configuration and the flush-to-disk implementation.

use crate::errors::{MmapRegionError, Result};
use crate::mmap::{MapVariant, MappedFile};

/// How [`MappedFile::flush`] synchronizes dirty pages with the backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushBehavior {
    /// Synchronously write dirty pages back and block until durable.
    #[default]
    Sync,
    /// Synchronize, then invalidate content caches the platform keys to the
    /// file's identity. Required on platforms that cache code-signature
    /// validation per file (macOS), so later opens revalidate; elsewhere it
    /// degrades to [`FlushBehavior::Sync`].
    SyncInvalidate,
}

impl MappedFile {
    /// Flush modified pages of the active mapping to the backing file,
    /// blocking until the data is durable.
    ///
    /// Read-only mappings have nothing dirty; flushing one succeeds without
    /// touching the OS. The behavior chosen at construction decides whether
    /// platform content caches are invalidated as well. Failures are
    /// surfaced as-is; nothing is retried and no state changes.
    ///
    /// # Errors
    ///
    /// Returns [`MmapRegionError::Flush`] when no mapping is active or the
    /// synchronize call reports an OS error.
    pub fn flush(&self) -> Result<()> {
        let Some(map) = &self.map else {
            return Err(MmapRegionError::Flush("no active mapping".into()));
        };
        match map {
            MapVariant::Ro(_) => Ok(()),
            MapVariant::Rw(m) => {
                if m.is_empty() {
                    // Zero-length mappings have no physical pages behind them.
                    return Ok(());
                }
                match self.flush_behavior {
                    FlushBehavior::Sync => m
                        .flush()
                        .map_err(|e| MmapRegionError::Flush(e.to_string())),
                    FlushBehavior::SyncInvalidate => sync_invalidate(map),
                }
            }
        }
    }
}

#[cfg(unix)]
fn sync_invalidate(map: &MapVariant) -> Result<()> {
    // msync wants the page-aligned physical extent, which is exactly what
    // the mapping owner recorded at map time.
    // SAFETY: pointer and length come from a live mapping held by `map`.
    let ret = unsafe {
        libc::msync(
            map.as_ptr() as *mut libc::c_void,
            map.physical_len(),
            libc::MS_SYNC | libc::MS_INVALIDATE,
        )
    };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(MmapRegionError::Flush(format!("msync failed: {err}")));
    }
    Ok(())
}

#[cfg(not(unix))]
fn sync_invalidate(map: &MapVariant) -> Result<()> {
    // No invalidate equivalent; FlushViewOfFile + FlushFileBuffers is the
    // whole story on Windows.
    match map {
        MapVariant::Rw(m) => m
            .flush()
            .map_err(|e| MmapRegionError::Flush(e.to_string())),
        MapVariant::Ro(_) => Ok(()),
    }
}
