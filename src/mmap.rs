//! Core mapped-file entity: mapping, accessors, and teardown.

use std::fs::File;
use std::ptr::NonNull;

use memmap2::{Mmap, MmapMut, MmapOptions};

use crate::errors::{MmapRegionError, Result};
use crate::extend::allocate_region;
use crate::flush::FlushBehavior;
use crate::region::{aligned_range, AlignedRange, Region};

/// Access mode for a mapping, fixed from `map_region` until `close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Read-only mapping.
    ReadOnly,
    /// Read-write mapping of existing file contents.
    ReadWrite,
    /// Read-write mapping that grows the backing file to cover the
    /// requested region before mapping it.
    ReadWriteExtend,
}

impl Access {
    fn writable(self) -> bool {
        !matches!(self, Access::ReadOnly)
    }
}

pub(crate) enum MapVariant {
    Ro(Mmap),
    Rw(MmapMut),
}

impl MapVariant {
    pub(crate) fn as_ptr(&self) -> *const u8 {
        match self {
            MapVariant::Ro(m) => m.as_ptr(),
            MapVariant::Rw(m) => m.as_ptr(),
        }
    }

    /// Size of the page-aligned extent the OS actually mapped.
    pub(crate) fn physical_len(&self) -> usize {
        match self {
            MapVariant::Ro(m) => m.len(),
            MapVariant::Rw(m) => m.len(),
        }
    }
}

/// Memory-mapped view of a file region.
///
/// A `MappedFile` starts out unmapped. [`map_region`](Self::map_region)
/// takes ownership of an already-open [`File`], maps the requested region,
/// and transitions the entity to the mapped state; [`close`](Self::close)
/// (or drop) releases the mapping and the file handle and returns it to the
/// unmapped state. A failed `map_region` leaves the entity unmapped with
/// nothing acquired.
///
/// The requested region may be arbitrarily aligned: the physical mapping is
/// widened to page boundaries and all accessors are re-anchored at the
/// requested byte, so callers never see the alignment padding.
///
/// # Examples
///
/// ```no_run
/// use std::fs::File;
/// use mmap_region::{Access, MappedFile, Region};
///
/// let file = File::open("data.bin")?;
/// let mut mapped = MappedFile::new();
/// mapped.map_region(file, Region::WholeFile, Access::ReadOnly)?;
///
/// let bytes = mapped.as_slice()?;
/// println!("{} bytes mapped", bytes.len());
/// # Ok::<(), mmap_region::MmapRegionError>(())
/// ```
///
/// # Concurrency
///
/// The entity performs no internal locking: mapping and teardown take
/// `&mut self`, so concurrent `map_region`/`close` calls require external
/// synchronization. Concurrent reads of the mapped bytes while no writer is
/// active are safe. Mapping, extension, and flush may block on disk I/O;
/// latency-sensitive callers should offload them.
pub struct MappedFile {
    pub(crate) file: Option<File>,
    pub(crate) map: Option<MapVariant>,
    pub(crate) displacement: usize,
    pub(crate) len: usize,
    pub(crate) access: Option<Access>,
    pub(crate) flush_behavior: FlushBehavior,
}

impl std::fmt::Debug for MappedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedFile")
            .field("mapped", &self.is_mapped())
            .field("len", &self.len)
            .field("access", &self.access)
            .field("flush_behavior", &self.flush_behavior)
            .finish()
    }
}

impl Default for MappedFile {
    fn default() -> Self {
        Self::new()
    }
}

impl MappedFile {
    /// Create an unmapped entity with the default flush behavior.
    #[must_use]
    pub fn new() -> Self {
        Self::with_flush_behavior(FlushBehavior::default())
    }

    /// Create an unmapped entity that flushes with the given behavior.
    ///
    /// Use [`FlushBehavior::SyncInvalidate`] on platforms that cache
    /// content-validation state keyed to the file's identity.
    #[must_use]
    pub fn with_flush_behavior(flush_behavior: FlushBehavior) -> Self {
        Self {
            file: None,
            map: None,
            displacement: 0,
            len: 0,
            access: None,
            flush_behavior,
        }
    }

    /// Map `region` of `file` with the given access mode.
    ///
    /// Takes ownership of the file handle; it is closed when the entity is
    /// closed or dropped. For [`Access::ReadWriteExtend`] with an explicit
    /// range, the file is first grown so the whole range is backed by real
    /// file length (never truncated); with [`Region::WholeFile`] the extend
    /// mode performs no growth and behaves like [`Access::ReadWrite`].
    ///
    /// # Errors
    ///
    /// - [`MmapRegionError::Mapping`] if a region is already mapped (close
    ///   it first; there is no implicit remap) or the OS mapping call fails.
    /// - [`MmapRegionError::Alignment`] if the region's bounds overflow the
    ///   platform's offset types. Raised before any system call.
    /// - [`MmapRegionError::Extension`] if pre-mapping file growth fails.
    ///
    /// On any error the entity stays unmapped and the file handle is
    /// released.
    pub fn map_region(&mut self, file: File, region: Region, access: Access) -> Result<()> {
        if self.map.is_some() {
            return Err(MmapRegionError::Mapping(
                "a region is already mapped; close() it first".into(),
            ));
        }

        let (aligned, len) = match region {
            Region::WholeFile => {
                let file_len = file
                    .metadata()
                    .map_err(|e| MmapRegionError::Mapping(format!("length query failed: {e}")))?
                    .len();
                let size = usize::try_from(file_len).map_err(|_| MmapRegionError::Alignment {
                    offset: 0,
                    size: file_len,
                })?;
                let aligned = AlignedRange {
                    start: 0,
                    size,
                    displacement: 0,
                };
                (aligned, size)
            }
            Region::Range { offset, size } => {
                let aligned = aligned_range(offset, size)?;
                if access == Access::ReadWriteExtend {
                    allocate_region(&file, offset, size)?;
                }
                // size <= aligned.size, which was checked to fit usize.
                #[allow(clippy::cast_possible_truncation)]
                let len = size as usize;
                (aligned, len)
            }
        };

        let map = self.map_aligned(&file, aligned, access)?;

        log::debug!(
            "mapped {len} bytes ({} physical at file offset {})",
            map.physical_len(),
            aligned.start
        );
        self.file = Some(file);
        self.map = Some(map);
        self.displacement = aligned.displacement;
        self.len = len;
        self.access = Some(access);
        Ok(())
    }

    fn map_aligned(&self, file: &File, aligned: AlignedRange, access: Access) -> Result<MapVariant> {
        let mut options = MmapOptions::new();
        options.offset(aligned.start).len(aligned.size);
        // SAFETY: the mapping is shared and backed by `file`, which this
        // entity owns for the whole lifetime of the mapping. memmap2 checks
        // the primitive's failure sentinel (MAP_FAILED, not null) before
        // returning an address, and releases the full aligned extent on drop.
        let map = if access.writable() {
            unsafe { options.map_mut(file) }.map(MapVariant::Rw)
        } else {
            unsafe { options.map(file) }.map(MapVariant::Ro)
        };
        map.map_err(|e| MmapRegionError::Mapping(e.to_string()))
    }

    /// Pointer to the first byte of the requested region, or `None` when
    /// unmapped.
    ///
    /// The pointer already accounts for alignment displacement: it addresses
    /// the requested offset, not the page boundary below it.
    #[must_use]
    pub fn data(&self) -> Option<NonNull<u8>> {
        self.map.as_ref().and_then(|m| {
            // SAFETY: displacement stays within the physical extent computed
            // at map time.
            let ptr = unsafe { m.as_ptr().add(self.displacement) };
            NonNull::new(ptr.cast_mut())
        })
    }

    /// The mapped region as a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`MmapRegionError::Mapping`] when no mapping is active.
    pub fn as_slice(&self) -> Result<&[u8]> {
        let Some(map) = &self.map else {
            return Err(MmapRegionError::Mapping("no active mapping".into()));
        };
        let range = self.displacement..self.displacement + self.len;
        Ok(match map {
            MapVariant::Ro(m) => &m[range],
            MapVariant::Rw(m) => &m[range],
        })
    }

    /// The mapped region as a mutable byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`MmapRegionError::Mapping`] when no mapping is active or the
    /// mapping is read-only.
    pub fn as_mut_slice(&mut self) -> Result<&mut [u8]> {
        let range = self.displacement..self.displacement + self.len;
        match &mut self.map {
            None => Err(MmapRegionError::Mapping("no active mapping".into())),
            Some(MapVariant::Ro(_)) => Err(MmapRegionError::Mapping(
                "mutable access on a read-only mapping".into(),
            )),
            Some(MapVariant::Rw(m)) => Ok(&mut m[range]),
        }
    }

    /// Logical length of the mapping in bytes: the requested region size, or
    /// the file length at map time for whole-file mappings. Zero when
    /// unmapped.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len as u64
    }

    /// Whether the mapping is empty (or absent).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether a region is currently mapped.
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.map.is_some()
    }

    /// Access mode of the active mapping, or `None` when unmapped.
    #[must_use]
    pub fn access(&self) -> Option<Access> {
        self.access
    }

    /// The owned backing file handle, or `None` when unmapped.
    ///
    /// Useful for length queries or platform-handle access; the handle is
    /// closed by [`close`](Self::close).
    #[must_use]
    pub fn file(&self) -> Option<&File> {
        self.file.as_ref()
    }

    /// Release the mapping and the owned file handle.
    ///
    /// Idempotent: calling this on an unmapped entity is a no-op. The
    /// mapping owner releases the full page-aligned physical extent recorded
    /// at map time, not just the logical length; the file handle is closed
    /// afterwards and the length reset to zero.
    pub fn close(&mut self) {
        if let Some(map) = self.map.take() {
            log::debug!("unmapping {} physical bytes", map.physical_len());
            drop(map);
        }
        self.file = None;
        self.displacement = 0;
        self.len = 0;
        self.access = None;
    }
}

impl Drop for MappedFile {
    fn drop(&mut self) {
        self.close();
    }
}
