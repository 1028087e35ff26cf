//! Crate-specific error types for mmap-region.

use std::io;
use thiserror::Error;

/// Result alias for mmap-region operations.
pub type Result<T> = std::result::Result<T, MmapRegionError>;

/// Error type covering region arithmetic, file growth, mapping, and flush failures.
#[derive(Debug, Error)]
pub enum MmapRegionError {
    /// Wrapper for `std::io::Error` raised while opening or inspecting files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error when a region's bounds cannot be aligned for the mapping primitive.
    #[error("region bounds not mappable: offset={offset}, size={size}")]
    Alignment {
        /// Requested start offset.
        offset: u64,
        /// Requested size in bytes.
        size: u64,
    },

    /// Error when growing the backing file fails.
    #[error("file extension failed: {0}")]
    Extension(String),

    /// Error when the OS mapping call fails or the entity is in the wrong
    /// mapping state for the operation.
    #[error("mapping failed: {0}")]
    Mapping(String),

    /// Error when a flush operation fails or no mapping is active.
    #[error("flush failed: {0}")]
    Flush(String),
}
