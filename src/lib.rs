//! # mmap-region: page-aligned file-region mapping
//!
//! This crate maps whole files or arbitrary byte ranges of a file into
//! memory, hiding the page-alignment rules the OS mapping primitive imposes
//! on start offsets and sizes.
//!
//! ## Features
//!
//! - **Arbitrary regions**: request any `(offset, size)`; the physical
//!   mapping is widened to page boundaries and the view re-anchored at the
//!   requested byte
//! - **Three access modes**: read-only, read-write, and read-write with
//!   file extension (the backing file grows to cover the region first)
//! - **Explicit durability**: synchronous flush, with opt-in invalidation
//!   of platform content caches
//! - **Cross-platform**: Linux, macOS, Windows via memmap2
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::fs::File;
//! use mmap_region::{Access, MappedFile, Region};
//!
//! let file = File::options().read(true).write(true).open("data.bin")?;
//! let mut mapped = MappedFile::new();
//!
//! // Map 50 bytes starting at offset 100; neither needs to be page-aligned.
//! mapped.map_region(file, Region::Range { offset: 100, size: 50 }, Access::ReadWrite)?;
//!
//! mapped.as_mut_slice()?[..5].copy_from_slice(b"hello");
//! mapped.flush()?;
//! mapped.close();
//! # Ok::<(), mmap_region::MmapRegionError>(())
//! ```
//!
//! ## Modules
//!
//! - [`errors`]: Error types for all mapping operations
//! - [`region`]: Region descriptors and the page-alignment calculator
//! - [`utils`]: Page size query and alignment helpers
//! - [`mmap`]: Core [`MappedFile`] implementation
//! - [`flush`]: Flush behavior configuration
//! - [`manager`]: Path-level convenience functions

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(missing_docs)]
#![doc(html_root_url = "https://docs.rs/mmap-region")]

pub mod errors;
pub mod utils;
pub mod region;
mod extend;
pub mod mmap;
pub mod flush;
pub mod manager;

pub use errors::MmapRegionError;
pub use flush::FlushBehavior;
pub use manager::{map_path, map_path_region};
pub use mmap::{Access, MappedFile};
pub use region::{aligned_range, AlignedRange, Region};
