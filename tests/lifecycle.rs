//! Lifecycle tests: state transitions, idempotent close, failure paths.

use mmap_region::{map_path, Access, MappedFile, MmapRegionError, Region};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

fn tmp_path(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("mmap_region_lifecycle_{}_{}", name, std::process::id()));
    p
}

fn create_file(path: &Path, len: u64) -> File {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .read(true)
        .write(true)
        .open(path)
        .expect("create backing file");
    file.set_len(len).expect("set_len");
    file
}

#[test]
fn close_is_idempotent() {
    let path = tmp_path("close_idempotent");
    create_file(&path, 4096);

    let mut mapped = map_path(&path, Access::ReadOnly).expect("map ro");
    assert!(mapped.is_mapped());
    assert!(mapped.file().is_some());

    mapped.close();
    assert!(!mapped.is_mapped());
    assert_eq!(mapped.len(), 0);
    assert_eq!(mapped.access(), None);
    assert!(mapped.data().is_none());
    assert!(mapped.file().is_none());

    // Second close is a no-op, not an error.
    mapped.close();
    assert!(!mapped.is_mapped());

    fs::remove_file(&path).expect("cleanup");
}

#[test]
fn remap_after_close() {
    let path = tmp_path("remap_after_close");
    create_file(&path, 4096);

    let mut mapped = MappedFile::new();
    mapped
        .map_region(
            File::open(&path).expect("open"),
            Region::WholeFile,
            Access::ReadOnly,
        )
        .expect("first map");
    mapped.close();

    mapped
        .map_region(
            File::open(&path).expect("reopen"),
            Region::Range { offset: 8, size: 16 },
            Access::ReadOnly,
        )
        .expect("second map");
    assert_eq!(mapped.len(), 16);

    drop(mapped);
    fs::remove_file(&path).expect("cleanup");
}

#[test]
fn map_on_mapped_entity_fails_cleanly() {
    let path = tmp_path("map_while_mapped");
    create_file(&path, 4096);

    let mut mapped = map_path(&path, Access::ReadOnly).expect("map ro");
    let err = mapped
        .map_region(
            File::open(&path).expect("open second handle"),
            Region::WholeFile,
            Access::ReadOnly,
        )
        .expect_err("must refuse while mapped");
    assert!(matches!(err, MmapRegionError::Mapping(_)));

    // The original mapping is untouched and still readable.
    assert!(mapped.is_mapped());
    assert_eq!(mapped.len(), 4096);
    assert_eq!(mapped.as_slice().expect("slice").len(), 4096);

    // Close, then mapping again works.
    mapped.close();
    mapped
        .map_region(
            File::open(&path).expect("reopen"),
            Region::WholeFile,
            Access::ReadOnly,
        )
        .expect("map after close");

    drop(mapped);
    fs::remove_file(&path).expect("cleanup");
}

#[test]
fn alignment_failure_leaves_unmapped() {
    let path = tmp_path("alignment_failure");
    create_file(&path, 4096);

    let mut mapped = MappedFile::new();
    let err = mapped
        .map_region(
            File::open(&path).expect("open"),
            Region::Range { offset: u64::MAX - 1, size: 10 },
            Access::ReadOnly,
        )
        .expect_err("overflowing region must fail");
    assert!(matches!(err, MmapRegionError::Alignment { .. }));
    assert!(!mapped.is_mapped());

    // The entity is reusable after the failure.
    mapped
        .map_region(
            File::open(&path).expect("reopen"),
            Region::WholeFile,
            Access::ReadOnly,
        )
        .expect("map after failure");

    drop(mapped);
    fs::remove_file(&path).expect("cleanup");
}

#[test]
fn mapping_failure_leaves_unmapped() {
    let path = tmp_path("mapping_failure");
    create_file(&path, 4096);

    // A writable mapping over a read-only handle is rejected by the OS.
    let mut mapped = MappedFile::new();
    let err = mapped
        .map_region(
            File::open(&path).expect("open read-only"),
            Region::WholeFile,
            Access::ReadWrite,
        )
        .expect_err("mapping must fail");
    assert!(matches!(err, MmapRegionError::Mapping(_)));
    assert!(!mapped.is_mapped());
    assert_eq!(mapped.len(), 0);

    fs::remove_file(&path).expect("cleanup");
}

#[test]
fn extension_failure_aborts_mapping() {
    let path = tmp_path("extension_failure");
    create_file(&path, 100);

    // Growth needs a writable handle; a read-only one makes the extension
    // step fail before any mapping is attempted.
    let mut mapped = MappedFile::new();
    let err = mapped
        .map_region(
            File::open(&path).expect("open read-only"),
            Region::Range { offset: 0, size: 4096 },
            Access::ReadWriteExtend,
        )
        .expect_err("extension must fail");
    assert!(matches!(err, MmapRegionError::Extension(_)));
    assert!(!mapped.is_mapped());

    // The backing file kept its previous length.
    assert_eq!(fs::metadata(&path).expect("metadata").len(), 100);

    fs::remove_file(&path).expect("cleanup");
}

#[test]
fn drop_releases_mapping() {
    let path = tmp_path("drop_releases");
    create_file(&path, 4096);

    {
        let _mapped = map_path(&path, Access::ReadWrite).expect("map rw");
    }

    // After drop the file is unreferenced by this process and can be
    // remapped or removed.
    let mapped = map_path(&path, Access::ReadOnly).expect("map after drop");
    drop(mapped);

    fs::remove_file(&path).expect("cleanup");
}
