//! Tests for UserFs
//!
//! These tests verify:
//! - open semantics for every flag
//! - write/read through descriptors, permissions and the size cap
//! - close, delete and handle reuse
//! - last_error bookkeeping
//! - seek/tell, resize and destroy

use userfs::{
    Config, ErrorCode, Fd, OpenFlags, OpenMode, UfsError, UserFs, BLOCK_SIZE, MAX_FILE_SIZE,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 256) as u8).collect()
}

fn read_all(fs: &mut UserFs, fd: Fd) -> Vec<u8> {
    let mut out = Vec::new();
    let mut chunk = [0u8; 333];
    loop {
        let n = fs.read(fd, &mut chunk).unwrap();
        if n == 0 {
            return out;
        }
        out.extend_from_slice(&chunk[..n]);
    }
}

fn assert_size_matches_blocks(fs: &UserFs, name: &str) {
    let occupied: usize = fs.block_occupancy(name).unwrap().iter().sum();
    assert_eq!(fs.file_size(name).unwrap(), occupied);
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_missing_file_fails() {
    let mut fs = UserFs::new();

    for flags in [OpenFlags::Default, OpenFlags::ReadOnly, OpenFlags::WriteOnly, OpenFlags::ReadWrite] {
        assert!(matches!(fs.open("missing", flags), Err(UfsError::NoFile)));
    }
    assert_eq!(fs.last_error(), ErrorCode::NoFile);
    assert_eq!(fs.file_count(), 0);
}

#[test]
fn test_open_create_makes_empty_file() {
    let mut fs = UserFs::new();

    let fd = fs.open("a", OpenFlags::Create).unwrap();

    assert_eq!(fd.index(), 0);
    assert_eq!(fs.file_names(), vec!["a"]);
    assert_eq!(fs.file_size("a").unwrap(), 0);
    assert_eq!(fs.block_occupancy("a").unwrap(), vec![0]);

    let stat = fs.stat(fd).unwrap();
    assert_eq!(stat.mode, OpenMode::ReadWrite);
    assert_eq!(stat.refs, 1);
    assert!(stat.linked);
}

#[test]
fn test_open_create_existing_does_not_truncate() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();
    fs.write(fd, b"keep me").unwrap();

    let second = fs.open("a", OpenFlags::Create).unwrap();

    assert_ne!(fd.index(), second.index());
    assert_eq!(fs.file_count(), 1);
    assert_eq!(fs.file_size("a").unwrap(), 7);
    assert_eq!(read_all(&mut fs, second), b"keep me");
}

#[test]
fn test_open_modes() {
    let mut fs = UserFs::new();
    fs.open("a", OpenFlags::Create).unwrap();

    let cases = [
        (OpenFlags::Default, OpenMode::ReadWrite),
        (OpenFlags::ReadOnly, OpenMode::ReadOnly),
        (OpenFlags::WriteOnly, OpenMode::WriteOnly),
        (OpenFlags::ReadWrite, OpenMode::ReadWrite),
    ];
    for (flags, mode) in cases {
        let fd = fs.open("a", flags).unwrap();
        assert_eq!(fs.stat(fd).unwrap().mode, mode);
    }
    assert_eq!(fs.stat(fs.fd_from_index(0)).unwrap().refs, 5);
}

#[test]
fn test_open_flag_bits() {
    for flags in [
        OpenFlags::Default,
        OpenFlags::Create,
        OpenFlags::ReadOnly,
        OpenFlags::WriteOnly,
        OpenFlags::ReadWrite,
    ] {
        assert_eq!(OpenFlags::from_bits(flags.bits()), Some(flags));
    }
    assert_eq!(OpenFlags::from_bits(3), None);
    assert_eq!(OpenFlags::from_bits(16), None);
}

// =============================================================================
// Write / Read Tests
// =============================================================================

#[test]
fn test_write_returns_length_and_advances() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();

    assert_eq!(fs.write(fd, b"hello").unwrap(), 5);
    assert_eq!(fs.tell(fd).unwrap(), 5);
    assert_eq!(fs.write(fd, b" world").unwrap(), 6);
    assert_eq!(fs.file_size("a").unwrap(), 11);
}

#[test]
fn test_read_after_write_on_other_descriptor() {
    let mut fs = UserFs::new();
    let writer = fs.open("a", OpenFlags::Create).unwrap();
    let reader = fs.open("a", OpenFlags::ReadOnly).unwrap();

    fs.write(writer, b"hello").unwrap();

    let mut buf = [0u8; 5];
    assert_eq!(fs.read(reader, &mut buf).unwrap(), 5);
    assert_eq!(&buf, b"hello");
}

#[test]
fn test_read_more_than_available() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();
    fs.write(fd, b"abc").unwrap();
    fs.seek(fd, 0).unwrap();

    let data = fs.read_bytes(fd, 100).unwrap();

    assert_eq!(&data[..], b"abc");
    assert_eq!(fs.read_bytes(fd, 100).unwrap().len(), 0);
}

#[test]
fn test_read_bytes_with_huge_max_len() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();
    let data = pattern(2 * BLOCK_SIZE + 9);
    fs.write(fd, &data).unwrap();
    fs.seek(fd, 0).unwrap();

    assert_eq!(&fs.read_bytes(fd, usize::MAX).unwrap()[..], &data[..]);
    assert_eq!(fs.read_bytes(fd, 1 << 40).unwrap().len(), 0);
    assert_eq!(fs.tell(fd).unwrap(), data.len());
}

#[test]
fn test_read_bytes_checks_handle_and_mode_first() {
    let mut fs = UserFs::new();
    fs.open("a", OpenFlags::Create).unwrap();
    let writer = fs.open("a", OpenFlags::WriteOnly).unwrap();

    assert!(matches!(fs.read_bytes(Fd::new(7, 0), usize::MAX), Err(UfsError::NoFile)));
    assert_eq!(fs.last_error(), ErrorCode::NoFile);

    assert!(matches!(fs.read_bytes(writer, usize::MAX), Err(UfsError::NoPermission)));
    assert_eq!(fs.last_error(), ErrorCode::NoPermission);
}

#[test]
fn test_read_empty_file() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();

    let mut buf = [0u8; 10];
    assert_eq!(fs.read(fd, &mut buf).unwrap(), 0);
    assert_eq!(fs.last_error(), ErrorCode::NoErr);
}

#[test]
fn test_write_empty_buffer() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();

    assert_eq!(fs.write(fd, b"").unwrap(), 0);
    assert_eq!(fs.file_size("a").unwrap(), 0);
}

#[test]
fn test_block_boundary_write_and_read() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();
    let data = pattern(BLOCK_SIZE + 1);

    fs.write(fd, &data[..BLOCK_SIZE]).unwrap();
    assert_eq!(fs.block_occupancy("a").unwrap(), vec![BLOCK_SIZE]);

    fs.write(fd, &data[BLOCK_SIZE..]).unwrap();
    assert_eq!(fs.block_occupancy("a").unwrap(), vec![BLOCK_SIZE, 1]);

    let reader = fs.open("a", OpenFlags::ReadOnly).unwrap();
    assert_eq!(read_all(&mut fs, reader), data);
}

#[test]
fn test_large_write_spans_many_blocks() {
    let mut fs = UserFs::new();
    let fd = fs.open("big", OpenFlags::Create).unwrap();
    let data = pattern(10 * BLOCK_SIZE + 123);

    assert_eq!(fs.write(fd, &data).unwrap(), data.len());

    assert_eq!(fs.stat(fd).unwrap().blocks, 11);
    assert_size_matches_blocks(&fs, "big");

    fs.seek(fd, 0).unwrap();
    assert_eq!(read_all(&mut fs, fd), data);
}

#[test]
fn test_size_consistent_across_mixed_writes() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();

    for len in [10, 502, 1, 511, 513, 0, 1024, 7] {
        fs.write(fd, &pattern(len)).unwrap();
        assert_size_matches_blocks(&fs, "a");
    }

    // Overwrite a window in the middle
    fs.seek(fd, 600).unwrap();
    fs.write(fd, &[0xFF; 900]).unwrap();
    assert_size_matches_blocks(&fs, "a");
    assert_eq!(fs.file_size("a").unwrap(), 10 + 502 + 1 + 511 + 513 + 1024 + 7);
}

#[test]
fn test_interleaved_writers_share_content() {
    let mut fs = UserFs::new();
    let a = fs.open("f", OpenFlags::Create).unwrap();
    let b = fs.open("f", OpenFlags::Create).unwrap();

    fs.write(a, b"aaaaaaaa").unwrap();
    fs.write(b, b"BBB").unwrap();

    let reader = fs.open("f", OpenFlags::ReadOnly).unwrap();
    assert_eq!(read_all(&mut fs, reader), b"BBBaaaaa");
    assert_eq!(fs.file_size("f").unwrap(), 8);
}

// =============================================================================
// Permission Tests
// =============================================================================

#[test]
fn test_write_on_read_only_fails() {
    let mut fs = UserFs::new();
    fs.open("a", OpenFlags::Create).unwrap();
    let fd = fs.open("a", OpenFlags::ReadOnly).unwrap();

    assert!(matches!(fs.write(fd, b"x"), Err(UfsError::NoPermission)));
    assert_eq!(fs.last_error(), ErrorCode::NoPermission);
    assert_eq!(fs.file_size("a").unwrap(), 0);
}

#[test]
fn test_read_on_write_only_fails() {
    let mut fs = UserFs::new();
    fs.open("a", OpenFlags::Create).unwrap();
    let fd = fs.open("a", OpenFlags::WriteOnly).unwrap();
    fs.write(fd, b"secret").unwrap();

    let mut buf = [0u8; 6];
    assert!(matches!(fs.read(fd, &mut buf), Err(UfsError::NoPermission)));
    assert_eq!(fs.last_error(), ErrorCode::NoPermission);
}

#[test]
fn test_invalid_handle_beats_permission_check() {
    let mut fs = UserFs::new();

    assert!(matches!(fs.write(Fd::new(3, 0), b"x"), Err(UfsError::NoFile)));
    let mut buf = [0u8; 1];
    assert!(matches!(fs.read(Fd::new(3, 0), &mut buf), Err(UfsError::NoFile)));
}

// =============================================================================
// Size Limit Tests
// =============================================================================

#[test]
fn test_write_over_max_file_size_fails_without_mutation() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();
    fs.write(fd, b"prefix").unwrap();

    let huge = vec![0u8; MAX_FILE_SIZE];
    let result = fs.write(fd, &huge);

    assert!(matches!(result, Err(UfsError::NoMem { .. })));
    assert_eq!(fs.last_error(), ErrorCode::NoMem);
    assert_eq!(fs.file_size("a").unwrap(), 6);
    assert_eq!(fs.tell(fd).unwrap(), 6);
    assert_eq!(fs.block_occupancy("a").unwrap(), vec![6]);
}

#[test]
fn test_configured_limit_is_enforced() {
    let config = Config::builder().max_file_size(2 * BLOCK_SIZE).build();
    let mut fs = UserFs::with_config(config);
    let fd = fs.open("a", OpenFlags::Create).unwrap();

    assert_eq!(fs.write(fd, &pattern(2 * BLOCK_SIZE)).unwrap(), 2 * BLOCK_SIZE);
    assert!(matches!(fs.write(fd, b"!"), Err(UfsError::NoMem { .. })));
    assert_eq!(fs.file_size("a").unwrap(), 2 * BLOCK_SIZE);
    assert_eq!(fs.stat(fd).unwrap().blocks, 2);
}

#[test]
fn test_limit_uses_cursor_not_size() {
    let config = Config::builder().max_file_size(100).build();
    let mut fs = UserFs::with_config(config);
    let fd = fs.open("a", OpenFlags::Create).unwrap();
    fs.write(fd, &pattern(100)).unwrap();

    // Overwriting inside the file stays under the cap
    fs.seek(fd, 50).unwrap();
    assert_eq!(fs.write(fd, &pattern(50)).unwrap(), 50);
    assert!(fs.write(fd, b"x").is_err());
}

// =============================================================================
// Close Tests
// =============================================================================

#[test]
fn test_close_releases_reference() {
    let mut fs = UserFs::new();
    let a = fs.open("a", OpenFlags::Create).unwrap();
    let b = fs.open("a", OpenFlags::Default).unwrap();

    fs.close(a).unwrap();

    assert_eq!(fs.stat(b).unwrap().refs, 1);
    assert_eq!(fs.open_descriptor_count(), 1);
}

#[test]
fn test_close_twice_fails() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();
    fs.close(fd).unwrap();

    assert!(matches!(fs.close(fd), Err(UfsError::NoFile)));
    assert_eq!(fs.last_error(), ErrorCode::NoFile);
}

#[test]
fn test_close_never_opened_fails() {
    let mut fs = UserFs::new();

    assert!(matches!(fs.close(Fd::new(0, 0)), Err(UfsError::NoFile)));
    assert!(matches!(fs.close(fs.fd_from_index(100)), Err(UfsError::NoFile)));
}

#[test]
fn test_reused_handle_does_not_resurrect_state() {
    let mut fs = UserFs::new();
    fs.open("other", OpenFlags::Create).unwrap();
    let old = fs.open("a", OpenFlags::Create).unwrap();
    fs.write(old, b"hello").unwrap();
    fs.close(old).unwrap();

    let new = fs.open("a", OpenFlags::ReadOnly).unwrap();

    assert_eq!(new.index(), old.index());
    let stat = fs.stat(new).unwrap();
    assert_eq!(stat.position, 0);
    assert_eq!(stat.mode, OpenMode::ReadOnly);

    // The old handle stays dead
    assert!(matches!(fs.write(old, b"x"), Err(UfsError::NoFile)));
    assert!(matches!(fs.close(old), Err(UfsError::NoFile)));
}

#[test]
fn test_handle_values_stay_small_under_churn() {
    let mut fs = UserFs::new();
    fs.open("a", OpenFlags::Create).unwrap();

    for _ in 0..100 {
        let fd = fs.open("a", OpenFlags::Default).unwrap();
        assert_eq!(fd.index(), 1);
        fs.close(fd).unwrap();
    }
    assert_eq!(fs.descriptor_capacity(), 2);
}

#[test]
fn test_descriptor_capacity_doubles() {
    let config = Config::builder().initial_descriptor_capacity(1).build();
    let mut fs = UserFs::with_config(config);
    fs.open("a", OpenFlags::Create).unwrap();
    assert_eq!(fs.descriptor_capacity(), 1);

    for expected in [2, 4, 4, 8] {
        fs.open("a", OpenFlags::Default).unwrap();
        assert_eq!(fs.descriptor_capacity(), expected);
    }
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_removes_name() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();
    fs.close(fd).unwrap();

    fs.delete("a").unwrap();

    assert!(matches!(fs.open("a", OpenFlags::ReadOnly), Err(UfsError::NoFile)));
    assert_eq!(fs.file_count(), 0);
    assert_eq!(fs.live_file_count(), 0);
}

#[test]
fn test_delete_missing_fails() {
    let mut fs = UserFs::new();

    assert!(matches!(fs.delete("ghost"), Err(UfsError::NoFile)));
    assert_eq!(fs.last_error(), ErrorCode::NoFile);
}

#[test]
fn test_delete_twice_fails() {
    let mut fs = UserFs::new();
    fs.open("a", OpenFlags::Create).unwrap();
    fs.delete("a").unwrap();

    assert!(matches!(fs.delete("a"), Err(UfsError::NoFile)));
}

#[test]
fn test_open_descriptors_survive_delete() {
    let mut fs = UserFs::new();
    let fd1 = fs.open("file", OpenFlags::Create).unwrap();
    let fd2 = fs.open("file", OpenFlags::Default).unwrap();
    let fd3 = fs.open("file", OpenFlags::Default).unwrap();

    fs.delete("file").unwrap();

    assert_eq!(fs.write(fd1, b"123").unwrap(), 3);
    let mut buf = [0u8; 3];
    assert_eq!(fs.read(fd2, &mut buf).unwrap(), 3);
    assert_eq!(&buf, b"123");
    assert!(!fs.stat(fd3).unwrap().linked);
    assert_eq!(fs.live_file_count(), 1);

    fs.close(fd1).unwrap();
    fs.close(fd2).unwrap();
    fs.close(fd3).unwrap();

    assert!(matches!(fs.open("file", OpenFlags::Default), Err(UfsError::NoFile)));
    assert_eq!(fs.live_file_count(), 0);
}

#[test]
fn test_recreate_after_delete_is_a_new_file() {
    let mut fs = UserFs::new();
    let old = fs.open("a", OpenFlags::Create).unwrap();
    fs.write(old, b"old content").unwrap();
    fs.delete("a").unwrap();

    let new = fs.open("a", OpenFlags::Create).unwrap();

    assert_eq!(fs.file_size("a").unwrap(), 0);
    fs.write(new, b"new").unwrap();
    assert_eq!(fs.stat(old).unwrap().size, 11);
    assert_eq!(fs.live_file_count(), 2);
}

// =============================================================================
// Seek / Tell / Resize Tests
// =============================================================================

#[test]
fn test_seek_and_reread() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();
    let data = pattern(3 * BLOCK_SIZE);
    fs.write(fd, &data).unwrap();

    for position in [0, 1, BLOCK_SIZE - 1, BLOCK_SIZE, BLOCK_SIZE + 1, 3 * BLOCK_SIZE] {
        assert_eq!(fs.seek(fd, position).unwrap(), position);
        assert_eq!(fs.tell(fd).unwrap(), position);
        assert_eq!(read_all(&mut fs, fd), &data[position..]);
    }
}

#[test]
fn test_seek_past_end_fails() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();
    fs.write(fd, b"abc").unwrap();

    let result = fs.seek(fd, 4);

    assert!(matches!(result, Err(UfsError::InvalidPosition { position: 4, size: 3 })));
    assert_eq!(fs.last_error(), ErrorCode::InvalidArgument);
    assert_eq!(fs.tell(fd).unwrap(), 3);
}

#[test]
fn test_seek_to_full_block_end_then_append() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();
    fs.write(fd, &pattern(BLOCK_SIZE)).unwrap();

    fs.seek(fd, BLOCK_SIZE).unwrap();
    fs.write(fd, b"next").unwrap();

    assert_eq!(fs.block_occupancy("a").unwrap(), vec![BLOCK_SIZE, 4]);
}

#[test]
fn test_resize_not_implemented() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();

    assert!(matches!(fs.resize(fd, 10), Err(UfsError::NotImplemented(_))));
    assert_eq!(fs.last_error(), ErrorCode::NotImplemented);
}

// =============================================================================
// last_error Tests
// =============================================================================

#[test]
fn test_last_error_starts_clear() {
    let fs = UserFs::new();
    assert_eq!(fs.last_error(), ErrorCode::NoErr);
}

#[test]
fn test_last_error_survives_success() {
    let mut fs = UserFs::new();
    let _ = fs.open("missing", OpenFlags::Default);
    assert_eq!(fs.last_error(), ErrorCode::NoFile);

    fs.open("a", OpenFlags::Create).unwrap();
    assert_eq!(fs.last_error(), ErrorCode::NoFile);
}

#[test]
fn test_last_error_tracks_most_recent() {
    let mut fs = UserFs::new();
    fs.open("a", OpenFlags::Create).unwrap();
    let ro = fs.open("a", OpenFlags::ReadOnly).unwrap();

    let _ = fs.delete("nope");
    assert_eq!(fs.last_error(), ErrorCode::NoFile);

    let _ = fs.write(ro, b"x");
    assert_eq!(fs.last_error(), ErrorCode::NoPermission);
}

// =============================================================================
// Destroy Tests
// =============================================================================

#[test]
fn test_destroy_frees_everything() {
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlags::Create).unwrap();
    fs.write(fd, &pattern(4 * BLOCK_SIZE)).unwrap();
    fs.open("b", OpenFlags::Create).unwrap();
    fs.delete("b").unwrap();

    fs.destroy();

    assert_eq!(fs.file_count(), 0);
    assert_eq!(fs.live_file_count(), 0);
    assert_eq!(fs.open_descriptor_count(), 0);
    assert_eq!(fs.descriptor_capacity(), 0);
    assert!(matches!(fs.write(fd, b"x"), Err(UfsError::NoFile)));
}

#[test]
fn test_engine_usable_after_destroy() {
    let mut fs = UserFs::new();
    fs.open("a", OpenFlags::Create).unwrap();
    fs.destroy();

    let fd = fs.open("a", OpenFlags::Create).unwrap();
    assert_eq!(fd.index(), 0);
    assert_eq!(fs.file_size("a").unwrap(), 0);
}

#[test]
fn test_handles_from_before_destroy_do_not_alias() {
    let mut fs = UserFs::new();
    let old = fs.open("a", OpenFlags::Create).unwrap();
    fs.destroy();

    let new = fs.open("b", OpenFlags::Create).unwrap();
    assert_eq!(new.index(), old.index());
    assert_ne!(new, old);

    assert!(matches!(fs.write(old, b"x"), Err(UfsError::NoFile)));
    assert_eq!(fs.file_size("b").unwrap(), 0);
}
