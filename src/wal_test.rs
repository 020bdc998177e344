// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;
use std::io::Write as _;
use tempfile::tempdir;

#[test]
fn append_then_replay_round_trips_ops() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    {
        let (mut wal, ops) = WriteAheadLog::open_and_replay(&path).unwrap();
        assert!(ops.is_empty());
        wal.append(wal.next_seqid(), b"alice", b"hello").unwrap();
        wal.append(wal.next_seqid(), b"bob", b"world").unwrap();
    }

    let (wal, ops) = WriteAheadLog::open_and_replay(&path).unwrap();
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0].seqid, 1);
    assert_eq!(ops[0].id, b"alice");
    assert_eq!(ops[0].content, b"hello");
    assert_eq!(ops[1].seqid, 2);
    assert_eq!(wal.next_seqid(), 3);
}

#[test]
fn append_rejects_out_of_order_seqid() {
    let dir = tempdir().unwrap();
    let (mut wal, _) = WriteAheadLog::open_and_replay(dir.path().join("wal.log")).unwrap();
    let err = wal.append(5, b"x", b"y").unwrap_err();
    assert!(matches!(err, ReedError::Precondition { .. }));
}

#[test]
fn replay_discards_torn_tail_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    {
        let (mut wal, _) = WriteAheadLog::open_and_replay(&path).unwrap();
        wal.append(1, b"alice", b"hello").unwrap();
    }

    // Simulate a crash mid-write: append a header claiming more bytes
    // than are actually present.
    {
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&2u32.to_le_bytes()).unwrap();
        file.write_all(&100u32.to_le_bytes()).unwrap(); // id_size lies
        file.write_all(&0u32.to_le_bytes()).unwrap();
        file.write_all(b"short").unwrap(); // far fewer than 100 bytes
    }

    let (mut wal, ops) = WriteAheadLog::open_and_replay(&path).unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(wal.next_seqid(), 2);

    // The torn tail must have been truncated away, not merely ignored:
    // the file should hold exactly the one complete record.
    let expected_len = 12 + "alice".len() as u64 + "hello".len() as u64;
    assert_eq!(std::fs::metadata(&path).unwrap().len(), expected_len);

    // And appending after replay must produce a clean, replayable log.
    wal.append(2, b"carol", b"!").unwrap();
    let (_wal, ops) = WriteAheadLog::open_and_replay(&path).unwrap();
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[1].id, b"carol");
}

#[test]
fn replay_rejects_non_increasing_seqid_mid_stream() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .open(&path)
        .unwrap();
    for (seqid, id) in [(1u32, b"a" as &[u8]), (1u32, b"b")] {
        file.write_all(&seqid.to_le_bytes()).unwrap();
        file.write_all(&(id.len() as u32).to_le_bytes()).unwrap();
        file.write_all(&0u32.to_le_bytes()).unwrap();
        file.write_all(id).unwrap();
    }
    drop(file);

    let err = WriteAheadLog::open_and_replay(&path).unwrap_err();
    assert!(matches!(err, ReedError::Corruption { .. }));
}

#[test]
fn replay_rejects_zero_seqid_on_first_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .open(&path)
        .unwrap();
    file.write_all(&0u32.to_le_bytes()).unwrap();
    file.write_all(&1u32.to_le_bytes()).unwrap();
    file.write_all(&0u32.to_le_bytes()).unwrap();
    file.write_all(b"a").unwrap();
    drop(file);

    let err = WriteAheadLog::open_and_replay(&path).unwrap_err();
    assert!(matches!(err, ReedError::Corruption { .. }));
}

#[test]
fn empty_log_replays_to_nothing() {
    let dir = tempdir().unwrap();
    let (wal, ops) = WriteAheadLog::open_and_replay(dir.path().join("wal.log")).unwrap();
    assert!(ops.is_empty());
    assert_eq!(wal.next_seqid(), 1);
}
