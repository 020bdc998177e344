// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn round_trips_appended_strings() {
    let mut pool = StringPool::new();
    let a = pool.append(b"hello");
    let b = pool.append(b"world");

    assert_eq!(pool.get(a), b"hello");
    assert_eq!(pool.get(b), b"world");
}

#[test]
fn offsets_never_move_across_growth() {
    let mut pool = StringPool::new();
    let first = pool.append(b"first");

    // Force many reallocations past the initial capacity.
    for i in 0..10_000 {
        pool.append(format!("padding-{i}").as_bytes());
    }

    assert_eq!(pool.get(first), b"first");
}

#[test]
fn handles_empty_string() {
    let mut pool = StringPool::new();
    let idx = pool.append(b"");
    assert_eq!(pool.get(idx), b"");
}

#[test]
fn len_tracks_bytes_including_terminators() {
    let mut pool = StringPool::new();
    assert!(pool.is_empty());
    pool.append(b"ab");
    pool.append(b"cde");
    assert_eq!(pool.len(), 3 + 4);
}
