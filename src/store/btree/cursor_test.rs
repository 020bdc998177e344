// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::store::btree::node;
use tempfile::tempdir;

fn single_leaf_file(keys: &[&str]) -> (tempfile::TempDir, NodeFile, StringPool) {
    let dir = tempdir().unwrap();
    let mut file = NodeFile::create_truncated(dir.path().join("nodes"), 4096).unwrap();
    let mut pool = StringPool::new();

    for (i, k) in keys.iter().enumerate() {
        let key_idx = pool.append(k.as_bytes());
        let content_idx = pool.append(format!("content-{k}").as_bytes());
        node::add_item(file.block_mut(0), i, key_idx, content_idx, k.as_bytes());
    }
    (dir, file, pool)
}

#[test]
fn navigate_to_leaf_finds_exact_match() {
    let (_dir, file, pool) = single_leaf_file(&["apple", "mango", "zebra"]);
    let mut cursor = TreeCursor::new(&file, &pool, 128);

    let leaf = cursor.navigate_to_leaf(0, b"mango");
    assert_eq!(leaf, 0);
    assert!(cursor.matches(b"mango"));
}

#[test]
fn navigate_to_leaf_reports_no_match_for_missing_key() {
    let (_dir, file, pool) = single_leaf_file(&["apple", "mango", "zebra"]);
    let mut cursor = TreeCursor::new(&file, &pool, 128);

    cursor.navigate_to_leaf(0, b"kiwi");
    assert!(!cursor.matches(b"kiwi"));
}

#[test]
fn navigate_to_leaf_on_empty_leaf_never_matches() {
    let (_dir, file, pool) = single_leaf_file(&[]);
    let mut cursor = TreeCursor::new(&file, &pool, 128);

    cursor.navigate_to_leaf(0, b"anything");
    assert!(!cursor.matches(b"anything"));
}

#[test]
fn matched_content_idx_resolves_through_pool() {
    let (_dir, file, pool) = single_leaf_file(&["apple", "mango"]);
    let mut cursor = TreeCursor::new(&file, &pool, 128);

    cursor.navigate_to_leaf(0, b"apple");
    assert!(cursor.matches(b"apple"));
    let content = pool.get(cursor.matched_content_idx());
    assert_eq!(content, b"content-apple");
}
