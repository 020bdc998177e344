// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::store::btree::node;
use crate::store::btree::types::NO_SIBLING;
use tempfile::tempdir;

/// Build a two-level tree: root (inner, node 0) with a fence item
/// pointing at leaf 1 ("apple", "avocado") and a second item keyed
/// "mango" pointing at leaf 2 ("mango", "zebra").
fn small_tree() -> (tempfile::TempDir, NodeFile, StringPool) {
    let dir = tempdir().unwrap();
    let mut file = NodeFile::create_truncated(dir.path().join("nodes"), 4096).unwrap();
    file.ensure_capacity(2).unwrap();
    let mut pool = StringPool::new();

    file.init_block(0, NodeType::Inner, NO_SIBLING);
    file.init_block(1, NodeType::Leaf, 2);
    file.init_block(2, NodeType::Leaf, NO_SIBLING);

    for (i, k) in ["apple", "avocado"].iter().enumerate() {
        let key_idx = pool.append(k.as_bytes());
        node::add_item(file.block_mut(1), i, key_idx, 0, k.as_bytes());
    }
    for (i, k) in ["mango", "zebra"].iter().enumerate() {
        let key_idx = pool.append(k.as_bytes());
        node::add_item(file.block_mut(2), i, key_idx, 0, k.as_bytes());
    }

    let fence_key = pool.append(b"");
    node::add_item(file.block_mut(0), 0, fence_key, 1, b"");
    let split_key = pool.append(b"mango");
    node::add_item(file.block_mut(0), 1, split_key, 2, b"mango");

    (dir, file, pool)
}

#[test]
fn invariant_checker_accepts_sorted_tree() {
    let (_dir, file, pool) = small_tree();
    let mut checker = InvariantChecker::new(&file, &pool);
    walk(&file, 0, &mut checker);
    assert_eq!(checker.items_visited, 4);
}

#[test]
#[should_panic(expected = "non-decreasing")]
fn invariant_checker_rejects_out_of_order_keys() {
    let (_dir, mut file, mut pool) = small_tree();
    // Corrupt leaf 2 by prepending a key smaller than leaf 1's keys.
    let key_idx = pool.append(b"AAA");
    node::add_item(file.block_mut(2), 0, key_idx, 0, b"AAA");

    let mut checker = InvariantChecker::new(&file, &pool);
    walk(&file, 0, &mut checker);
}

#[test]
fn tree_printer_renders_fence_and_leaves() {
    let (_dir, file, pool) = small_tree();
    let mut printer = TreePrinter::new(&file, &pool);
    walk(&file, 0, &mut printer);

    assert!(printer.output.contains("node 0"));
    assert!(printer.output.contains("[fence]"));
    assert!(printer.output.contains("\"apple\""));
    assert!(printer.output.contains("\"zebra\""));
}
