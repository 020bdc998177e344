// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Read-only descent through the tree, tracking a breadcrumb path of
//! `(node index, partition point)` pairs from the root down.
//!
//! The cursor only ever reads blocks; the mutating insert path in
//! [`super::tree`] re-derives its own path while it works because split
//! propagation needs `&mut` access to nodes the cursor would otherwise be
//! borrowing. It reuses the same partition-point search, though, so the
//! position recorded at each level doubles as the index to insert at —
//! no second search is needed to find where a promoted key lands in its
//! parent.

use super::file::NodeFile;
use super::node;
use super::types::{KeyCmp, NodeIndex, NodeType};
use crate::store::pool::StringPool;

/// One step of the descent: the node visited and the *partition point* —
/// the index of the first item strictly greater than the probe key (or
/// `num_items` if none is). Items before it are all `<= probe`.
///
/// For an inner node this is always `>= 1` (item 0, the low fence, is
/// never compared), so `partition_point - 1` is always a valid child
/// index to descend into. For a leaf, the partition point is directly
/// the index a new item would be inserted at if the key isn't already
/// present.
pub type PathEntry = (NodeIndex, usize);

pub struct TreeCursor<'a> {
    node_file: &'a NodeFile,
    pool: &'a StringPool,
    max_inner_key_length: u16,
    path: Vec<PathEntry>,
}

impl<'a> TreeCursor<'a> {
    pub fn new(node_file: &'a NodeFile, pool: &'a StringPool, max_inner_key_length: u16) -> Self {
        Self {
            node_file,
            pool,
            max_inner_key_length,
            path: Vec::new(),
        }
    }

    /// The breadcrumb path accumulated so far, root first.
    pub fn path(&self) -> &[PathEntry] {
        &self.path
    }

    /// Binary search `node_idx` for the partition point of `probe`: the
    /// first item index whose key is strictly greater than `probe`.
    /// Inner nodes search only items `[1, num_items)`, since item 0 is
    /// the low fence and by construction never above any probe routed
    /// to this subtree.
    pub(crate) fn partition_point(&self, node_idx: NodeIndex, probe: &[u8]) -> usize {
        let block = self.node_file.block(node_idx);
        let node_type = node::node_type(block).expect("cursor descent over validated node");
        let n = node::num_items(block) as usize;
        let lo_start = if node_type == NodeType::Inner { 1 } else { 0 };

        let mut lo = lo_start;
        let mut hi = n;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let cmp = node::compare_keys(block, mid, probe, self.max_inner_key_length, self.pool);
            // KeyCmp::Below means probe < item, i.e. item is above probe —
            // a candidate partition point (or we can still look further
            // left for an earlier one). Above/Equal means item <= probe,
            // so the partition point is strictly to the right.
            if cmp == KeyCmp::Below {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo
    }

    /// Descend from `root` to the leaf that would contain `key`, pushing
    /// one path entry per level. Returns the leaf's node index.
    pub fn navigate_to_leaf(&mut self, root: NodeIndex, key: &[u8]) -> NodeIndex {
        self.path.clear();
        let mut current = root;
        loop {
            let pos = self.partition_point(current, key);
            self.path.push((current, pos));
            let block = self.node_file.block(current);
            if node::node_type(block).expect("navigating validated node") == NodeType::Leaf {
                return current;
            }
            current = node::child_at(block, pos - 1);
        }
    }

    /// After [`navigate_to_leaf`], check whether the item just below the
    /// partition point is an exact match for `key`.
    pub fn matches(&self, key: &[u8]) -> bool {
        let Some(&(node_idx, pos)) = self.path.last() else {
            return false;
        };
        if pos == 0 {
            return false;
        }
        let block = self.node_file.block(node_idx);
        node::compare_keys(block, pos - 1, key, self.max_inner_key_length, self.pool)
            == KeyCmp::Equal
    }

    /// Content string-pool offset of the matched leaf item. Only valid
    /// immediately after [`navigate_to_leaf`] when [`matches`] is true.
    pub fn matched_content_idx(&self) -> u32 {
        let (node_idx, pos) = *self.path.last().expect("matched_content_idx after navigate");
        node::item_at(self.node_file.block(node_idx), pos - 1).content_idx
    }
}

#[cfg(test)]
#[path = "cursor_test.rs"]
mod cursor_test;
