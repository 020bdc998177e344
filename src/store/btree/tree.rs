// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The mmap-backed B+-tree forward index: `entity id -> content`.
//!
//! Construction, single-key lookup and insert-with-split live here. The
//! byte-level item layout is [`super::node`]; descent is
//! [`super::cursor::TreeCursor`]; backing storage is [`super::file::NodeFile`].
//!
//! Insertion walks the breadcrumb path returned by the cursor bottom-up:
//! it tries to add the new item in place at each level, and on overflow
//! splits that node into two freshly repacked halves, promoting the new
//! sibling's first key to the parent. If the split reaches the root, a
//! new root is allocated holding a two-item fan-out to the old root
//! (now the left half) and the newly split-off sibling.

use super::cursor::TreeCursor;
use super::file::NodeFile;
use super::node;
use super::types::{BTreeConfig, NodeIndex, NodeType};
use super::visitor::{TreePrinter, TreeVisitor};
use crate::error::ReedResult;
use crate::store::pool::{StringIndex, StringPool};
use std::path::Path;

/// Promotion handed up from a just-split child to its parent: the key
/// material to insert, and the new sibling's node index (the child
/// pointer a parent item carries).
type Promotion = (StringIndex, NodeIndex, Vec<u8>);

pub struct BTreeForwardIndex {
    config: BTreeConfig,
    node_file: NodeFile,
    pool: StringPool,
    root: NodeIndex,
    next_free: NodeIndex,
    item_count: u64,
}

impl BTreeForwardIndex {
    /// Create a fresh, empty tree backed by a truncated file at `path`.
    /// The tree is treated as a rebuildable cache (see crate-level
    /// design notes on durability): callers repopulate it by replaying
    /// the write-ahead log after this call.
    pub fn create_truncated<P: AsRef<Path>>(path: P, config: BTreeConfig) -> ReedResult<Self> {
        let node_file = NodeFile::create_truncated(path, config.block_size())?;
        Ok(Self {
            config,
            node_file,
            pool: StringPool::new(),
            root: 0,
            next_free: 0,
            item_count: 0,
        })
    }

    pub fn len(&self) -> u64 {
        self.item_count
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Look up `id`, returning its stored content bytes if present.
    pub fn get(&self, id: &[u8]) -> Option<&[u8]> {
        let mut cursor = TreeCursor::new(&self.node_file, &self.pool, self.config.max_inner_key_length());
        cursor.navigate_to_leaf(self.root, id);
        if cursor.matches(id) {
            Some(self.pool.get(cursor.matched_content_idx()))
        } else {
            None
        }
    }

    pub fn contains(&self, id: &[u8]) -> bool {
        self.get(id).is_some()
    }

    /// Insert `id -> content`. Does not check for an existing entry with
    /// the same id — callers that must reject duplicates (the database
    /// facade does, per its entity-exists rule) check with [`Self::get`]
    /// first.
    pub fn insert(&mut self, id: &[u8], content: &[u8]) -> ReedResult<()> {
        let key_idx = self.pool.append(id);
        let content_idx = self.pool.append(content);
        let inline_len = id.len().min(self.config.max_inner_key_length() as usize);
        let inline_key = id[..inline_len].to_vec();

        let path = {
            let mut cursor =
                TreeCursor::new(&self.node_file, &self.pool, self.config.max_inner_key_length());
            cursor.navigate_to_leaf(self.root, id);
            cursor.path().to_vec()
        };

        self.insert_along_path(&path, key_idx, content_idx, inline_key)?;
        self.item_count += 1;
        Ok(())
    }

    fn allocate_node(&mut self, node_type: NodeType) -> ReedResult<NodeIndex> {
        self.next_free += 1;
        self.node_file.ensure_capacity(self.next_free)?;
        self.node_file
            .init_block(self.next_free, node_type, super::types::NO_SIBLING);
        Ok(self.next_free)
    }

    /// Apply the insert at the leaf, then walk the path upward applying
    /// any promotion bubbling up from a split, finally creating a new
    /// root if the split reached the top.
    fn insert_along_path(
        &mut self,
        path: &[(NodeIndex, usize)],
        key_idx: StringIndex,
        content_idx: u32,
        inline_key: Vec<u8>,
    ) -> ReedResult<()> {
        let (leaf_idx, leaf_pos) = *path.last().expect("navigate_to_leaf always yields a path");
        let mut promoted = self.insert_or_split(
            leaf_idx,
            leaf_pos,
            key_idx,
            content_idx,
            &inline_key,
            NodeType::Leaf,
        )?;

        for &(node_idx, pos) in path[..path.len() - 1].iter().rev() {
            let Some((p_key_idx, sibling_idx, p_inline)) = promoted else {
                return Ok(());
            };
            promoted =
                self.insert_or_split(node_idx, pos, p_key_idx, sibling_idx, &p_inline, NodeType::Inner)?;
        }

        if let Some((p_key_idx, sibling_idx, p_inline)) = promoted {
            self.create_new_root(p_key_idx, sibling_idx, p_inline, path[0].0)?;
        }

        Ok(())
    }

    /// Insert `(key_idx, content_idx, inline_key)` at `pos` in `node_idx`
    /// if there's room. Otherwise split the node in half (including the
    /// new item in the split), repack both halves, and return the
    /// promotion for the caller to insert into the parent.
    fn insert_or_split(
        &mut self,
        node_idx: NodeIndex,
        pos: usize,
        key_idx: StringIndex,
        content_idx: u32,
        inline_key: &[u8],
        node_type: NodeType,
    ) -> ReedResult<Option<Promotion>> {
        if node::has_space(self.node_file.block(node_idx), inline_key.len() as u16) {
            node::add_item(
                self.node_file.block_mut(node_idx),
                pos,
                key_idx,
                content_idx,
                inline_key,
            );
            return Ok(None);
        }

        let block = self.node_file.block(node_idx);
        let num_items = node::num_items(block) as usize;
        let mut items = node::collect_items(block, 0, num_items);
        items.insert(pos, (key_idx, content_idx, inline_key.to_vec()));

        let split_at = items.len() / 2;
        let right_items = items.split_off(split_at);
        let left_items = items;
        debug_assert!(
            (left_items.len() as i64 - right_items.len() as i64).abs() <= 1,
            "split halves must differ by at most one item"
        );

        let original_next = node::next_idx(self.node_file.block(node_idx));
        let sibling_idx = self.allocate_node(node_type)?;

        {
            let (left_block, right_block) = self.node_file.two_blocks_mut(node_idx, sibling_idx);
            node::repack_into(left_block, node_type, sibling_idx, left_items.into_iter());
            node::repack_into(right_block, node_type, original_next, right_items.into_iter());
        }

        let promoted_item = node::item_at(self.node_file.block(sibling_idx), 0);
        let promoted_inline = node::inline_key_bytes(self.node_file.block(sibling_idx), 0).to_vec();

        Ok(Some((promoted_item.key_idx, sibling_idx, promoted_inline)))
    }

    /// Build a new two-item root above `old_root` (now holding the left
    /// half of a just-propagated split) and the freshly split-off
    /// sibling, and make it the tree's root.
    fn create_new_root(
        &mut self,
        promoted_key_idx: StringIndex,
        sibling_idx: NodeIndex,
        promoted_inline: Vec<u8>,
        old_root: NodeIndex,
    ) -> ReedResult<()> {
        let new_root_idx = self.allocate_node(NodeType::Inner)?;
        let fence_key = self.pool.append(b"");
        node::add_item(self.node_file.block_mut(new_root_idx), 0, fence_key, old_root, b"");
        node::add_item(
            self.node_file.block_mut(new_root_idx),
            1,
            promoted_key_idx,
            sibling_idx,
            &promoted_inline,
        );
        self.root = new_root_idx;
        Ok(())
    }

    /// Run `visitor` over the whole tree, depth-first.
    pub fn walk(&self, visitor: &mut dyn TreeVisitor) {
        super::visitor::walk(&self.node_file, self.root, visitor);
    }

    pub fn config(&self) -> BTreeConfig {
        self.config
    }

    /// Render the tree as indented text for the `--dump-tree` debug flag.
    pub fn dump(&self) -> String {
        let mut printer = TreePrinter::new(&self.node_file, &self.pool);
        self.walk(&mut printer);
        printer.output
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
