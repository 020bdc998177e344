// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Iterative depth-first tree walk driving a [`TreeVisitor`], plus two
//! built-in visitors: an invariant checker used by tests and a
//! debug-oriented printer.

use super::file::NodeFile;
use super::node;
use super::types::{NodeIndex, NodeType};
use crate::store::pool::StringPool;

/// Callbacks invoked while [`walk`] traverses the tree depth-first,
/// left to right. Inner-node items are visited in order and descended
/// into immediately (`enter_node_item` then the child's subtree);
/// leaf items are visited without descent.
pub trait TreeVisitor {
    fn enter_node(&mut self, _node_idx: NodeIndex) {}
    fn enter_node_item(&mut self, _node_idx: NodeIndex, _item_idx: usize) {}
    fn exit_node(&mut self, _node_idx: NodeIndex) {}

    fn enter_leaf(&mut self, _node_idx: NodeIndex) {}
    fn enter_leaf_item(&mut self, _node_idx: NodeIndex, _item_idx: usize) {}
    fn exit_leaf(&mut self, _node_idx: NodeIndex) {}
}

/// Depth-first walk of the subtree rooted at `root`, calling back into
/// `visitor` at each node/item. Iterative (an explicit stack) rather
/// than recursive, so a pathologically deep tree can't blow the call
/// stack of whatever invariant checker or debug dump drives it.
pub fn walk(node_file: &NodeFile, root: NodeIndex, visitor: &mut dyn TreeVisitor) {
    let mut stack: Vec<(NodeIndex, usize)> = vec![(root, 0)];
    enter(node_file, root, visitor);

    while let Some(&(node_idx, item_idx)) = stack.last() {
        let block = node_file.block(node_idx);
        let node_type = node::node_type(block).expect("walking validated node");
        let num_items = node::num_items(block) as usize;

        if item_idx >= num_items {
            exit(node_file, node_idx, visitor);
            stack.pop();
            if let Some(last) = stack.last_mut() {
                last.1 += 1;
            }
            continue;
        }

        match node_type {
            NodeType::Leaf => {
                visitor.enter_leaf_item(node_idx, item_idx);
                stack.last_mut().unwrap().1 += 1;
            }
            NodeType::Inner => {
                visitor.enter_node_item(node_idx, item_idx);
                let child = node::child_at(block, item_idx);
                stack.push((child, 0));
                enter(node_file, child, visitor);
            }
        }
    }
}

fn enter(node_file: &NodeFile, node_idx: NodeIndex, visitor: &mut dyn TreeVisitor) {
    match node::node_type(node_file.block(node_idx)).expect("entering validated node") {
        NodeType::Leaf => visitor.enter_leaf(node_idx),
        NodeType::Inner => visitor.enter_node(node_idx),
    }
}

fn exit(node_file: &NodeFile, node_idx: NodeIndex, visitor: &mut dyn TreeVisitor) {
    match node::node_type(node_file.block(node_idx)).expect("exiting validated node") {
        NodeType::Leaf => visitor.exit_leaf(node_idx),
        NodeType::Inner => visitor.exit_node(node_idx),
    }
}

/// Asserts that every leaf key, visited in tree order, is
/// non-decreasing, and that each item's decoded inline key bytes match
/// what's stored in the string pool up to the inline truncation length.
/// Panics on the first violation — this is a `debug_assert`-style
/// correctness tool for tests, not a recoverable runtime check.
pub struct InvariantChecker<'a> {
    node_file: &'a NodeFile,
    pool: &'a StringPool,
    last_key: Option<Vec<u8>>,
    pub items_visited: usize,
}

impl<'a> InvariantChecker<'a> {
    pub fn new(node_file: &'a NodeFile, pool: &'a StringPool) -> Self {
        Self {
            node_file,
            pool,
            last_key: None,
            items_visited: 0,
        }
    }
}

impl<'a> TreeVisitor for InvariantChecker<'a> {
    fn enter_leaf_item(&mut self, node_idx: NodeIndex, item_idx: usize) {
        let block = self.node_file.block(node_idx);
        let item = node::item_at(block, item_idx);
        let full_key = self.pool.get(item.key_idx).to_vec();
        let inline = node::inline_key_bytes(block, item_idx);
        assert!(
            full_key.starts_with(inline),
            "inline key bytes must be a prefix of the full key"
        );

        if let Some(prev) = &self.last_key {
            assert!(
                prev.as_slice() <= full_key.as_slice(),
                "leaf keys must be non-decreasing in tree order: {prev:?} then {full_key:?}"
            );
        }
        self.last_key = Some(full_key);
        self.items_visited += 1;
    }
}

/// Renders the tree as indented text, one line per node/item, for manual
/// inspection while debugging.
pub struct TreePrinter<'a> {
    node_file: &'a NodeFile,
    pool: &'a StringPool,
    depth: usize,
    pub output: String,
}

impl<'a> TreePrinter<'a> {
    pub fn new(node_file: &'a NodeFile, pool: &'a StringPool) -> Self {
        Self {
            node_file,
            pool,
            depth: 0,
            output: String::new(),
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.output.push_str("  ");
        }
    }
}

impl<'a> TreeVisitor for TreePrinter<'a> {
    fn enter_node(&mut self, node_idx: NodeIndex) {
        self.indent();
        self.output.push_str(&format!("node {node_idx}\n"));
        self.depth += 1;
    }

    fn exit_node(&mut self, _node_idx: NodeIndex) {
        self.depth -= 1;
    }

    fn enter_node_item(&mut self, node_idx: NodeIndex, item_idx: usize) {
        let block = self.node_file.block(node_idx);
        let child = node::child_at(block, item_idx);
        self.indent();
        if item_idx == 0 {
            self.output.push_str(&format!("[fence] -> {child}\n"));
        } else {
            let key = node::inline_key_bytes(block, item_idx);
            self.output
                .push_str(&format!("{:?} -> {child}\n", String::from_utf8_lossy(key)));
        }
    }

    fn enter_leaf(&mut self, node_idx: NodeIndex) {
        self.indent();
        self.output.push_str(&format!("leaf {node_idx}\n"));
        self.depth += 1;
    }

    fn exit_leaf(&mut self, _node_idx: NodeIndex) {
        self.depth -= 1;
    }

    fn enter_leaf_item(&mut self, node_idx: NodeIndex, item_idx: usize) {
        let block = self.node_file.block(node_idx);
        let item = node::item_at(block, item_idx);
        let key = self.pool.get(item.key_idx);
        self.indent();
        self.output
            .push_str(&format!("{:?}\n", String::from_utf8_lossy(key)));
    }
}

#[cfg(test)]
#[path = "visitor_test.rs"]
mod visitor_test;
