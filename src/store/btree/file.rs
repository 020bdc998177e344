// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Memory-mapped backing store for B+-tree node blocks.
//!
//! `NodeFile` owns the file handle and the `MmapMut` over it. It knows
//! nothing about tree structure — only how to grow the file to fit more
//! `block_size`-byte blocks and hand out mutable/immutable views into
//! them. Growth doubles capacity (`2 * n + 1`, matching the original
//! reference implementation) rather than growing to exact fit, so the
//! amortised cost of allocating nodes stays O(1).
//!
//! The file is opened truncate-on-open: the B+-tree is treated as an
//! ephemeral cache rebuilt from the write-ahead log on every open (see
//! DESIGN.md, Open Question 1), so there is no need to preserve a
//! previous file's contents across process restarts.

use super::types::NodeType;
use crate::error::{ReedError, ReedResult};
use memmap2::MmapMut;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use super::page;

/// Backing store for all node blocks of one B+-tree.
pub struct NodeFile {
    path: PathBuf,
    file: File,
    mmap: MmapMut,
    block_size: u32,
    /// Current capacity of the file, in blocks.
    capacity: u32,
}

impl NodeFile {
    /// Open `path` for exclusive use, discarding any previous contents,
    /// and initialise block 0 as an empty leaf node (the tree's initial
    /// root).
    pub fn create_truncated<P: AsRef<Path>>(path: P, block_size: u32) -> ReedResult<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| ReedError::Io {
                operation: "open_node_file".to_string(),
                reason: e.to_string(),
            })?;

        let mut node_file = Self {
            path,
            file,
            mmap: MmapMut::map_anon(1).map_err(|e| ReedError::Io {
                operation: "mmap_placeholder".to_string(),
                reason: e.to_string(),
            })?,
            block_size,
            capacity: 0,
        };

        node_file.resize_to(1)?;
        node_file.init_block(0, NodeType::Leaf, super::types::NO_SIBLING);

        Ok(node_file)
    }

    /// Grow (doubling: `2n + 1`) until the file holds at least
    /// `min_blocks` blocks. No-op if already large enough.
    pub fn ensure_capacity(&mut self, min_blocks: u32) -> ReedResult<()> {
        if self.capacity > min_blocks {
            return Ok(());
        }
        let new_capacity = 2 * self.capacity + 1;
        self.resize_to(new_capacity.max(min_blocks + 1))
    }

    fn resize_to(&mut self, new_capacity: u32) -> ReedResult<()> {
        let new_len = new_capacity as u64 * self.block_size as u64;

        // Flush and drop the current mapping before resizing the file;
        // mmap2 requires the backing file to be at least as large as the
        // mapping for the whole time it's live.
        self.mmap.flush().map_err(|e| ReedError::Io {
            operation: "flush_before_grow".to_string(),
            reason: e.to_string(),
        })?;

        self.file.set_len(new_len).map_err(|e| ReedError::Io {
            operation: "resize_node_file".to_string(),
            reason: e.to_string(),
        })?;

        self.mmap = unsafe {
            MmapMut::map_mut(&self.file).map_err(|e| ReedError::Io {
                operation: "remap_node_file".to_string(),
                reason: e.to_string(),
            })?
        };

        self.capacity = new_capacity;
        Ok(())
    }

    fn offset(&self, idx: u32) -> usize {
        idx as usize * self.block_size as usize
    }

    /// Initialise block `idx` in place as an empty node of `node_type`.
    pub fn init_block(&mut self, idx: u32, node_type: NodeType, next_idx: u32) {
        let size = self.block_size as usize;
        let off = self.offset(idx);
        page::init_block(&mut self.mmap[off..off + size], node_type, next_idx);
    }

    /// Immutable view of block `idx`.
    pub fn block(&self, idx: u32) -> &[u8] {
        let size = self.block_size as usize;
        let off = self.offset(idx);
        &self.mmap[off..off + size]
    }

    /// Mutable view of block `idx`.
    pub fn block_mut(&mut self, idx: u32) -> &mut [u8] {
        let size = self.block_size as usize;
        let off = self.offset(idx);
        &mut self.mmap[off..off + size]
    }

    /// Mutable views of two distinct blocks at once, for split operations
    /// that must write both the original node and its new sibling.
    ///
    /// # Panics
    /// Panics if `a == b` — a split always targets two distinct nodes.
    pub fn two_blocks_mut(&mut self, a: u32, b: u32) -> (&mut [u8], &mut [u8]) {
        assert_ne!(a, b, "two_blocks_mut requires distinct indices");
        let size = self.block_size as usize;
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let lo_off = self.offset(lo);
        let hi_off = self.offset(hi);
        let (left, right) = self.mmap.split_at_mut(hi_off);
        let lo_block = &mut left[lo_off..lo_off + size];
        let hi_block = &mut right[0..size];
        if a < b {
            (lo_block, hi_block)
        } else {
            (hi_block, lo_block)
        }
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush pending mmap writes to the OS.
    pub fn flush(&self) -> ReedResult<()> {
        self.mmap.flush().map_err(|e| ReedError::Io {
            operation: "flush_node_file".to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;
