// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Item array and inline-key heap layout within a node block's payload.
//!
//! Past [`page::HEADER_SIZE`][super::page::HEADER_SIZE], a block holds two
//! regions that grow toward each other:
//!
//! - the **item array**, growing up from `HEADER_SIZE`, one fixed-size
//!   [`ITEM_SIZE`][super::page::ITEM_SIZE]-byte descriptor per item;
//! - the **inline-key heap**, growing down from `inner_key_data_start`,
//!   holding the (possibly truncated) prefix of each item's key.
//!
//! An item descriptor is:
//!
//! ```text
//! Offset | Size | Field
//! -------|------|-------
//! 0      | 4    | key_idx (StringIndex, full key in the string pool)
//! 4      | 4    | content_idx (StringIndex for a leaf; NodeIndex of a child for an inner node)
//! 8      | 2    | inner_key_length (bytes of inline key stored in the heap)
//! 10     | 2    | inner_key_data_offset (offset into the block where those bytes start)
//! ```
//!
//! Item 0 of an inner node is the node's low fence: its key is never
//! compared against (every probe key is, by construction, >= the subtree's
//! lower bound), only its `content_idx` (child pointer) is meaningful.

use super::page;
use super::types::{KeyCmp, NodeIndex, NodeType};
use crate::error::ReedResult;
use crate::store::pool::{StringIndex, StringPool};

const ITEM_KEY_IDX_OFFSET: usize = 0;
const ITEM_CONTENT_IDX_OFFSET: usize = 4;
const ITEM_INNER_KEY_LENGTH_OFFSET: usize = 8;
const ITEM_INNER_KEY_DATA_OFFSET_OFFSET: usize = 10;

/// One decoded item descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub key_idx: StringIndex,
    pub content_idx: u32,
    pub inner_key_length: u16,
    pub inner_key_data_offset: u16,
}

fn item_offset(idx: usize) -> usize {
    page::HEADER_SIZE + idx * page::ITEM_SIZE
}

pub fn node_type(block: &[u8]) -> ReedResult<NodeType> {
    Ok(page::read_header(block)?.node_type)
}

pub fn num_items(block: &[u8]) -> u16 {
    page::read_header_unchecked(block).num_items
}

pub fn next_idx(block: &[u8]) -> u32 {
    page::read_header_unchecked(block).next_idx
}

pub fn inner_key_data_start(block: &[u8]) -> u16 {
    page::read_header_unchecked(block).inner_key_data_start
}

/// Decode item `idx`.
///
/// # Panics
/// Panics if `idx >= num_items(block)`; callers navigate with indices
/// already bounds-checked against the header.
pub fn item_at(block: &[u8], idx: usize) -> Item {
    debug_assert!((idx as u16) < num_items(block), "item index out of range");
    let off = item_offset(idx);
    Item {
        key_idx: u32::from_be_bytes(
            block[off + ITEM_KEY_IDX_OFFSET..off + ITEM_KEY_IDX_OFFSET + 4]
                .try_into()
                .unwrap(),
        ),
        content_idx: u32::from_be_bytes(
            block[off + ITEM_CONTENT_IDX_OFFSET..off + ITEM_CONTENT_IDX_OFFSET + 4]
                .try_into()
                .unwrap(),
        ),
        inner_key_length: u16::from_be_bytes(
            block[off + ITEM_INNER_KEY_LENGTH_OFFSET..off + ITEM_INNER_KEY_LENGTH_OFFSET + 2]
                .try_into()
                .unwrap(),
        ),
        inner_key_data_offset: u16::from_be_bytes(
            block[off + ITEM_INNER_KEY_DATA_OFFSET_OFFSET
                ..off + ITEM_INNER_KEY_DATA_OFFSET_OFFSET + 2]
                .try_into()
                .unwrap(),
        ),
    }
}

fn write_item(block: &mut [u8], idx: usize, item: Item) {
    let off = item_offset(idx);
    block[off + ITEM_KEY_IDX_OFFSET..off + ITEM_KEY_IDX_OFFSET + 4]
        .copy_from_slice(&item.key_idx.to_be_bytes());
    block[off + ITEM_CONTENT_IDX_OFFSET..off + ITEM_CONTENT_IDX_OFFSET + 4]
        .copy_from_slice(&item.content_idx.to_be_bytes());
    block[off + ITEM_INNER_KEY_LENGTH_OFFSET..off + ITEM_INNER_KEY_LENGTH_OFFSET + 2]
        .copy_from_slice(&item.inner_key_length.to_be_bytes());
    block[off + ITEM_INNER_KEY_DATA_OFFSET_OFFSET..off + ITEM_INNER_KEY_DATA_OFFSET_OFFSET + 2]
        .copy_from_slice(&item.inner_key_data_offset.to_be_bytes());
}

/// Inline (possibly truncated) key bytes stored in the heap for item `idx`.
pub fn inline_key_bytes<'a>(block: &'a [u8], idx: usize) -> &'a [u8] {
    let item = item_at(block, idx);
    let start = item.inner_key_data_offset as usize;
    let end = start + item.inner_key_length as usize;
    &block[start..end]
}

/// Child node index held by item `idx` of an inner node.
pub fn child_at(block: &[u8], idx: usize) -> NodeIndex {
    item_at(block, idx).content_idx
}

/// True if the node has room for one more item with an inline key of
/// `inline_key_len` bytes without the item array and the key heap
/// colliding.
pub fn has_space(block: &[u8], inline_key_len: u16) -> bool {
    let header = page::read_header_unchecked(block);
    let items_end = item_offset(header.num_items as usize + 1);
    let heap_start = header
        .inner_key_data_start
        .saturating_sub(inline_key_len) as usize;
    items_end <= heap_start
}

/// Insert an item at position `pos`, shifting items `[pos, num_items)` up
/// by one slot. Caller must have already verified [`has_space`].
///
/// `inline_key` is copied into the heap (growing it down by its length);
/// `key_idx`/`content_idx` are stored verbatim. Updates `num_items` and
/// `inner_key_data_start`, then rewrites the checksum.
pub fn add_item(
    block: &mut [u8],
    pos: usize,
    key_idx: StringIndex,
    content_idx: u32,
    inline_key: &[u8],
) {
    let header = page::read_header_unchecked(block);
    let num_items = header.num_items as usize;
    debug_assert!(pos <= num_items);

    for i in (pos..num_items).rev() {
        let item = item_at(block, i);
        write_item(block, i + 1, item);
    }

    let new_heap_start = header.inner_key_data_start - inline_key.len() as u16;
    let heap_off = new_heap_start as usize;
    block[heap_off..heap_off + inline_key.len()].copy_from_slice(inline_key);

    write_item(
        block,
        pos,
        Item {
            key_idx,
            content_idx,
            inner_key_length: inline_key.len() as u16,
            inner_key_data_offset: new_heap_start,
        },
    );

    page::write_num_items(block, header.num_items + 1);
    page::write_inner_key_data_start(block, new_heap_start);
    page::write_checksum(block);
}

/// Update the child pointer of item `idx` in place (used when a split
/// promotes a new sibling and the parent's existing item must now point
/// at a different child, or when patching a low fence).
pub fn set_content_idx(block: &mut [u8], idx: usize, content_idx: u32) {
    let off = item_offset(idx) + ITEM_CONTENT_IDX_OFFSET;
    block[off..off + 4].copy_from_slice(&content_idx.to_be_bytes());
    page::write_checksum(block);
}

/// Compare `probe` against item `idx`'s key (spec §4.1).
///
/// Compares up to `min(probe.len(), inner_key_length)` bytes inline. If
/// those bytes are equal and the inline key was truncated (its length
/// equals `max_inner_key_length`), falls back to a full comparison via
/// the string pool entry at `key_idx`. Otherwise a longer probe than the
/// (untruncated) inline key sorts above it.
pub fn compare_keys(
    block: &[u8],
    idx: usize,
    probe: &[u8],
    max_inner_key_length: u16,
    pool: &StringPool,
) -> KeyCmp {
    let item = item_at(block, idx);
    let inline = inline_key_bytes(block, idx);
    let compare_len = probe.len().min(inline.len());

    match probe[..compare_len].cmp(&inline[..compare_len]) {
        std::cmp::Ordering::Less => KeyCmp::Below,
        std::cmp::Ordering::Greater => KeyCmp::Above,
        std::cmp::Ordering::Equal => {
            if item.inner_key_length == max_inner_key_length {
                let full_key = pool.get(item.key_idx);
                match probe.cmp(full_key) {
                    std::cmp::Ordering::Less => KeyCmp::Below,
                    std::cmp::Ordering::Equal => KeyCmp::Equal,
                    std::cmp::Ordering::Greater => KeyCmp::Above,
                }
            } else if probe.len() > inline.len() {
                KeyCmp::Above
            } else if probe.len() < inline.len() {
                KeyCmp::Below
            } else {
                KeyCmp::Equal
            }
        }
    }
}

/// Re-initialise `block` as an empty node of `node_type` and tightly
/// repack `items` into it in order, via repeated [`add_item`] at the
/// tail. Used by split to produce two freshly-packed nodes out of one
/// over-full one, reclaiming any fragmentation from prior in-place edits.
pub fn repack_into(
    block: &mut [u8],
    node_type: NodeType,
    next_idx: u32,
    items: impl Iterator<Item = (StringIndex, u32, Vec<u8>)>,
) {
    page::init_block(block, node_type, next_idx);
    for (key_idx, content_idx, inline_key) in items {
        let pos = num_items(block) as usize;
        add_item(block, pos, key_idx, content_idx, &inline_key);
    }
}

/// Collect items `[start, end)` as owned `(key_idx, content_idx, inline_key)`
/// tuples, for handing to [`repack_into`] on a different block.
pub fn collect_items(block: &[u8], start: usize, end: usize) -> Vec<(StringIndex, u32, Vec<u8>)> {
    (start..end)
        .map(|i| {
            let item = item_at(block, i);
            (
                item.key_idx,
                item.content_idx,
                inline_key_bytes(block, i).to_vec(),
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
