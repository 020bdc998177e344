// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Fixed-size block framing shared by every B+-tree node.
//!
//! ## Block layout
//! ```text
//! Offset | Size | Field
//! -------|------|-------
//! 0      | 4    | magic (BLOCK_MAGIC)
//! 4      | 4    | checksum (CRC32 of bytes [8, block_size))
//! 8      | 1    | node_type (NodeType as u8)
//! 9      | 1    | _reserved
//! 10     | 2    | num_items (u16, big-endian)
//! 12     | 4    | next_idx (u32, big-endian)
//! 16     | 2    | inner_key_data_start (u16, big-endian)
//! 18     | 4    | update_seqid (u32, big-endian)
//! 22     | ...  | item array, growing up
//! ...    | ...  | inline-key heap, growing down from block_size
//! ```
//!
//! Fields after the checksum are exactly the node header of the
//! specification; the magic/checksum pair is page framing layered under
//! it so a truncated or corrupted block is detected on read rather than
//! silently misinterpreted.

use super::types::{BLOCK_MAGIC, NodeType};
use crate::error::{ReedError, ReedResult};

/// Size of the fixed block header (magic + checksum + node header).
pub const HEADER_SIZE: usize = 22;

/// Size of a single item descriptor in the item array.
pub const ITEM_SIZE: usize = 12;

/// Node header fields, decoded from a block's first [`HEADER_SIZE`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHeader {
    pub node_type: NodeType,
    pub num_items: u16,
    pub next_idx: u32,
    pub inner_key_data_start: u16,
    pub update_seqid: u32,
}

/// Initialise a freshly allocated block in place as an empty node of
/// `node_type`.
pub fn init_block(block: &mut [u8], node_type: NodeType, next_idx: u32) {
    let block_size = block.len();
    block[0..4].copy_from_slice(&BLOCK_MAGIC.to_be_bytes());
    block[8] = node_type as u8;
    block[9] = 0;
    block[10..12].copy_from_slice(&0u16.to_be_bytes());
    block[12..16].copy_from_slice(&next_idx.to_be_bytes());
    block[16..18].copy_from_slice(&(block_size as u16).to_be_bytes());
    block[18..22].copy_from_slice(&0u32.to_be_bytes());
    write_checksum(block);
}

/// Decode and validate the header of `block`.
///
/// Checks the magic number and the CRC32 checksum over the payload
/// (everything past the checksum field itself).
pub fn read_header(block: &[u8]) -> ReedResult<NodeHeader> {
    if block.len() < HEADER_SIZE {
        return Err(ReedError::Corruption {
            reason: format!("block too small: {} bytes", block.len()),
        });
    }

    let magic = u32::from_be_bytes(block[0..4].try_into().unwrap());
    if magic != BLOCK_MAGIC {
        return Err(ReedError::Corruption {
            reason: format!("bad block magic: 0x{magic:X}"),
        });
    }

    let stored_checksum = u32::from_be_bytes(block[4..8].try_into().unwrap());
    let computed_checksum = crc32fast::hash(&block[8..]);
    if stored_checksum != computed_checksum {
        return Err(ReedError::Corruption {
            reason: format!(
                "checksum mismatch: expected 0x{stored_checksum:X}, computed 0x{computed_checksum:X}"
            ),
        });
    }

    let node_type = NodeType::from_byte(block[8])?;
    let num_items = u16::from_be_bytes(block[10..12].try_into().unwrap());
    let next_idx = u32::from_be_bytes(block[12..16].try_into().unwrap());
    let inner_key_data_start = u16::from_be_bytes(block[16..18].try_into().unwrap());
    let update_seqid = u32::from_be_bytes(block[18..22].try_into().unwrap());

    Ok(NodeHeader {
        node_type,
        num_items,
        next_idx,
        inner_key_data_start,
        update_seqid,
    })
}

/// Decode the header without checking magic or checksum.
///
/// For use inside node-mutation routines that already hold a block they
/// trust (just read via [`read_header`], or freshly initialised via
/// [`init_block`]) and need to re-read fields between several writes
/// without paying for a CRC32 pass each time. Never use this on a block
/// whose provenance hasn't already been validated once.
pub(crate) fn read_header_unchecked(block: &[u8]) -> NodeHeader {
    NodeHeader {
        node_type: NodeType::from_byte(block[8]).expect("unchecked header read on invalid block"),
        num_items: u16::from_be_bytes(block[10..12].try_into().unwrap()),
        next_idx: u32::from_be_bytes(block[12..16].try_into().unwrap()),
        inner_key_data_start: u16::from_be_bytes(block[16..18].try_into().unwrap()),
        update_seqid: u32::from_be_bytes(block[18..22].try_into().unwrap()),
    }
}

pub fn write_node_type(block: &mut [u8], node_type: NodeType) {
    block[8] = node_type as u8;
}

pub fn write_num_items(block: &mut [u8], num_items: u16) {
    block[10..12].copy_from_slice(&num_items.to_be_bytes());
}

pub fn write_next_idx(block: &mut [u8], next_idx: u32) {
    block[12..16].copy_from_slice(&next_idx.to_be_bytes());
}

pub fn write_inner_key_data_start(block: &mut [u8], start: u16) {
    block[16..18].copy_from_slice(&start.to_be_bytes());
}

pub fn write_update_seqid(block: &mut [u8], seqid: u32) {
    block[18..22].copy_from_slice(&seqid.to_be_bytes());
}

/// Recompute and store the CRC32 checksum over the block's payload.
///
/// Must be called after any mutation to the block before it is read back
/// through [`read_header`] (or before the page is persisted at all, for
/// tooling that validates on every open).
pub fn write_checksum(block: &mut [u8]) {
    let checksum = crc32fast::hash(&block[8..]);
    block[4..8].copy_from_slice(&checksum.to_be_bytes());
}

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;
