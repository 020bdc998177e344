// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Append-only string pool backing entity ids and content.
//!
//! Entries are stored NUL-terminated and addressed by a 32-bit byte
//! offset (`StringIndex`). An offset, once returned by [`StringPool::append`],
//! never moves or expires for the lifetime of the pool: the pool only ever
//! grows, and growth reallocates without touching already-written bytes.

/// Offset into the string pool's backing arena.
pub type StringIndex = u32;

/// Append-only byte arena storing NUL-terminated strings.
///
/// Capacity grows by doubling (`max(2 * capacity, needed)`), which bounds
/// the amortised cost of `append` the same way `Vec::push` is amortised
/// O(1).
#[derive(Debug, Clone)]
pub struct StringPool {
    data: Vec<u8>,
    free_idx: usize,
}

impl StringPool {
    /// Initial capacity for a freshly created pool.
    const INITIAL_CAPACITY: usize = 1024;

    /// Create an empty pool.
    pub fn new() -> Self {
        Self {
            data: vec![0u8; Self::INITIAL_CAPACITY],
            free_idx: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn grow_to_fit(&mut self, needed_from_free: usize) {
        let fit = self.free_idx + needed_from_free;
        let new_capacity = (2 * self.capacity()).max(fit);
        self.data.resize(new_capacity, 0);
    }

    /// Append `bytes` followed by a NUL terminator; return the offset the
    /// bytes were written at.
    ///
    /// `bytes` itself must not contain an embedded NUL byte, since
    /// [`StringPool::get`] reads up to the first NUL it finds.
    pub fn append(&mut self, bytes: &[u8]) -> StringIndex {
        let needed = bytes.len() + 1;
        if needed > self.capacity() - self.free_idx {
            self.grow_to_fit(needed);
        }

        let insert_at = self.free_idx;
        self.data[insert_at..insert_at + bytes.len()].copy_from_slice(bytes);
        self.data[insert_at + bytes.len()] = 0;
        self.free_idx += needed;

        insert_at as StringIndex
    }

    /// Return the NUL-terminated byte string starting at `offset`.
    ///
    /// # Panics
    /// Panics if `offset` is out of bounds or no NUL terminator is found —
    /// both indicate a corrupted pool or a bad caller-supplied index, never
    /// a normal runtime condition.
    pub fn get(&self, offset: StringIndex) -> &[u8] {
        let start = offset as usize;
        let end = self.data[start..]
            .iter()
            .position(|&b| b == 0)
            .map(|rel| start + rel)
            .expect("string pool entry missing NUL terminator");
        &self.data[start..end]
    }

    /// Number of live bytes written so far (excludes unused capacity).
    pub fn len(&self) -> usize {
        self.free_idx
    }

    /// True when nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.free_idx == 0
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod pool_test;
