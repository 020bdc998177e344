// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The database facade: ties the write-ahead log, the B+-tree forward
//! index and the inverted index together behind `add`/`get`/`query`.
//!
//! Both indexes are rebuilt from the log on [`Database::open`] — see
//! DESIGN.md's note on why the tree is treated as an ephemeral cache
//! rather than something with its own crash-recovery story. `add`
//! writes to the log before applying to either index, so a crash
//! between the two always leaves work that replay will redo, never
//! work that's missing.

use crate::error::{ReedError, ReedResult};
use crate::inverted::{InvertedIndex, Query};
use crate::store::btree::{BTreeConfig, BTreeForwardIndex};
use crate::wal::WriteAheadLog;
use std::path::{Path, PathBuf};

pub struct Database {
    data_dir: PathBuf,
    forward_index: BTreeForwardIndex,
    wal: WriteAheadLog,
    inverted: InvertedIndex,
}

impl Database {
    /// Open (or create) the database rooted at `data_dir`, replaying its
    /// write-ahead log to repopulate both indexes.
    pub fn open<P: AsRef<Path>>(data_dir: P, config: BTreeConfig) -> ReedResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir).map_err(|e| ReedError::Io {
            operation: "create_data_dir".to_string(),
            reason: e.to_string(),
        })?;

        let (wal, ops) = WriteAheadLog::open_and_replay(data_dir.join("log"))?;
        let mut forward_index = BTreeForwardIndex::create_truncated(data_dir.join("tree"), config)?;
        let mut inverted = InvertedIndex::new();

        for op in ops {
            forward_index.insert(&op.id, &op.content)?;
            inverted.index(&op.id, &op.content);
        }

        log::info!(
            "opened database at {:?} with {} entities replayed from log",
            data_dir,
            forward_index.len()
        );

        Ok(Self {
            data_dir,
            forward_index,
            wal,
            inverted,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Add a new entity. Rejects ids that already exist — this store has
    /// no update-in-place operation, only add and get.
    pub fn add(&mut self, id: &[u8], content: &[u8]) -> ReedResult<()> {
        if self.forward_index.contains(id) {
            return Err(ReedError::EntityExists { id: id.to_vec() });
        }

        let seqid = self.wal.next_seqid();
        self.wal.append(seqid, id, content)?;
        self.forward_index.insert(id, content)?;
        self.inverted.index(id, content);

        log::debug!("added entity {:?} (seqid {seqid})", String::from_utf8_lossy(id));
        Ok(())
    }

    /// Fetch the content of entity `id`, if present.
    pub fn get(&self, id: &[u8]) -> Option<&[u8]> {
        self.forward_index.get(id)
    }

    /// Evaluate a term/and query over indexed content.
    pub fn query(&self, query: &Query) -> Vec<Vec<u8>> {
        self.inverted.evaluate(query)
    }

    pub fn len(&self) -> u64 {
        self.forward_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward_index.is_empty()
    }

    /// Render the forward index as indented text, for the `--dump-tree`
    /// debug flag.
    pub fn dump_tree(&self) -> String {
        self.forward_index.dump()
    }
}

#[cfg(test)]
#[path = "db_test.rs"]
mod db_test;
