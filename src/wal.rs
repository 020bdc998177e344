// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Write-ahead log: the durable record of every successful `add`.
//!
//! Each record is a fixed binary frame:
//!
//! ```text
//! seqid (u32, LE) | id_size (u32, LE) | content_size (u32, LE) | id bytes | content bytes
//! ```
//!
//! Little-endian, unlike the big-endian node blocks — the two formats
//! are independent and this one follows the byte order the log format
//! was originally specified with. Appends are flushed to the OS but
//! never `fsync`ed: the log survives a crashed process, not a power
//! loss mid-write. A replay that hits a truncated record at the tail
//! (the torn write a crash leaves behind) stops there and discards it,
//! rather than treating it as corruption.

use crate::error::{ReedError, ReedResult};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

const RECORD_HEADER_SIZE: usize = 12;

/// One durable add: the sequence id assigned at write time plus the
/// entity id and content bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOp {
    pub seqid: u32,
    pub id: Vec<u8>,
    pub content: Vec<u8>,
}

#[derive(Debug)]
pub struct WriteAheadLog {
    path: PathBuf,
    file: File,
    last_seqid: u32,
}

impl WriteAheadLog {
    /// Open (creating if absent) the log at `path`, replay every
    /// complete record in it, and return both the log (positioned to
    /// append further records) and the replayed ops in order.
    ///
    /// If the file ends in a partial record — the torn tail a crash
    /// leaves mid-write — that partial record is discarded and the file
    /// is truncated to the last complete record, so a subsequent append
    /// doesn't leave garbage ahead of it.
    pub fn open_and_replay<P: AsRef<Path>>(path: P) -> ReedResult<(Self, Vec<AddOp>)> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)
            .map_err(|e| io_err("open_wal", e))?;

        let mut ops = Vec::new();
        let mut last_seqid = 0u32;
        let mut good_up_to: u64 = 0;

        loop {
            let record_start = good_up_to;
            match read_record(&mut file)? {
                None => break,
                Some(record) => {
                    if record.seqid <= last_seqid {
                        return Err(ReedError::Corruption {
                            reason: format!(
                                "write-ahead log seqid out of order: {} after {}",
                                record.seqid, last_seqid
                            ),
                        });
                    }
                    last_seqid = record.seqid;
                    good_up_to = record_start
                        + RECORD_HEADER_SIZE as u64
                        + record.id.len() as u64
                        + record.content.len() as u64;
                    ops.push(record);
                }
            }
        }

        file.set_len(good_up_to).map_err(|e| io_err("truncate_wal_tail", e))?;
        file.seek(SeekFrom::Start(good_up_to))
            .map_err(|e| io_err("seek_wal_append_point", e))?;

        Ok((
            Self {
                path,
                file,
                last_seqid,
            },
            ops,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The seqid the next [`Self::append`] must use.
    pub fn next_seqid(&self) -> u32 {
        self.last_seqid + 1
    }

    /// Append one record. `seqid` must be exactly [`Self::next_seqid`] —
    /// seqids are assigned by the caller (the database facade) so that
    /// the same seqid used in the log also gets applied to the in-memory
    /// index, keeping the two in lockstep.
    pub fn append(&mut self, seqid: u32, id: &[u8], content: &[u8]) -> ReedResult<()> {
        if seqid != self.next_seqid() {
            return Err(ReedError::Precondition {
                reason: format!(
                    "write-ahead log append out of order: expected seqid {}, got {seqid}",
                    self.next_seqid()
                ),
            });
        }

        self.file
            .seek(SeekFrom::End(0))
            .map_err(|e| io_err("seek_wal_end", e))?;
        self.file
            .write_all(&seqid.to_le_bytes())
            .map_err(|e| io_err("write_wal_seqid", e))?;
        self.file
            .write_all(&(id.len() as u32).to_le_bytes())
            .map_err(|e| io_err("write_wal_id_size", e))?;
        self.file
            .write_all(&(content.len() as u32).to_le_bytes())
            .map_err(|e| io_err("write_wal_content_size", e))?;
        self.file.write_all(id).map_err(|e| io_err("write_wal_id", e))?;
        self.file
            .write_all(content)
            .map_err(|e| io_err("write_wal_content", e))?;
        self.file.flush().map_err(|e| io_err("flush_wal", e))?;

        self.last_seqid = seqid;
        Ok(())
    }
}

fn io_err(operation: &str, e: io::Error) -> ReedError {
    ReedError::Io {
        operation: operation.to_string(),
        reason: e.to_string(),
    }
}

/// Read one record from the current file position. Returns `None` on a
/// clean EOF (nothing left to read) or a torn tail (a header or body
/// truncated mid-write by a crash) — both are end-of-log as far as
/// replay is concerned.
fn read_record(file: &mut File) -> ReedResult<Option<AddOp>> {
    let mut header = [0u8; RECORD_HEADER_SIZE];
    match file.read_exact(&mut header) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(io_err("read_wal_header", e)),
    }

    let seqid = u32::from_le_bytes(header[0..4].try_into().unwrap());
    let id_size = u32::from_le_bytes(header[4..8].try_into().unwrap()) as usize;
    let content_size = u32::from_le_bytes(header[8..12].try_into().unwrap()) as usize;

    let mut id = vec![0u8; id_size];
    let mut content = vec![0u8; content_size];
    match file
        .read_exact(&mut id)
        .and_then(|_| file.read_exact(&mut content))
    {
        Ok(()) => Ok(Some(AddOp { seqid, id, content })),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(io_err("read_wal_body", e)),
    }
}

#[cfg(test)]
#[path = "wal_test.rs"]
mod wal_test;
