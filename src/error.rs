// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Error types for entitydb.
//!
//! One variant per error kind the core must distinguish: I/O failure,
//! on-disk corruption, a duplicate entity on `add`, a malformed command,
//! a parser failure, and a precondition violation (programmer error
//! against a well-formed tree that should never occur in practice).

use std::fmt;

/// entitydb error type.
#[derive(Debug)]
pub enum ReedError {
    /// Failure of an underlying file primitive (open, read, write, mmap, resize).
    Io {
        /// Name of the operation that failed, e.g. `"open_wal"`.
        operation: String,
        reason: String,
    },

    /// Log record with a non-increasing seqid, a truncated record, or an
    /// unreadable / checksum-mismatched block.
    Corruption { reason: String },

    /// Attempted to `add` an id already present in the forward index.
    EntityExists { id: Vec<u8> },

    /// Wrong arity, unknown verb, empty command, or wrong argument kind.
    Command { reason: String },

    /// Unterminated list, unterminated string, or empty input to the parser.
    Parse { reason: String },

    /// An internal invariant was violated (node overflow, bad index).
    /// Should not occur against well-formed inputs.
    Precondition { reason: String },
}

impl fmt::Display for ReedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReedError::Io { operation, reason } => {
                write!(f, "I/O error during {operation}: {reason}")
            }
            ReedError::Corruption { reason } => write!(f, "corruption: {reason}"),
            ReedError::EntityExists { id } => {
                write!(f, "Entity exists: {}", String::from_utf8_lossy(id))
            }
            ReedError::Command { reason } => write!(f, "{reason}"),
            ReedError::Parse { reason } => write!(f, "{reason}"),
            ReedError::Precondition { reason } => write!(f, "precondition violation: {reason}"),
        }
    }
}

impl std::error::Error for ReedError {}

/// Convenience alias used throughout the crate.
pub type ReedResult<T> = Result<T, ReedError>;

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;
