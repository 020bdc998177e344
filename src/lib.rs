// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! entitydb: a single-node searchable entity store.
//!
//! An entity is an `(id, content)` pair. Writes go through an
//! append-only write-ahead log before reaching either index: a
//! memory-mapped B+-tree forward index (`id -> content`) and an
//! in-memory inverted index (whitespace term -> sorted posting list)
//! used to answer conjunctive queries.

pub mod cli;
pub mod db;
pub mod error;
pub mod inverted;
pub mod store;
pub mod wal;

pub use db::Database;
pub use error::{ReedError, ReedResult};

/// Crate version, exposed for `--version` output and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
