// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Memory-mapped B+-tree forward index: id -> content, keyed by entity id.

pub mod cursor;
pub mod file;
pub mod node;
pub mod page;
pub mod tree;
pub mod types;
pub mod visitor;

pub use tree::BTreeForwardIndex;
pub use types::{BTreeConfig, KeyCmp, NodeIndex, NodeType};
