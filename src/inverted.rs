// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! In-memory inverted index: whitespace-tokenized term -> sorted posting
//! list of entity ids, plus the `Term`/`And` query AST evaluated over it.
//!
//! Rebuilt from scratch on every open by replaying the write-ahead log
//! (see DESIGN.md, Open Question 1) rather than persisted — there is no
//! on-disk format for it at all.

use std::collections::HashMap;

/// A query against the inverted index.
pub enum Query {
    Term(Term),
    And(Box<Query>, Box<Query>),
}

/// Matches entities whose content contains `term` as a whitespace-split
/// token.
pub struct Term {
    pub term: Vec<u8>,
}

impl Query {
    pub fn term(term: impl Into<Vec<u8>>) -> Self {
        Query::Term(Term { term: term.into() })
    }

    pub fn and(self, other: Query) -> Self {
        Query::And(Box::new(self), Box::new(other))
    }

    /// Fold a list of terms into a single right-associative `And` query,
    /// matching the way the command interpreter builds one term at a
    /// time from the tail of its argument list forward.
    pub fn and_all<I>(terms: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec<u8>>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut iter = terms.into_iter().rev();
        let mut query = Query::Term(Term { term: iter.next()? });
        for term in iter {
            query = Query::And(Box::new(Query::Term(Term { term })), Box::new(query));
        }
        Some(query)
    }
}

/// Postings for a single term: entity ids in sorted, de-duplicated
/// order.
#[derive(Debug, Default, Clone)]
struct PostingList {
    ids: Vec<Vec<u8>>,
}

impl PostingList {
    fn add(&mut self, id: &[u8]) {
        match self.ids.binary_search_by(|existing| existing.as_slice().cmp(id)) {
            Ok(_) => {}
            Err(pos) => self.ids.insert(pos, id.to_vec()),
        }
    }

    /// Sorted linear-merge intersection of two posting lists.
    fn intersect(&self, other: &PostingList) -> Vec<Vec<u8>> {
        let mut result = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ids.len() && j < other.ids.len() {
            match self.ids[i].cmp(&other.ids[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    result.push(self.ids[i].clone());
                    i += 1;
                    j += 1;
                }
            }
        }
        result
    }
}

/// Term -> posting list map, and the tokenizer that populates it.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<Vec<u8>, PostingList>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize `content` on ASCII whitespace and add `id` to every
    /// resulting term's posting list.
    pub fn index(&mut self, id: &[u8], content: &[u8]) {
        for token in content.split(|b| b.is_ascii_whitespace()).filter(|t| !t.is_empty()) {
            self.postings.entry(token.to_vec()).or_default().add(id);
        }
    }

    fn postings_for(&self, term: &[u8]) -> Vec<Vec<u8>> {
        self.postings
            .get(term)
            .map(|list| list.ids.clone())
            .unwrap_or_default()
    }

    /// Evaluate `query`, returning matching entity ids in sorted order.
    pub fn evaluate(&self, query: &Query) -> Vec<Vec<u8>> {
        match query {
            Query::Term(Term { term }) => self.postings_for(term),
            Query::And(left, right) => {
                let left_list = PostingList {
                    ids: self.evaluate(left),
                };
                let right_list = PostingList {
                    ids: self.evaluate(right),
                };
                left_list.intersect(&right_list)
            }
        }
    }
}

#[cfg(test)]
#[path = "inverted_test.rs"]
mod inverted_test;
