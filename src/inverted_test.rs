// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn single_term_query_finds_matching_entities() {
    let mut idx = InvertedIndex::new();
    idx.index(b"1", b"the quick brown fox");
    idx.index(b"2", b"the lazy dog");

    let results = idx.evaluate(&Query::term(b"the".to_vec()));
    assert_eq!(results, vec![b"1".to_vec(), b"2".to_vec()]);
}

#[test]
fn and_query_intersects_postings() {
    let mut idx = InvertedIndex::new();
    idx.index(b"1", b"quick brown fox");
    idx.index(b"2", b"quick lazy dog");
    idx.index(b"3", b"brown bear");

    let results = idx.evaluate(&Query::term(b"quick".to_vec()).and(Query::term(b"brown".to_vec())));
    assert_eq!(results, vec![b"1".to_vec()]);
}

#[test]
fn unknown_term_yields_empty_results() {
    let idx = InvertedIndex::new();
    assert!(idx.evaluate(&Query::term(b"nothing".to_vec())).is_empty());
}

#[test]
fn indexing_same_entity_twice_does_not_duplicate_posting() {
    let mut idx = InvertedIndex::new();
    idx.index(b"1", b"quick quick quick");
    let results = idx.evaluate(&Query::term(b"quick".to_vec()));
    assert_eq!(results, vec![b"1".to_vec()]);
}

#[test]
fn and_all_folds_terms_right_associatively_and_intersects_correctly() {
    let mut idx = InvertedIndex::new();
    idx.index(b"1", b"alpha beta gamma");
    idx.index(b"2", b"alpha beta");
    idx.index(b"3", b"alpha gamma");

    let query = Query::and_all(vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()]).unwrap();
    let results = idx.evaluate(&query);
    assert_eq!(results, vec![b"1".to_vec()]);
}

#[test]
fn and_all_of_empty_list_is_none() {
    assert!(Query::and_all(Vec::<Vec<u8>>::new()).is_none());
}
