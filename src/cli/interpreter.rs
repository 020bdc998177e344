// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Dispatches a parsed [`SExpr`] to the database, matching command and
//! arity against the fixed command taxonomy: `exit/0`, `add/2`,
//! `query/>=1`, `get/1`.

use super::sexpr::SExpr;
use crate::db::Database;
use crate::error::{ReedError, ReedResult};
use crate::inverted::Query;

/// Result of interpreting one command, already shaped for the REPL to
/// print without further branching on the command that produced it.
#[derive(Debug)]
pub enum Outcome {
    /// Command succeeded and prints nothing (`add`).
    Silent,
    /// Prints `content` followed by a newline (`get` on a present id).
    Content(Vec<u8>),
    /// `get` on a missing id: prints nothing.
    NotFound,
    /// `query` results, one id per line, already sorted ascending.
    QueryResults(Vec<Vec<u8>>),
    /// `exit`: the REPL loop must stop.
    Exit,
}

pub fn interpret(db: &mut Database, expr: &SExpr) -> ReedResult<Outcome> {
    let SExpr::List(items) = expr else {
        return Err(ReedError::Command {
            reason: "expected a command list".to_string(),
        });
    };

    let Some(SExpr::Symbol(command)) = items.first() else {
        return Err(ReedError::Command {
            reason: "expected a command symbol".to_string(),
        });
    };

    let args = &items[1..];

    match (command.as_str(), args.len()) {
        ("exit", 0) => Ok(Outcome::Exit),
        ("add", 2) => add(db, args),
        ("get", 1) => get(db, args),
        ("query", n) if n >= 1 => query(db, args),
        _ => Err(ReedError::Command {
            reason: format!("unknown command: {command}"),
        }),
    }
}

fn expect_str<'a>(expr: &'a SExpr, what: &str) -> ReedResult<&'a str> {
    match expr {
        SExpr::Str(s) => Ok(s.as_str()),
        _ => Err(ReedError::Command {
            reason: format!("expected a string for {what}"),
        }),
    }
}

fn add(db: &mut Database, args: &[SExpr]) -> ReedResult<Outcome> {
    let id = expect_str(&args[0], "id")?;
    let content = expect_str(&args[1], "content")?;

    match db.add(id.as_bytes(), content.as_bytes()) {
        Ok(()) => Ok(Outcome::Silent),
        Err(ReedError::EntityExists { .. }) => Err(ReedError::Command {
            reason: "Entity exists".to_string(),
        }),
        Err(other) => Err(other),
    }
}

fn get(db: &mut Database, args: &[SExpr]) -> ReedResult<Outcome> {
    let id = expect_str(&args[0], "id")?;
    match db.get(id.as_bytes()) {
        Some(content) => Ok(Outcome::Content(content.to_vec())),
        None => Ok(Outcome::NotFound),
    }
}

fn query(db: &mut Database, args: &[SExpr]) -> ReedResult<Outcome> {
    let mut terms = Vec::with_capacity(args.len());
    for arg in args {
        terms.push(expect_str(arg, "query term")?.as_bytes().to_vec());
    }
    let query = Query::and_all(terms).expect("arity >= 1 guarantees at least one term");
    Ok(Outcome::QueryResults(db.query(&query)))
}

#[cfg(test)]
#[path = "interpreter_test.rs"]
mod interpreter_test;
