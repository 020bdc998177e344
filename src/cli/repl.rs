// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Interactive REPL: one S-expression per line, dispatched through
//! [`super::interpreter`]. Parse and command errors are reported and do
//! not stop the loop; I/O, corruption and precondition failures are not
//! recoverable at this level and propagate out of [`run`] instead,
//! ending the process. Only `(exit)`, EOF, or a `rustyline` read error
//! otherwise stops the loop.

use super::interpreter::{self, Outcome};
use super::sexpr;
use crate::db::Database;
use crate::error::{ReedError, ReedResult};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "ii> ";

pub fn run(db: &mut Database) -> ReedResult<()> {
    let mut rl = DefaultEditor::new().map_err(readline_err)?;

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match run_line(db, trimmed) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(LineError::Recoverable(message)) => println!("{message}"),
                    Err(LineError::Fatal(err)) => return Err(err),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(readline_err(err)),
        }
    }

    Ok(())
}

/// An error produced while running one line: either reported to the
/// user with a `PARSE ERROR`/`COMMAND ERROR` prefix while the REPL keeps
/// going, or fatal, in which case the REPL stops and propagates it.
#[derive(Debug)]
enum LineError {
    Recoverable(String),
    Fatal(ReedError),
}

/// Run one line. Returns `Ok(true)` if the REPL should stop (`(exit)`),
/// `Ok(false)` to keep going, or `Err` describing what went wrong.
fn run_line(db: &mut Database, line: &str) -> Result<bool, LineError> {
    let expr = sexpr::parse(line)
        .map_err(|e| LineError::Recoverable(format_error("PARSE ERROR", &e)))?;
    let outcome = interpreter::interpret(db, &expr).map_err(classify)?;

    match outcome {
        Outcome::Silent | Outcome::NotFound => {}
        Outcome::Content(content) => println!("{}", String::from_utf8_lossy(&content)),
        Outcome::QueryResults(ids) => {
            for id in ids {
                println!("{}", String::from_utf8_lossy(&id));
            }
        }
        Outcome::Exit => return Ok(true),
    }
    Ok(false)
}

/// `Command`/`Parse` errors from the interpreter are malformed input and
/// get reported inline; everything else (I/O, corruption, precondition
/// violations) means the store itself is no longer trustworthy and must
/// end the session.
fn classify(error: ReedError) -> LineError {
    match error {
        ReedError::Command { .. } | ReedError::Parse { .. } => {
            LineError::Recoverable(format_error("COMMAND ERROR", &error))
        }
        fatal => LineError::Fatal(fatal),
    }
}

fn format_error(prefix: &str, error: &ReedError) -> String {
    format!("{prefix} {error}")
}

fn readline_err(err: ReadlineError) -> ReedError {
    ReedError::Io {
        operation: "repl".to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
#[path = "repl_test.rs"]
mod repl_test;
