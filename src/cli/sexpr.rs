// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Tokenizer and recursive-descent parser for the command language's
//! S-expression subset: lists, bare symbols, and double-quoted strings
//! with no escape handling.
//!
//! A bare `"` toggles string mode; `(`, `)` and whitespace are
//! structural delimiters outside of a string and ordinary characters
//! inside one.

use crate::error::{ReedError, ReedResult};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SExpr {
    List(Vec<SExpr>),
    Symbol(String),
    Str(String),
}

fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut in_string = false;

    for c in input.chars() {
        if c == '"' {
            buf.push(c);
            in_string = !in_string;
            continue;
        }
        if in_string {
            buf.push(c);
            continue;
        }
        match c {
            '(' | ')' => {
                if !buf.is_empty() {
                    tokens.push(std::mem::take(&mut buf));
                }
                tokens.push(c.to_string());
            }
            c if c.is_whitespace() => {
                if !buf.is_empty() {
                    tokens.push(std::mem::take(&mut buf));
                }
            }
            _ => buf.push(c),
        }
    }
    if !buf.is_empty() {
        tokens.push(buf);
    }
    tokens
}

fn parse_one(tokens: &mut VecDeque<String>) -> ReedResult<SExpr> {
    let token = tokens.pop_front().ok_or_else(|| ReedError::Parse {
        reason: "unexpected end of input".to_string(),
    })?;

    match token.as_str() {
        "(" => {
            let mut items = Vec::new();
            loop {
                match tokens.front() {
                    None => {
                        return Err(ReedError::Parse {
                            reason: "unterminated list".to_string(),
                        })
                    }
                    Some(t) if t == ")" => {
                        tokens.pop_front();
                        break;
                    }
                    _ => items.push(parse_one(tokens)?),
                }
            }
            Ok(SExpr::List(items))
        }
        ")" => Err(ReedError::Parse {
            reason: "unexpected ')'".to_string(),
        }),
        _ if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') => {
            Ok(SExpr::Str(token[1..token.len() - 1].to_string()))
        }
        _ if token.starts_with('"') => Err(ReedError::Parse {
            reason: format!("unterminated string: {token}"),
        }),
        _ => Ok(SExpr::Symbol(token)),
    }
}

/// Parse exactly one S-expression from `input`. Trailing tokens after
/// the first complete expression are ignored, matching one-line-per-form
/// REPL usage.
pub fn parse(input: &str) -> ReedResult<SExpr> {
    let mut tokens: VecDeque<String> = tokenize(input).into();
    parse_one(&mut tokens)
}

#[cfg(test)]
#[path = "sexpr_test.rs"]
mod sexpr_test;
