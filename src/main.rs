// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! entitydb CLI: opens (or creates) a database and drops into the
//! interactive S-expression REPL.

use clap::Parser;
use entitydb::db::Database;
use entitydb::store::btree::BTreeConfig;
use entitydb::{cli, ReedResult};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "entitydb")]
#[command(author = "Vivian Voss <ask@vvoss.dev>")]
#[command(version = entitydb::VERSION)]
#[command(about = "Single-node searchable entity store", long_about = None)]
struct Cli {
    /// Directory holding the write-ahead log and forward-index file.
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// B+-tree node block size, in bytes.
    #[arg(long, default_value_t = 4096)]
    block_size: u32,

    /// Maximum inline key length stored per node item before falling
    /// back to the string pool for comparisons.
    #[arg(long, default_value_t = 128)]
    max_inner_key_length: u16,

    /// Log level passed to env_logger (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print an indented dump of the forward index's tree structure and
    /// exit, instead of starting the REPL.
    #[arg(long)]
    dump_tree: bool,
}

fn main() -> ReedResult<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level.clone()),
    )
    .init();

    let config = BTreeConfig::new(cli.block_size, cli.max_inner_key_length)?;
    let mut db = Database::open(&cli.data_dir, config)?;

    if cli.dump_tree {
        print!("{}", db.dump_tree());
        return Ok(());
    }

    println!("entitydb {}", entitydb::VERSION);
    println!("data dir: {}", cli.data_dir.display());
    println!("{} entities loaded\n", db.len());

    cli::repl::run(&mut db)
}
