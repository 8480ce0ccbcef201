// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::Parser;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use session_bot_rs::{
    ApproveAll, Bot, Catalog, CatalogItem, ConsoleTransport, FileCipher, Input, StaticDirectory,
    UserId,
};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Session Bot - Replay conversation scripts against the shop bot
///
/// Loads a session catalog, then feeds a CSV of inbound user events
/// through the conversation engine, printing every prompt and file
/// delivery to stdout.
#[derive(Parser, Debug)]
#[command(name = "session-bot-rs")]
#[command(about = "A shop bot that sells encrypted session files", long_about = None)]
struct Args {
    /// Path to CSV file with inbound events
    ///
    /// Expected format: user,input
    /// Example: cargo run -- events.csv --catalog catalog.csv
    #[arg(value_name = "EVENTS")]
    events: PathBuf,

    /// Path to the catalog CSV (item,price,file)
    #[arg(long, value_name = "FILE")]
    catalog: PathBuf,

    /// User ID with admin privileges (repeatable)
    #[arg(long = "admin", value_name = "ID")]
    admins: Vec<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args = Args::parse();

    // Load the catalog. Any malformed row aborts startup.
    let catalog_file = match File::open(&args.catalog) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening catalog '{}': {}", args.catalog.display(), e);
            process::exit(1);
        }
    };
    let catalog = match load_catalog(BufReader::new(catalog_file)) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error loading catalog: {}", e);
            process::exit(1);
        }
    };

    let bot = Bot::new(
        catalog,
        FileCipher::new(),
        Box::new(StaticDirectory::new(args.admins.into_iter().map(UserId))),
        Box::new(ApproveAll),
        Box::new(ConsoleTransport),
    );

    // Replay events
    let events_file = match File::open(&args.events) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening events '{}': {}", args.events.display(), e);
            process::exit(1);
        }
    };
    if let Err(e) = replay_events(&bot, BufReader::new(events_file)) {
        eprintln!("Error processing events: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record describing one catalog item.
///
/// Fields: `item, price, file`
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    item: String,
    price: u32,
    file: PathBuf,
}

/// Loads the catalog from a CSV reader.
///
/// Unlike event replay, catalog loading is strict: a malformed row, a
/// non-positive price, or a duplicate item ID is a startup error.
///
/// # CSV Format
///
/// ```csv
/// item,price,file
/// session1.txt,10,data/session1.txt
/// session2.txt,15,data/session2.txt
/// ```
pub fn load_catalog<R: Read>(reader: R) -> Result<Catalog, Box<dyn std::error::Error>> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);

    let mut items = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for result in rdr.deserialize::<CatalogRecord>() {
        let record = result?;
        if record.price == 0 {
            return Err(format!("item '{}' has zero price", record.item).into());
        }
        if !seen.insert(record.item.clone()) {
            return Err(format!("duplicate item '{}'", record.item).into());
        }
        items.push(CatalogItem {
            id: record.item.into(),
            price: record.price,
            file: record.file,
        });
    }

    Ok(Catalog::new(items))
}

/// Raw CSV record matching the event script format.
///
/// Fields: `user, input`
#[derive(Debug, Deserialize)]
struct EventRecord {
    user: u64,
    input: String,
}

/// Feeds events from a CSV reader through the bot.
///
/// Uses streaming parsing, so scripts of any length are handled
/// without loading the whole file. Malformed rows are skipped; the
/// conversation engine handles every well-formed input itself.
///
/// # CSV Format
///
/// ```csv
/// user,input
/// 1,hello
/// 1,Buy Session
/// 1,session1.txt
/// 1,Confirm
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is
/// invalid.
pub fn replay_events<R: Read>(bot: &Bot, reader: R) -> Result<(), csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<EventRecord>() {
        match result {
            Ok(record) => {
                bot.handle(UserId(record.user), Input::parse(&record.input));
            }
            Err(e) => {
                // Skip malformed rows
                #[cfg(debug_assertions)]
                eprintln!("Skipping malformed row: {}", e);
                continue;
            }
        }
    }

    Ok(())
}
