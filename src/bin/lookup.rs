// src/bin/lookup.rs
//
// Browse a previously exported workbook: substring search and per-player
// detail. Read-only; rebuilds its index from disk on every invocation.

use std::env;
use std::path::PathBuf;

use rts_scrape::lookup::PlayerIndex;
use rts_scrape::params::{DEFAULT_OUT_DIR, DEFAULT_WORKBOOK};

const USAGE: &str = "Usage: lookup [-d <workbook-dir>] [search <query> | detail <player> | list]";

fn main() {
    let _ = color_eyre::install();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut dir = PathBuf::from(DEFAULT_OUT_DIR).join(DEFAULT_WORKBOOK);
    let mut rest: Vec<String> = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "-d" | "--dir" => dir = PathBuf::from(args.next().ok_or("Missing value for --dir")?),
            "-h" | "--help" => {
                eprintln!("{USAGE}");
                return Ok(());
            }
            _ => rest.push(a),
        }
    }

    let index = PlayerIndex::load(&dir)?;

    match rest.first().map(String::as_str) {
        Some("search") => {
            let query = rest.get(1).ok_or("search needs a query")?;
            for name in index.search(query) {
                println!("{name}");
            }
        }
        Some("detail") => {
            let player = rest.get(1).ok_or("detail needs a player name")?;
            match index.detail(player) {
                Some(rec) => println!(
                    "Player: {}\nPosition: {}\nTotal Occurrences: {}\nTotal Starters: {}",
                    rec.player, rec.position, rec.occurrences, rec.starters
                ),
                None => {
                    eprintln!("Player not found: {player}");
                    std::process::exit(1);
                }
            }
        }
        Some("list") | None => {
            for rec in index.entries() {
                println!(
                    "{}\t{}\t{}\t{}",
                    rec.player, rec.position, rec.occurrences, rec.starters
                );
            }
        }
        Some(other) => return Err(format!("Unknown command: {other}. {USAGE}").into()),
    }
    Ok(())
}
