//! Times parsing and graph building.
//!
//! Run with: cargo run --release --package data-loader --example benchmark_load [PATH]
//!
//! PATH is an adjacency file or a directory of them. Without it a synthetic
//! ring-lattice graph is generated and parsed from memory.

use data_loader::parser::parse_adjacency_str;
use data_loader::{FriendGraph, ParsedInput};
use std::fmt::Write;
use std::path::PathBuf;
use std::time::Instant;

const SYNTHETIC_USERS: i64 = 50_000;
const SYNTHETIC_DEGREE: i64 = 20;

/// Every user is friends with the `degree / 2` users on either side of it
fn synthetic_input(users: i64, degree: i64) -> String {
    let mut text = String::new();
    for user in 0..users {
        let friends: Vec<String> = (1..=degree / 2)
            .flat_map(|offset| [(user + offset) % users, (user - offset).rem_euclid(users)])
            .map(|friend| friend.to_string())
            .collect();
        let _ = writeln!(text, "{}\t{}", user, friends.join(","));
    }
    text
}

fn main() -> data_loader::Result<()> {
    let start = Instant::now();
    let (graph, parsed, source): (FriendGraph, ParsedInput, String) =
        match std::env::args().nth(1).map(PathBuf::from) {
            Some(path) => {
                let (graph, parsed) = FriendGraph::load_from_path(&path)?;
                (graph, parsed, path.display().to_string())
            }
            None => {
                let text = synthetic_input(SYNTHETIC_USERS, SYNTHETIC_DEGREE);
                let parsed = parse_adjacency_str("synthetic", &text);
                let graph = FriendGraph::from_records(&parsed.records);
                let source = format!(
                    "synthetic ({} users, degree {})",
                    SYNTHETIC_USERS, SYNTHETIC_DEGREE
                );
                (graph, parsed, source)
            }
        };
    let elapsed = start.elapsed();

    let (users, edges) = graph.counts();

    println!("=== Load Complete: {} ===", source);
    println!("Time taken: {:?}", elapsed);
    println!("Lines: {}", parsed.lines);
    println!("Users: {}, friendships: {}", users, edges);
    println!("Skipped: {}, rejected: {}", parsed.skipped, parsed.rejected.len());
    println!(
        "Throughput: {:.0} lines/second",
        parsed.lines as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
