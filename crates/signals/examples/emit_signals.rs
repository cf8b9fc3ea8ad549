//! Example: Emit signals for a few adjacency lines
//!
//! Run with: cargo run --package signals --example emit_signals
//!
//! This example shows how to:
//! 1. Parse adjacency lines
//! 2. Emit exclusion and candidacy signals for each
//! 3. Display the results

use data_loader::parser::parse_adjacency_line;
use signals::{PairEmitter, SignalKind};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    println!("=== Pair Emitter Example ===\n");

    let lines = ["1\t2,3", "2\t1,4", "3\t1,4", "4\t2,3", "5\t"];
    let emitter = PairEmitter::new();

    for (idx, line) in lines.iter().enumerate() {
        let Some(record) = parse_adjacency_line("example", idx + 1, line)? else {
            println!("line {}: skipped", idx + 1);
            continue;
        };

        let signals = emitter.emit(&record);
        let exclusions = signals
            .iter()
            .filter(|s| s.kind == SignalKind::AlreadyFriend)
            .count();
        println!(
            "owner {}: {} signals ({} exclusions, {} candidacies)",
            record.owner,
            signals.len(),
            exclusions,
            signals.len() - exclusions
        );
        for signal in &signals {
            println!("  {}", signal);
        }
    }

    Ok(())
}
