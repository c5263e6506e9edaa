//! Basic equal-weight split example.
//!
//! Three friends share a weekend trip; one of them pays most of it.

use rust_decimal_macros::dec;
use split_engine::prelude::*;

fn main() -> Result<()> {
    println!("╔══════════════════════════════════════════╗");
    println!("║   split-engine: Basic Split Example      ║");
    println!("╚══════════════════════════════════════════╝\n");

    let mut group = Group::new();
    group.add_participant("Alice")?;
    group.add_participant("Bob")?;
    group.add_participant("Carol")?;

    group.add_expense("Alice", dec!(240.00), "Cabin rental")?;
    group.add_expense("Bob", dec!(63.45), "Groceries")?;
    group.add_expense("Alice", dec!(38.20), "Fuel")?;

    let plan = group.settle(&SettlementConfig::default())?;
    println!("{}", plan);

    println!("━━━ Removing Bob ━━━\n");
    let removed = group.remove_participant("Bob")?;
    println!("Dropped {} of Bob's expenses.\n", removed.len());

    let plan = group.settle(&SettlementConfig::default())?;
    println!("{}", plan);
    Ok(())
}
