//! Weighted split example.
//!
//! Adults carry a weight of 2, kids 1 and a toddler the minimum weight.
//! Amounts are settled in yen.

use rust_decimal_macros::dec;
use split_engine::prelude::*;

fn main() -> Result<()> {
    println!("╔══════════════════════════════════════════╗");
    println!("║  split-engine: Weighted Split Example    ║");
    println!("╚══════════════════════════════════════════╝\n");

    let mut group = Group::new();
    group.add_participant_with_weight("Haruto", dec!(2))?;
    group.add_participant_with_weight("Yui", dec!(2))?;
    group.add_participant("Sora")?;
    group.add_participant("Mei")?;
    group.add_participant("Ren")?;
    // Weights below 0.1 are raised to 0.1.
    let toddler = group.update_weight("Ren", dec!(0))?;
    println!("Ren's weight clamped to {}\n", toddler);

    group.add_expense("Haruto", dec!(18400), "Hotel")?;
    group.add_expense("Yui", dec!(7350), "Dinner")?;
    group.add_expense("Sora", dec!(1200), "Snacks")?;

    let config = SettlementConfig::with_currency(Currency::jpy());
    let plan = group.settle(&config)?;
    println!("{}", plan);

    println!("━━━ Residual balances after transfers ━━━\n");
    for (name, residual) in plan.residual_balances().iter() {
        println!("  {:<10} {:>8}", name, config.currency.format(residual));
    }
    println!("\nSettled: {}", plan.is_settled());
    Ok(())
}
