use crate::config::SettlementConfig;
use crate::core::balance::Balances;
use crate::core::group::Snapshot;
use crate::core::participant::ParticipantName;
use crate::core::settlement::Settlement;
use crate::error::Result;
use crate::settlement::calculator::{compute_balances, expected_share};
use crate::settlement::matcher::SettlementMatcher;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One participant's line in the share breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareLine {
    pub name: ParticipantName,
    pub weight: Decimal,
    /// Percentage of the total burden, 0-100.
    pub share_percent: f64,
    pub expected_share: Decimal,
    pub paid: Decimal,
    pub balance: Decimal,
}

/// Balances and transfers computed from one snapshot of a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementPlan {
    snapshot: Snapshot,
    balances: Balances,
    settlements: Vec<Settlement>,
    total_amount: Decimal,
    total_weight: Decimal,
    config: SettlementConfig,
}

impl SettlementPlan {
    /// Run the balance calculator and the settlement matcher on a snapshot.
    ///
    /// An empty snapshot produces an empty plan; the group store refuses to
    /// get that far.
    pub fn compute(snapshot: &Snapshot, config: &SettlementConfig) -> Result<Self> {
        config.validate()?;
        let balances = compute_balances(snapshot.participants(), snapshot.expenses())?;
        let settlements = SettlementMatcher::new(config.clone())?.compute_settlements(&balances)?;

        Ok(Self {
            snapshot: snapshot.clone(),
            balances,
            settlements,
            total_amount: snapshot.total_amount(),
            total_weight: snapshot.total_weight(),
            config: config.clone(),
        })
    }

    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn total_weight(&self) -> Decimal {
        self.total_weight
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Sum of all transfer amounts.
    pub fn transfer_total(&self) -> Decimal {
        self.settlements.iter().map(|s| s.amount).sum()
    }

    /// Whether nobody owes anybody anything.
    pub fn is_empty(&self) -> bool {
        self.settlements.is_empty()
    }

    /// Per-participant weight share, expected share, payments and balance.
    pub fn share_breakdown(&self) -> Vec<ShareLine> {
        self.snapshot
            .participants()
            .iter()
            .map(|p| {
                let name = p.name().clone();
                let paid = self.snapshot.paid_by(&name);
                let balance = self.balances.get(&name);
                let expected = expected_share(p.weight(), self.total_weight, self.total_amount)
                    .unwrap_or(paid - balance);
                let share_percent = if self.total_weight.is_zero() {
                    0.0
                } else {
                    (p.weight() / self.total_weight * Decimal::ONE_HUNDRED)
                        .to_f64()
                        .unwrap_or(0.0)
                };
                ShareLine {
                    paid,
                    balance,
                    name,
                    weight: p.weight(),
                    share_percent,
                    expected_share: expected,
                }
            })
            .collect()
    }

    /// Balances left after every transfer is applied.
    ///
    /// Each entry differs from zero by at most the rounding of the transfers
    /// that touched it.
    pub fn residual_balances(&self) -> Balances {
        let mut residual = self.balances.clone();
        for s in &self.settlements {
            residual.apply_settlement(s);
        }
        residual
    }

    /// Verify the transfers settle everybody: every residual balance is within
    /// half a minor unit per transfer.
    pub fn is_settled(&self) -> bool {
        let per_transfer = self.config.residual_tolerance();
        let allowance = per_transfer * Decimal::from(self.settlements.len().max(1));
        self.residual_balances()
            .iter()
            .all(|(_, b)| b.abs() <= allowance)
    }
}

impl std::fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let currency = &self.config.currency;
        writeln!(f, "=== Shares ===")?;
        writeln!(f, "Total Spent:    {}", currency.format(self.total_amount))?;
        writeln!(f, "Total Weight:   {}", self.total_weight.normalize())?;
        for line in self.share_breakdown() {
            writeln!(
                f,
                "  {:<15} {:>5.1}%  expected {:>12}  paid {:>12}  balance {:>12}",
                line.name.as_str(),
                line.share_percent,
                currency.format(line.expected_share),
                currency.format(line.paid),
                currency.format(line.balance),
            )?;
        }

        writeln!(f, "\n=== Settlements ===")?;
        if self.settlements.is_empty() {
            writeln!(f, "Nothing to settle.")?;
        }
        for s in &self.settlements {
            writeln!(
                f,
                "  {} pays {} {}",
                s.from,
                s.to,
                currency.format(s.amount)
            )?;
        }
        Ok(())
    }
}
