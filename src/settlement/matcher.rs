use crate::config::SettlementConfig;
use crate::core::balance::Balances;
use crate::core::participant::ParticipantName;
use crate::core::settlement::Settlement;
use crate::error::{Result, SettleError};
use log::{debug, warn};
use rust_decimal::Decimal;

/// A debtor or creditor still waiting to be matched.
///
/// `remaining` is a local working copy of the balance magnitude; the input
/// balances are never written to.
#[derive(Debug, Clone)]
struct Candidate<'a> {
    name: &'a ParticipantName,
    remaining: Decimal,
}

/// Turns balances into a list of transfers using greedy largest-first matching.
///
/// Debtors are ordered by debt (largest first), creditors by credit (largest
/// first). Ties keep participant order, which makes the output reproducible.
/// The current debtor pays the current creditor as much as both can absorb,
/// and whichever side is used up moves on.
///
/// This keeps the transfer count low but is not guaranteed to be minimal for
/// every distribution of balances.
#[derive(Debug, Clone, Default)]
pub struct SettlementMatcher {
    config: SettlementConfig,
}

impl SettlementMatcher {
    /// Build a matcher for `config`.
    ///
    /// # Errors
    ///
    /// [`SettleError::Config`] if the config fails
    /// [`SettlementConfig::validate`], e.g. a negative epsilon.
    pub fn new(config: SettlementConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Compute the transfers that bring every balance to zero.
    ///
    /// Amounts are rounded to the currency's minor unit when emitted; a
    /// transfer that rounds to zero is dropped. Balances within `epsilon` of
    /// zero take no part in matching.
    ///
    /// # Errors
    ///
    /// [`SettleError::RoundingInvariantViolation`] when debt and credit do not
    /// run out together, i.e. more than half a minor unit of either is left
    /// unmatched. That only happens when the balances do not sum to zero.
    pub fn compute_settlements(&self, balances: &Balances) -> Result<Vec<Settlement>> {
        let epsilon = self.config.epsilon;

        let mut debtors: Vec<Candidate<'_>> = balances
            .iter()
            .filter(|(_, b)| *b < -epsilon)
            .map(|(name, b)| Candidate {
                name,
                remaining: -b,
            })
            .collect();
        let mut creditors: Vec<Candidate<'_>> = balances
            .iter()
            .filter(|(_, b)| *b > epsilon)
            .map(|(name, b)| Candidate { name, remaining: b })
            .collect();

        // Stable sorts: equal amounts keep participant order.
        debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let mut settlements = Vec::new();
        let mut d = 0;
        let mut c = 0;

        while d < debtors.len() && c < creditors.len() {
            let debt = debtors[d].remaining;
            let credit = creditors[c].remaining;
            let transfer = debt.min(credit);

            let amount = self.config.round(transfer);
            if amount > Decimal::ZERO {
                settlements.push(Settlement::new(
                    debtors[d].name.clone(),
                    creditors[c].name.clone(),
                    amount,
                ));
            }

            if (debt - credit).abs() <= epsilon {
                debtors[d].remaining = Decimal::ZERO;
                creditors[c].remaining = Decimal::ZERO;
                d += 1;
                c += 1;
            } else if debt < credit {
                debtors[d].remaining = Decimal::ZERO;
                creditors[c].remaining -= debt;
                d += 1;
            } else {
                debtors[d].remaining -= credit;
                creditors[c].remaining = Decimal::ZERO;
                c += 1;
            }
        }

        let unmatched_debt: Decimal = debtors[d..]
            .iter()
            .map(|x| x.remaining)
            .sum();
        let unmatched_credit: Decimal = creditors[c..]
            .iter()
            .map(|x| x.remaining)
            .sum();

        let tolerance = self.config.residual_tolerance();
        if unmatched_debt > tolerance || unmatched_credit > tolerance {
            warn!(
                "settlement left {} debt and {} credit unmatched (balance sum {})",
                unmatched_debt,
                unmatched_credit,
                balances.sum()
            );
            return Err(SettleError::RoundingInvariantViolation {
                unmatched_debt,
                unmatched_credit,
            });
        }

        debug!(
            "matched {} debtors against {} creditors in {} transfers",
            debtors.len(),
            creditors.len(),
            settlements.len()
        );

        Ok(settlements)
    }
}

/// [`SettlementMatcher::compute_settlements`] with the default configuration.
pub fn compute_settlements(balances: &Balances) -> Result<Vec<Settlement>> {
    SettlementMatcher::default().compute_settlements(balances)
}
