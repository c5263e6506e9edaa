use crate::core::balance::Balances;
use crate::core::expense::{self, Expense};
use crate::core::participant::Participant;
use crate::error::{Result, SettleError};
use log::debug;
use rust_decimal::Decimal;

/// Compute the signed balance of every participant.
///
/// # Algorithm
///
/// 1. `total_amount` = sum of every expense amount.
/// 2. `total_weight` = sum of every participant weight.
/// 3. Expected share of a participant = `weight / total_weight * total_amount`.
/// 4. Paid = sum of the expenses that participant paid.
/// 5. Balance = paid - expected share.
///
/// Nothing is rounded here; rounding happens only when transfers are emitted
/// or amounts are displayed. The balances sum to zero up to the last digit of
/// `Decimal` precision.
///
/// An empty participant list is a no-op that yields empty balances. The
/// inputs are only read.
///
/// # Errors
///
/// [`SettleError::InvalidWeight`] if a participant weight is not positive,
/// [`SettleError::UnknownPayer`] if an expense names someone who is not a
/// participant. The [`Group`](crate::core::group::Group) store rules both out.
/// [`SettleError::AmountOverflow`] if the totals do not fit in a `Decimal`.
///
/// # Examples
///
/// ```
/// use split_engine::core::expense::Expense;
/// use split_engine::core::participant::{Participant, ParticipantName};
/// use split_engine::settlement::calculator::compute_balances;
/// use rust_decimal_macros::dec;
///
/// let participants = vec![Participant::new("A"), Participant::new("B")];
/// let expenses = vec![Expense::new(ParticipantName::new("A"), dec!(100), "Dinner")];
///
/// let balances = compute_balances(&participants, &expenses).unwrap();
/// assert_eq!(balances.get(&"A".into()), dec!(50));
/// assert_eq!(balances.get(&"B".into()), dec!(-50));
/// ```
pub fn compute_balances(participants: &[Participant], expenses: &[Expense]) -> Result<Balances> {
    if participants.is_empty() {
        debug!("no participants, skipping balance computation");
        return Ok(Balances::new());
    }

    if let Some(p) = participants.iter().find(|p| p.weight() <= Decimal::ZERO) {
        return Err(SettleError::InvalidWeight {
            name: p.name().clone(),
            weight: p.weight(),
        });
    }

    let total_amount =
        expense::checked_total_amount(expenses).ok_or(SettleError::AmountOverflow)?;
    let total_weight = participants
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.weight()))
        .ok_or(SettleError::AmountOverflow)?;

    let mut balances: Balances = participants
        .iter()
        .map(|p| (p.name().clone(), Decimal::ZERO))
        .collect();

    // Paid totals and expected shares both lie within 0..=total_amount, so
    // crediting them cannot overflow.
    for ex in expenses {
        if !balances.contains(ex.payer()) {
            return Err(SettleError::UnknownPayer(ex.payer().clone()));
        }
        balances.credit(ex.payer(), ex.amount());
    }

    for p in participants {
        let expected = expected_share(p.weight(), total_weight, total_amount)
            .ok_or(SettleError::AmountOverflow)?;
        balances.credit(p.name(), -expected);
    }

    debug!(
        "computed balances for {} participants over {} expenses (total {}, residual {})",
        participants.len(),
        expenses.len(),
        total_amount,
        balances.sum()
    );

    Ok(balances)
}

/// Weight-proportional part of `total_amount`.
///
/// Multiplies before dividing so whole-number inputs stay exact where the
/// division allows it. When the product does not fit, the weight ratio is
/// taken first instead. `None` only if neither order fits.
pub fn expected_share(
    weight: Decimal,
    total_weight: Decimal,
    total_amount: Decimal,
) -> Option<Decimal> {
    if total_weight.is_zero() {
        return Some(Decimal::ZERO);
    }
    total_amount
        .checked_mul(weight)
        .and_then(|product| product.checked_div(total_weight))
        .or_else(|| {
            weight
                .checked_div(total_weight)
                .and_then(|ratio| ratio.checked_mul(total_amount))
        })
}
