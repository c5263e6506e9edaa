use proptest::prelude::*;
use rust_decimal::Decimal;
use split_engine::config::SettlementConfig;
use split_engine::core::balance::Balances;
use split_engine::core::group::Group;
use split_engine::core::participant::ParticipantName;
use split_engine::settlement::calculator::compute_balances;
use split_engine::settlement::matcher::compute_settlements;

const NAMES: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// Generate a weight between 0.1 and 5.0 in steps of 0.1.
fn arb_weight() -> impl Strategy<Value = Decimal> {
    (1i64..=50).prop_map(|tenths| Decimal::new(tenths, 1))
}

/// Generate an expense amount between 0.01 and 10,000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generate a group of 1..=6 weighted participants with 0..40 expenses.
fn arb_group() -> impl Strategy<Value = Group> {
    (1usize..=6)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(arb_weight(), n),
                prop::collection::vec((0..n, arb_amount()), 0..40),
            )
        })
        .prop_map(|(weights, expenses)| {
            let mut group = Group::new();
            for (i, w) in weights.iter().enumerate() {
                group.add_participant_with_weight(NAMES[i], *w).unwrap();
            }
            for (payer, amount) in expenses {
                group.add_expense(NAMES[payer], amount, "generated").unwrap();
            }
            group
        })
}

fn tolerance() -> Decimal {
    Decimal::new(1, 9)
}

proptest! {
    // ===================================================================
    // INVARIANT 1: Balances always sum to zero.
    // ===================================================================
    #[test]
    fn balances_sum_to_zero(group in arb_group()) {
        let snapshot = group.snapshot();
        let balances = compute_balances(snapshot.participants(), snapshot.expenses()).unwrap();
        prop_assert!(
            balances.sum().abs() <= tolerance(),
            "Balance sum {} must be zero",
            balances.sum()
        );
        prop_assert_eq!(balances.len(), group.participants().len());
    }

    // ===================================================================
    // INVARIANT 2: Applying every transfer settles everybody.
    //
    // Each transfer is rounded to the cent, so a participant may be off
    // by at most half a cent per transfer.
    // ===================================================================
    #[test]
    fn settlements_zero_every_balance(group in arb_group()) {
        let plan = group.settle(&SettlementConfig::default()).unwrap();
        let allowance = Decimal::new(5, 3) * Decimal::from(plan.settlements().len().max(1));
        for (name, residual) in plan.residual_balances().iter() {
            prop_assert!(
                residual.abs() <= allowance,
                "{} left with {} after settlement",
                name,
                residual
            );
        }
    }

    // ===================================================================
    // INVARIANT 3: No self-transfers, and every amount is positive.
    // ===================================================================
    #[test]
    fn transfers_are_well_formed(group in arb_group()) {
        let plan = group.settle(&SettlementConfig::default()).unwrap();
        for s in plan.settlements() {
            prop_assert_ne!(&s.from, &s.to);
            prop_assert!(s.amount > Decimal::ZERO, "amount {} must be positive", s.amount);
            prop_assert!(plan.balances().get(&s.from) < Decimal::ZERO);
            prop_assert!(plan.balances().get(&s.to) > Decimal::ZERO);
        }
    }

    // ===================================================================
    // INVARIANT 4: Settlement is deterministic and has no hidden state.
    // ===================================================================
    #[test]
    fn settlement_is_deterministic(group in arb_group()) {
        let before = group.snapshot();
        let first = group.settle(&SettlementConfig::default()).unwrap();
        let second = group.settle(&SettlementConfig::default()).unwrap();
        prop_assert_eq!(first.settlements(), second.settlements());
        prop_assert_eq!(first.balances(), second.balances());
        prop_assert_eq!(group.snapshot(), before);
    }

    // ===================================================================
    // INVARIANT 5: Greedy matching uses fewer transfers than participants.
    // ===================================================================
    #[test]
    fn transfer_count_is_bounded(group in arb_group()) {
        let plan = group.settle(&SettlementConfig::default()).unwrap();
        prop_assert!(plan.settlements().len() < group.participants().len().max(1));
    }

    // ===================================================================
    // INVARIANT 6: Transfers move exactly the total credit, up to rounding.
    // ===================================================================
    #[test]
    fn transfer_total_matches_credit(group in arb_group()) {
        let plan = group.settle(&SettlementConfig::default()).unwrap();
        let diff = (plan.transfer_total() - plan.balances().total_credit()).abs();
        let allowance = Decimal::new(5, 3) * Decimal::from(plan.settlements().len().max(1));
        prop_assert!(diff <= allowance, "transfers {} vs credit {}", plan.transfer_total(), plan.balances().total_credit());
    }

    // ===================================================================
    // INVARIANT 7: Any zero-sum balance mapping settles without error.
    // ===================================================================
    #[test]
    fn zero_sum_balances_always_settle(
        amounts in prop::collection::vec(-1_000_000i64..1_000_000i64, 1..6),
    ) {
        let mut entries: Vec<(String, Decimal)> = amounts
            .iter()
            .enumerate()
            .map(|(i, cents)| (NAMES[i].to_string(), Decimal::new(*cents, 2)))
            .collect();
        let sum: Decimal = entries.iter().map(|(_, b)| *b).sum();
        entries.push(("Z".to_string(), -sum));

        let balances: Balances = entries
            .into_iter()
            .map(|(n, b)| (ParticipantName::new(n), b))
            .collect();
        let settlements = compute_settlements(&balances);
        prop_assert!(settlements.is_ok(), "{:?}", settlements);
    }
}
