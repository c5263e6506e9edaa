use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use split_engine::config::SettlementConfig;
use split_engine::core::currency::Currency;
use split_engine::core::expense::Expense;
use split_engine::core::group::{Group, Snapshot};
use split_engine::core::participant::{Participant, ParticipantName};
use split_engine::error::SettleError;
use split_engine::settlement::calculator::compute_balances;
use split_engine::settlement::matcher::compute_settlements;
use split_engine::settlement::plan::SettlementPlan;

fn name(s: &str) -> ParticipantName {
    ParticipantName::new(s)
}

fn transfers(plan: &SettlementPlan) -> Vec<(String, String, Decimal)> {
    plan.settlements()
        .iter()
        .map(|s| (s.from.to_string(), s.to.to_string(), s.amount))
        .collect()
}

fn t(from: &str, to: &str, amount: Decimal) -> (String, String, Decimal) {
    (from.to_string(), to.to_string(), amount)
}

/// Two equal participants, one pays for everything.
#[test]
fn scenario_one_payer_two_equal_shares() {
    let mut group = Group::new();
    group.add_participant("A").unwrap();
    group.add_participant("B").unwrap();
    group.add_expense("A", dec!(100), "Dinner").unwrap();

    let plan = group.settle(&SettlementConfig::default()).unwrap();
    assert_eq!(plan.balances().get(&name("A")), dec!(50));
    assert_eq!(plan.balances().get(&name("B")), dec!(-50));
    assert_eq!(transfers(&plan), vec![t("B", "A", dec!(50))]);
}

/// Weighted shares: the largest debtor settles with the creditor first.
#[test]
fn scenario_weighted_largest_debtor_first() {
    let mut group = Group::new();
    group.add_participant("A").unwrap();
    group.add_participant("B").unwrap();
    group.add_participant_with_weight("C", dec!(2)).unwrap();
    group.add_expense("A", dec!(120), "Cabin").unwrap();

    let plan = group.settle(&SettlementConfig::default()).unwrap();
    assert_eq!(plan.balances().get(&name("A")), dec!(90));
    assert_eq!(plan.balances().get(&name("B")), dec!(-30));
    assert_eq!(plan.balances().get(&name("C")), dec!(-60));
    assert_eq!(
        transfers(&plan),
        vec![t("C", "A", dec!(60)), t("B", "A", dec!(30))]
    );
}

/// No expenses: everyone is at zero and nothing needs to move.
#[test]
fn scenario_no_expenses() {
    let mut group = Group::new();
    for n in ["A", "B", "C", "D"] {
        group.add_participant(n).unwrap();
    }
    let plan = group.settle(&SettlementConfig::default()).unwrap();
    assert!(plan.balances().iter().all(|(_, b)| b.is_zero()));
    assert!(plan.is_empty());
}

/// Everyone paid exactly their share.
#[test]
fn scenario_everyone_paid_their_share() {
    let mut group = Group::new();
    for n in ["A", "B", "C"] {
        group.add_participant(n).unwrap();
        group.add_expense(n, dec!(30), "Round of drinks").unwrap();
    }
    let plan = group.settle(&SettlementConfig::default()).unwrap();
    assert!(plan.balances().iter().all(|(_, b)| b.is_zero()));
    assert!(plan.settlements().is_empty());
}

/// Removing a participant drops their expenses before recomputation.
#[test]
fn scenario_removal_cascades_to_expenses() {
    let mut group = Group::new();
    group.add_participant("A").unwrap();
    group.add_participant("B").unwrap();
    group.add_participant("C").unwrap();
    group.add_expense("A", dec!(60), "Groceries").unwrap();
    group.add_expense("B", dec!(50), "Fuel").unwrap();

    group.remove_participant("B").unwrap();

    assert!(group.expenses().iter().all(|e| e.payer() != &name("B")));
    let plan = group.settle(&SettlementConfig::default()).unwrap();
    assert_eq!(plan.total_amount(), dec!(60));
    assert!(!plan.balances().contains(&name("B")));
    assert_eq!(transfers(&plan), vec![t("C", "A", dec!(30))]);
}

/// The two pure functions can be driven directly from a snapshot.
#[test]
fn pure_functions_on_snapshot() {
    let participants = vec![
        Participant::new("Ann"),
        Participant::with_weight("Ben", dec!(0.5)),
        Participant::with_weight("Cho", dec!(1.5)),
    ];
    let expenses = vec![
        Expense::new(name("Ann"), dec!(45.90), "Pizza"),
        Expense::new(name("Cho"), dec!(14.10), "Soda"),
    ];
    let snapshot = Snapshot::new(participants, expenses);

    let balances = compute_balances(snapshot.participants(), snapshot.expenses()).unwrap();
    // Total 60, weight 3: shares 20 / 10 / 30.
    assert_eq!(balances.get(&name("Ann")), dec!(25.90));
    assert_eq!(balances.get(&name("Ben")), dec!(-10));
    assert_eq!(balances.get(&name("Cho")), dec!(-15.90));
    assert!(balances.is_balanced(Decimal::ZERO));

    let settlements = compute_settlements(&balances).unwrap();
    assert_eq!(settlements.len(), 2);
    assert_eq!(settlements[0].from, name("Cho"));
    assert_eq!(settlements[0].amount, dec!(15.90));
    assert_eq!(settlements[1].from, name("Ben"));
    assert_eq!(settlements[1].amount, dec!(10));
}

/// Three-way split of an amount that does not divide evenly.
#[test]
fn uneven_split_rounds_only_transfers() {
    let mut group = Group::new();
    for n in ["A", "B", "C"] {
        group.add_participant(n).unwrap();
    }
    group.add_expense("A", dec!(100), "Museum tickets").unwrap();

    let plan = group.settle(&SettlementConfig::default()).unwrap();
    assert!(plan.balances().sum().abs() < dec!(0.000000001));
    assert_eq!(
        transfers(&plan),
        vec![t("B", "A", dec!(33.33)), t("C", "A", dec!(33.33))]
    );
    assert!(plan.is_settled());
}

/// Yen groups settle in whole units.
#[test]
fn yen_group_settles_in_whole_units() {
    let mut group = Group::new();
    group.add_participant("Sato").unwrap();
    group.add_participant("Suzuki").unwrap();
    group.add_participant("Tanaka").unwrap();
    group.add_expense("Sato", dec!(10000), "Yakiniku").unwrap();

    let config = SettlementConfig::with_currency(Currency::jpy());
    let plan = group.settle(&config).unwrap();
    assert_eq!(
        transfers(&plan),
        vec![t("Suzuki", "Sato", dec!(3333)), t("Tanaka", "Sato", dec!(3333))]
    );
    assert!(plan.to_string().contains("Suzuki pays Sato ¥3,333"));
}

/// Recomputing from the same group gives the same answer and leaves it untouched.
#[test]
fn recomputation_is_idempotent() {
    let mut group = Group::new();
    group.add_participant("A").unwrap();
    group.add_participant_with_weight("B", dec!(3)).unwrap();
    group.add_participant("C").unwrap();
    group.add_expense("B", dec!(37.5), "Lunch").unwrap();
    group.add_expense("C", dec!(80), "Tickets").unwrap();

    let before = group.snapshot();
    let first = group.settle(&SettlementConfig::default()).unwrap();
    let second = group.settle(&SettlementConfig::default()).unwrap();

    assert_eq!(first.settlements(), second.settlements());
    assert_eq!(first.balances(), second.balances());
    assert_eq!(group.snapshot(), before);
}

/// Validation failures are reported at the group boundary.
#[test]
fn invalid_input_rejected_at_boundary() {
    let mut group = Group::new();
    assert_eq!(
        group.settle(&SettlementConfig::default()).unwrap_err(),
        SettleError::EmptyParticipantSet
    );

    group.add_participant("A").unwrap();
    assert_eq!(
        group.add_expense("Nobody", dec!(1), "x").unwrap_err(),
        SettleError::UnknownPayer(name("Nobody"))
    );
    assert_eq!(group.update_weight("A", dec!(0)).unwrap(), dec!(0.1));
}

/// Test JSON serialization of a settlement plan.
#[test]
fn settlement_plan_serializes() {
    let mut group = Group::new();
    group.add_participant("A").unwrap();
    group.add_participant("B").unwrap();
    group.add_expense("B", dec!(12.34), "Coffee").unwrap();

    let plan = group.settle(&SettlementConfig::default()).unwrap();
    let json = serde_json::to_string_pretty(&plan).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["settlements"][0]["from"], "A");
    assert_eq!(parsed["settlements"][0]["to"], "B");
    assert_eq!(parsed["settlements"][0]["amount"], "6.17");
    assert!(parsed.get("balances").is_some());
}

/// Amounts near the top of the decimal range are reported, never panicked on.
#[test]
fn huge_amounts_do_not_panic() {
    let mut group = Group::new();
    group.add_participant_with_weight("A", dec!(10)).unwrap();
    group.add_participant("B").unwrap();
    group
        .add_expense("A", dec!(10000000000000000000000000000), "Island")
        .unwrap();

    match group.settle(&SettlementConfig::default()) {
        Ok(plan) => assert!(plan.settlements().iter().all(|s| s.from.as_str() == "B")),
        Err(e) => assert!(matches!(e, SettleError::RoundingInvariantViolation { .. })),
    }

    assert_eq!(
        group.add_expense("B", Decimal::MAX, "Everything").unwrap_err(),
        SettleError::AmountOverflow
    );
}

/// A balance mapping names each participant once.
#[test]
fn balances_with_repeated_name_are_refused() {
    let parsed = serde_json::from_str::<split_engine::core::balance::Balances>(
        r#"{"entries":{"A":"5","A":"-5"}}"#,
    );
    assert!(parsed.is_err());
}
