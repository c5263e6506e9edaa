use crate::config::SettlementConfig;
use crate::core::expense::{self, Expense, ExpenseId};
use crate::core::participant::{Participant, ParticipantName, DEFAULT_WEIGHT};
use crate::error::{Result, SettleError};
use crate::settlement::plan::SettlementPlan;
use log::{info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Immutable copy of a group's participants and expenses.
///
/// The settlement core only ever sees snapshots, so a settlement run is not
/// affected by edits made to the group while it is in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
}

impl Snapshot {
    pub fn new(participants: Vec<Participant>, expenses: Vec<Expense>) -> Self {
        Self {
            participants,
            expenses,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn total_amount(&self) -> Decimal {
        expense::total_amount(&self.expenses)
    }

    pub fn total_weight(&self) -> Decimal {
        self.participants.iter().map(Participant::weight).sum()
    }

    /// Total paid by one participant.
    pub fn paid_by(&self, name: &ParticipantName) -> Decimal {
        expense::total_amount(self.expenses.iter().filter(|e| e.payer() == name))
    }
}

/// Mutable store of the participants and expenses of one session.
///
/// All input validation happens here, so the settlement core can assume
/// unique names, positive weights and known payers.
///
/// # Examples
///
/// ```
/// use split_engine::config::SettlementConfig;
/// use split_engine::core::group::Group;
/// use rust_decimal_macros::dec;
///
/// let mut group = Group::new();
/// group.add_participant("Alice").unwrap();
/// group.add_participant("Bob").unwrap();
/// group.add_expense("Alice", dec!(100), "Groceries").unwrap();
///
/// let plan = group.settle(&SettlementConfig::default()).unwrap();
/// let transfer = &plan.settlements()[0];
/// assert_eq!(transfer.from.as_str(), "Bob");
/// assert_eq!(transfer.to.as_str(), "Alice");
/// assert_eq!(transfer.amount, dec!(50));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Group {
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant with the default weight of 1.
    pub fn add_participant(&mut self, name: &str) -> Result<&Participant> {
        self.add_participant_with_weight(name, DEFAULT_WEIGHT)
    }

    /// Add a participant with a weight, clamped to the minimum weight.
    ///
    /// The name is trimmed; it must be non-empty and not already taken.
    pub fn add_participant_with_weight(&mut self, name: &str, weight: Decimal) -> Result<&Participant> {
        let name = parse_name(name)?;
        if self.find(&name).is_some() {
            return Err(SettleError::DuplicateParticipant(name));
        }

        let participant = Participant::with_weight(name, weight);
        if participant.weight() != weight {
            warn!(
                "weight {} for '{}' raised to {}",
                weight,
                participant.name(),
                participant.weight()
            );
        }
        info!("added participant '{}' (weight {})", participant.name(), participant.weight());

        self.participants.push(participant);
        let last = self.participants.len() - 1;
        Ok(&self.participants[last])
    }

    /// Remove a participant together with every expense they paid.
    ///
    /// Returns the removed expenses.
    pub fn remove_participant(&mut self, name: &str) -> Result<Vec<Expense>> {
        let name = ParticipantName::new(name.trim());
        let index = self
            .find(&name)
            .ok_or_else(|| SettleError::UnknownParticipant(name.clone()))?;
        self.participants.remove(index);

        let (removed, kept): (Vec<Expense>, Vec<Expense>) = std::mem::take(&mut self.expenses)
            .into_iter()
            .partition(|e| e.payer() == &name);
        self.expenses = kept;

        info!(
            "removed participant '{}' and {} of their expenses",
            name,
            removed.len()
        );
        Ok(removed)
    }

    /// Change a participant's weight. Values below the minimum are clamped,
    /// never rejected. Returns the weight actually stored.
    pub fn update_weight(&mut self, name: &str, weight: Decimal) -> Result<Decimal> {
        let name = ParticipantName::new(name.trim());
        let index = self
            .find(&name)
            .ok_or_else(|| SettleError::UnknownParticipant(name.clone()))?;

        let effective = self.participants[index].set_weight(weight);
        if effective != weight {
            warn!("weight {} for '{}' raised to {}", weight, name, effective);
        }
        Ok(effective)
    }

    /// Record an expense paid by an existing participant.
    pub fn add_expense(&mut self, payer: &str, amount: Decimal, description: &str) -> Result<ExpenseId> {
        let payer = ParticipantName::new(payer.trim());
        if self.find(&payer).is_none() {
            return Err(SettleError::UnknownPayer(payer));
        }
        if amount <= Decimal::ZERO {
            return Err(SettleError::InvalidAmount(amount));
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(SettleError::EmptyDescription);
        }
        if self.total_amount().checked_add(amount).is_none() {
            return Err(SettleError::AmountOverflow);
        }

        let expense = Expense::new(payer, amount, description);
        let id = expense.id();
        info!(
            "'{}' paid {} for '{}'",
            expense.payer(),
            expense.amount(),
            expense.description()
        );
        self.expenses.push(expense);
        Ok(id)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, name: &str) -> Option<&Participant> {
        let name = ParticipantName::new(name.trim());
        self.find(&name).map(|i| &self.participants[i])
    }

    /// Expenses in the order they were recorded.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn total_amount(&self) -> Decimal {
        expense::total_amount(&self.expenses)
    }

    pub fn total_weight(&self) -> Decimal {
        self.participants.iter().map(Participant::weight).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Immutable copy of the current state for the settlement core.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.participants.clone(), self.expenses.clone())
    }

    /// Compute balances and transfers for the current state.
    ///
    /// # Errors
    ///
    /// [`SettleError::EmptyParticipantSet`] when the group has no participants.
    pub fn settle(&self, config: &SettlementConfig) -> Result<SettlementPlan> {
        if self.participants.is_empty() {
            return Err(SettleError::EmptyParticipantSet);
        }
        SettlementPlan::compute(&self.snapshot(), config)
    }

    fn find(&self, name: &ParticipantName) -> Option<usize> {
        self.participants.iter().position(|p| p.name() == name)
    }
}

fn parse_name(raw: &str) -> Result<ParticipantName> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SettleError::EmptyName);
    }
    Ok(ParticipantName::new(trimmed))
}
