use crate::core::participant::ParticipantName;
use crate::core::settlement::Settlement;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Signed balance of every participant, in participant order.
///
/// A positive balance means the participant overpaid and is owed money
/// (creditor). A negative balance means they underpaid and owe money
/// (debtor).
///
/// Entries keep the order in which participants joined the group. The
/// settlement matcher relies on that order to break ties between equal
/// balances, so this is a list rather than a hash map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    /// name -> balance, serialized as a JSON object in participant order
    #[serde(with = "entries_serde")]
    entries: Vec<(ParticipantName, Decimal)>,
}

mod entries_serde {
    use super::*;
    use serde::de::{Error, MapAccess, Visitor};
    use serde::ser::SerializeMap;

    pub fn serialize<S: serde::Serializer>(
        entries: &[(ParticipantName, Decimal)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, balance) in entries {
            map.serialize_entry(name, balance)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(ParticipantName, Decimal)>, D::Error> {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = Vec<(ParticipantName, Decimal)>;
            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of participant name to balance")
            }
            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, balance)) =
                    access.next_entry::<ParticipantName, Decimal>()?
                {
                    if entries.iter().any(|(n, _)| n == &name) {
                        return Err(M::Error::custom(format!(
                            "duplicate participant `{}`",
                            name
                        )));
                    }
                    entries.push((name, balance));
                }
                Ok(entries)
            }
        }
        deserializer.deserialize_map(V)
    }
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to a participant's balance, appending them if unseen.
    pub fn credit(&mut self, name: &ParticipantName, amount: Decimal) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, balance)) => *balance += amount,
            None => self.entries.push((name.clone(), amount)),
        }
    }

    /// Balance of a participant; zero if unknown.
    pub fn get(&self, name: &ParticipantName) -> Decimal {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, b)| *b)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, name: &ParticipantName) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantName, Decimal)> {
        self.entries.iter().map(|(n, b)| (n, *b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances. Zero for any output of the balance calculator.
    pub fn sum(&self) -> Decimal {
        self.entries.iter().map(|(_, b)| *b).sum()
    }

    /// Whether the balances sum to zero within `tolerance`.
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        self.sum().abs() <= tolerance
    }

    /// Total owed to creditors (sum of positive balances).
    pub fn total_credit(&self) -> Decimal {
        self.entries
            .iter()
            .map(|(_, b)| *b)
            .filter(|b| *b > Decimal::ZERO)
            .sum()
    }

    /// Apply a transfer: the payer's debt shrinks, the payee's credit shrinks.
    pub fn apply_settlement(&mut self, settlement: &Settlement) {
        self.credit(&settlement.from, settlement.amount);
        self.credit(&settlement.to, -settlement.amount);
    }

    /// Copy of the balances with every value rounded by `round`.
    pub fn rounded(&self, round: impl Fn(Decimal) -> Decimal) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(n, b)| (n.clone(), round(*b)))
                .collect(),
        }
    }
}

impl FromIterator<(ParticipantName, Decimal)> for Balances {
    fn from_iter<T: IntoIterator<Item = (ParticipantName, Decimal)>>(iter: T) -> Self {
        let mut balances = Balances::new();
        for (name, amount) in iter {
            balances.credit(&name, amount);
        }
        balances
    }
}
