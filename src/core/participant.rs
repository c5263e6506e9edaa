use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight given to a participant when none is specified.
pub const DEFAULT_WEIGHT: Decimal = Decimal::ONE;

/// Smallest weight a participant may carry. Lower values are clamped up to it.
pub const MIN_WEIGHT: Decimal = dec!(0.1);

/// Unique name of a participant in a group.
///
/// Names are compared exactly; the [`Group`](crate::core::group::Group)
/// store trims user input before building one.
///
/// # Examples
///
/// ```
/// use split_engine::core::participant::ParticipantName;
///
/// let alice = ParticipantName::new("Alice");
/// let bob = ParticipantName::new("Bob");
/// assert_ne!(alice, bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantName(String);

impl ParticipantName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A member of the group together with their share weight.
///
/// The weight is the participant's relative part of the total expense
/// burden. It is always at least [`MIN_WEIGHT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    name: ParticipantName,
    weight: Decimal,
}

impl Participant {
    /// Create a participant with the default weight of 1.
    pub fn new(name: impl Into<ParticipantName>) -> Self {
        Self {
            name: name.into(),
            weight: DEFAULT_WEIGHT,
        }
    }

    /// Create a participant with an explicit weight, clamped to [`MIN_WEIGHT`].
    pub fn with_weight(name: impl Into<ParticipantName>, weight: Decimal) -> Self {
        Self {
            name: name.into(),
            weight: clamp_weight(weight),
        }
    }

    pub fn name(&self) -> &ParticipantName {
        &self.name
    }

    pub fn weight(&self) -> Decimal {
        self.weight
    }

    /// Replace the weight, clamping to [`MIN_WEIGHT`]. Returns the stored value.
    pub fn set_weight(&mut self, weight: Decimal) -> Decimal {
        self.weight = clamp_weight(weight);
        self.weight
    }
}

/// Raise any weight below the floor to [`MIN_WEIGHT`].
pub fn clamp_weight(weight: Decimal) -> Decimal {
    weight.max(MIN_WEIGHT)
}

impl From<ParticipantName> for Participant {
    fn from(name: ParticipantName) -> Self {
        Self::new(name)
    }
}
