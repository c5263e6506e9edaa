//! # split-engine
//!
//! Weighted shared-expense balancing and settlement engine.
//!
//! Given a group of participants with share weights and the expenses each of
//! them paid, this engine computes every participant's balance and a short
//! list of transfers that squares everybody up.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: participants, expenses, balances, the group store
//! - **settlement** — Balance calculator, greedy settlement matcher, settlement plans
//! - **config** — Rounding and tolerance settings
//! - **simulation** — Random group generation for stress testing

pub mod config;
pub mod core;
pub mod error;
pub mod settlement;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::SettlementConfig;
    pub use crate::core::balance::Balances;
    pub use crate::core::currency::Currency;
    pub use crate::core::expense::{Expense, ExpenseId};
    pub use crate::core::group::{Group, Snapshot};
    pub use crate::core::participant::{Participant, ParticipantName};
    pub use crate::core::settlement::Settlement;
    pub use crate::error::{Result, SettleError};
    pub use crate::settlement::calculator::compute_balances;
    pub use crate::settlement::matcher::{compute_settlements, SettlementMatcher};
    pub use crate::settlement::plan::{SettlementPlan, ShareLine};
}
