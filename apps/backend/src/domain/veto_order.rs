//! Per-format veto order metadata.
//!
//! The session stores one of these as JSON. It carries the format together with
//! the map pool snapshot taken when the session was bootstrapped, so later
//! changes to the tournament pool never affect a running veto.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::types::{ActionKind, BestOf, Seat};
use crate::errors::domain::{DomainError, InfraErrorKind, ValidationKind};

/// Fixed action sequence for a best-of-three veto.
pub const BO3_SEQUENCE: [ActionKind; 7] = [
    ActionKind::Ban,
    ActionKind::Ban,
    ActionKind::Pick,
    ActionKind::Pick,
    ActionKind::Ban,
    ActionKind::Ban,
    ActionKind::Pick,
];

/// Who bans next in a best-of-one veto over a seven map pool, indexed by the
/// number of bans already made. Not strict alternation: away bans twice in a
/// row at indices 1 and 2.
pub const BO1_TURN_TABLE: [Seat; 6] = [
    Seat::Home,
    Seat::Away,
    Seat::Away,
    Seat::Home,
    Seat::Away,
    Seat::Home,
];

/// Minimum pool size for a best-of-three veto.
pub const BO3_MIN_POOL: usize = BO3_SEQUENCE.len();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bo1Order {
    pub map_pool: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bo3Order {
    pub map_pool: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum VetoOrder {
    Bo1(Bo1Order),
    Bo3(Bo3Order),
}

impl VetoOrder {
    /// Build and validate the order for a format and pool.
    pub fn new(best_of: BestOf, map_pool: Vec<String>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(map_pool.len());
        if let Some(dup) = map_pool.iter().find(|m| !seen.insert(m.as_str())) {
            return Err(DomainError::validation(
                ValidationKind::InvalidMapPool,
                format!("Map pool lists '{dup}' more than once"),
            ));
        }
        if map_pool.iter().any(|m| m.trim().is_empty()) {
            return Err(DomainError::validation(
                ValidationKind::InvalidMapPool,
                "Map pool contains an empty map id",
            ));
        }

        match best_of {
            BestOf::Bo1 => {
                if map_pool.len() < 2 {
                    return Err(DomainError::validation(
                        ValidationKind::InvalidMapPool,
                        format!(
                            "Best-of-one veto needs at least 2 maps, pool has {}",
                            map_pool.len()
                        ),
                    ));
                }
                Ok(VetoOrder::Bo1(Bo1Order { map_pool }))
            }
            BestOf::Bo3 => {
                if map_pool.len() < BO3_MIN_POOL {
                    return Err(DomainError::validation(
                        ValidationKind::InvalidMapPool,
                        format!(
                            "Best-of-three veto needs at least {BO3_MIN_POOL} maps, pool has {}",
                            map_pool.len()
                        ),
                    ));
                }
                Ok(VetoOrder::Bo3(Bo3Order { map_pool }))
            }
        }
    }

    pub fn best_of(&self) -> BestOf {
        match self {
            VetoOrder::Bo1(_) => BestOf::Bo1,
            VetoOrder::Bo3(_) => BestOf::Bo3,
        }
    }

    pub fn map_pool(&self) -> &[String] {
        match self {
            VetoOrder::Bo1(o) => &o.map_pool,
            VetoOrder::Bo3(o) => &o.map_pool,
        }
    }

    pub fn contains_map(&self, map_id: &str) -> bool {
        self.map_pool().iter().any(|m| m == map_id)
    }

    /// Ledger length of a finished veto, system actions included.
    pub fn total_actions(&self) -> usize {
        match self {
            VetoOrder::Bo1(o) => o.map_pool.len(),
            VetoOrder::Bo3(_) => BO3_SEQUENCE.len(),
        }
    }

    /// Number of actions taken by teams before the veto finalizes.
    pub fn user_actions(&self) -> usize {
        match self {
            VetoOrder::Bo1(o) => o.map_pool.len().saturating_sub(1),
            VetoOrder::Bo3(_) => BO3_SEQUENCE.len(),
        }
    }

    /// Whether the home team picks a starting side after the last action.
    pub fn has_side_choice(&self) -> bool {
        matches!(self, VetoOrder::Bo3(_))
    }

    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string(self).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Failed to encode veto order: {e}"),
            )
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        serde_json::from_str(raw).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Stored veto order is unreadable: {e}"),
            )
        })
    }
}
