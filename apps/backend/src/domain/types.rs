//! Core value types shared by the veto protocol.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

/// Lifecycle status of a veto session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VetoStatus {
    Pending,
    Banning,
    SideChoice,
    Completed,
}

impl VetoStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            VetoStatus::Pending => "pending",
            VetoStatus::Banning => "banning",
            VetoStatus::SideChoice => "side_choice",
            VetoStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for VetoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Ban,
    Pick,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Ban => f.write_str("ban"),
            ActionKind::Pick => f.write_str("pick"),
        }
    }
}

/// Home or away, as fixed by the dice roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Home,
    Away,
}

impl Seat {
    pub const fn other(self) -> Seat {
        match self {
            Seat::Home => Seat::Away,
            Seat::Away => Seat::Home,
        }
    }

    /// Resolve the seat to a concrete team id.
    pub const fn team(self, home: i64, away: i64) -> i64 {
        match self {
            Seat::Home => home,
            Seat::Away => away,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::Home => f.write_str("home"),
            Seat::Away => f.write_str("away"),
        }
    }
}

/// Starting side chosen by the home team on the deciding map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Attack,
    Defense,
}

/// Match format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BestOf {
    Bo1,
    Bo3,
}

impl BestOf {
    pub const fn games(self) -> u8 {
        match self {
            BestOf::Bo1 => 1,
            BestOf::Bo3 => 3,
        }
    }
}

impl TryFrom<u8> for BestOf {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BestOf::Bo1),
            3 => Ok(BestOf::Bo3),
            other => Err(DomainError::validation(
                ValidationKind::InvalidFormat,
                format!("Unsupported best-of value {other}; expected 1 or 3"),
            )),
        }
    }
}
