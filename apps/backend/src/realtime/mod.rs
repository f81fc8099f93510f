//! Change notifications for veto sessions.
//!
//! Services collect one [`VetoEvent`] per transition and hand them to the
//! configured [`VetoEventSink`] once the transaction has committed. Delivery
//! is fire-and-forget: a sink logs its own failures and never fails the
//! request that produced the event.

mod broadcast;
mod redis_pubsub;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ActionKind, Side, VetoStatus};

pub use self::broadcast::BroadcastSink;
pub use self::redis_pubsub::RedisSink;

/// Which admin repair touched a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairKind {
    Reset,
    Rollback,
    ForceComplete,
    TurnSync,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VetoEvent {
    SessionCreated {
        session_id: i64,
        match_id: i64,
    },
    DiceRolled {
        session_id: i64,
        home_team_id: i64,
        away_team_id: i64,
        version: i32,
    },
    ActionRecorded {
        session_id: i64,
        order_number: u16,
        action: ActionKind,
        map_id: String,
        team_id: Option<i64>,
        version: i32,
    },
    PhaseChanged {
        session_id: i64,
        status: VetoStatus,
        current_turn_team_id: Option<i64>,
        version: i32,
    },
    SideChosen {
        session_id: i64,
        side: Side,
        version: i32,
    },
    SessionRepaired {
        session_id: i64,
        repair: RepairKind,
        version: i32,
    },
}

impl VetoEvent {
    pub fn session_id(&self) -> i64 {
        match self {
            VetoEvent::SessionCreated { session_id, .. }
            | VetoEvent::DiceRolled { session_id, .. }
            | VetoEvent::ActionRecorded { session_id, .. }
            | VetoEvent::PhaseChanged { session_id, .. }
            | VetoEvent::SideChosen { session_id, .. }
            | VetoEvent::SessionRepaired { session_id, .. } => *session_id,
        }
    }

    /// Pub/sub channel clients of one session listen on.
    pub fn channel(&self) -> String {
        format!("veto:{}", self.session_id())
    }
}

#[async_trait]
pub trait VetoEventSink: Send + Sync {
    async fn publish(&self, event: VetoEvent);

    async fn publish_all(&self, events: Vec<VetoEvent>) {
        for event in events {
            self.publish(event).await;
        }
    }
}
