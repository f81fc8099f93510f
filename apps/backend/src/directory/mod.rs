//! Lookups against the tournament application that owns matches, map pools
//! and team rosters.
//!
//! The veto core only reads from these providers. Two implementations ship:
//! [`HttpDirectory`] talks to the tournament app, [`InMemoryDirectory`] backs
//! development setups and tests.

mod http;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::domain::DomainError;

pub use http::HttpDirectory;
pub use memory::InMemoryDirectory;

/// Match facts the veto needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub match_id: i64,
    pub team1_id: i64,
    pub team2_id: i64,
    pub tournament_id: i64,
    pub best_of: u8,
}

#[async_trait]
pub trait MatchProvider: Send + Sync {
    async fn find_match(&self, match_id: i64) -> Result<Option<MatchInfo>, DomainError>;
}

#[async_trait]
pub trait MapPoolProvider: Send + Sync {
    /// Ordered map ids of the tournament's pool.
    async fn map_pool(&self, tournament_id: i64) -> Result<Option<Vec<String>>, DomainError>;
}

#[async_trait]
pub trait TeamMembership: Send + Sync {
    /// Team the user plays for, if any.
    async fn team_of(&self, user_id: i64) -> Result<Option<i64>, DomainError>;
}

/// The three providers, shared across workers.
#[derive(Clone)]
pub struct Directory {
    pub matches: Arc<dyn MatchProvider>,
    pub map_pools: Arc<dyn MapPoolProvider>,
    pub teams: Arc<dyn TeamMembership>,
}

impl Directory {
    pub fn new(
        matches: Arc<dyn MatchProvider>,
        map_pools: Arc<dyn MapPoolProvider>,
        teams: Arc<dyn TeamMembership>,
    ) -> Self {
        Self {
            matches,
            map_pools,
            teams,
        }
    }

    /// All three lookups served by one in-memory store.
    pub fn in_memory(store: Arc<InMemoryDirectory>) -> Self {
        Self::new(store.clone(), store.clone(), store)
    }

    pub fn http(client: HttpDirectory) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client.clone(), client)
    }
}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory").finish_non_exhaustive()
    }
}
