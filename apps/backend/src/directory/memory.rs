use async_trait::async_trait;
use dashmap::DashMap;

use super::{MapPoolProvider, MatchInfo, MatchProvider, TeamMembership};
use crate::errors::domain::DomainError;

/// Directory held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    matches: DashMap<i64, MatchInfo>,
    pools: DashMap<i64, Vec<String>>,
    members: DashMap<i64, i64>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_match(&self, info: MatchInfo) {
        self.matches.insert(info.match_id, info);
    }

    pub fn set_map_pool<I, S>(&self, tournament_id: i64, maps: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pools
            .insert(tournament_id, maps.into_iter().map(Into::into).collect());
    }

    pub fn add_member(&self, user_id: i64, team_id: i64) {
        self.members.insert(user_id, team_id);
    }
}

#[async_trait]
impl MatchProvider for InMemoryDirectory {
    async fn find_match(&self, match_id: i64) -> Result<Option<MatchInfo>, DomainError> {
        Ok(self.matches.get(&match_id).map(|m| m.value().clone()))
    }
}

#[async_trait]
impl MapPoolProvider for InMemoryDirectory {
    async fn map_pool(&self, tournament_id: i64) -> Result<Option<Vec<String>>, DomainError> {
        Ok(self.pools.get(&tournament_id).map(|p| p.value().clone()))
    }
}

#[async_trait]
impl TeamMembership for InMemoryDirectory {
    async fn team_of(&self, user_id: i64) -> Result<Option<i64>, DomainError> {
        Ok(self.members.get(&user_id).map(|t| *t.value()))
    }
}
