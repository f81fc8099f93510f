use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum SessionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "banning")]
    Banning,
    #[sea_orm(string_value = "side_choice")]
    SideChoice,
    #[sea_orm(string_value = "completed")]
    Completed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "veto_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "match_id", unique)]
    pub match_id: i64,
    pub status: SessionStatus,
    /// Format + map pool snapshot, JSON encoded.
    #[sea_orm(column_name = "veto_order", column_type = "Text")]
    pub veto_order: String,
    #[sea_orm(column_name = "home_team_id")]
    pub home_team_id: Option<i64>,
    #[sea_orm(column_name = "away_team_id")]
    pub away_team_id: Option<i64>,
    #[sea_orm(column_name = "current_turn_team_id")]
    pub current_turn_team_id: Option<i64>,
    #[sea_orm(column_name = "roll_seed")]
    pub roll_seed: Option<i64>,
    #[sea_orm(column_name = "roll_timestamp")]
    pub roll_timestamp: Option<OffsetDateTime>,
    #[sea_orm(column_name = "roll_initiator_id")]
    pub roll_initiator_id: Option<i64>,
    #[sea_orm(column_name = "started_at")]
    pub started_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "completed_at")]
    pub completed_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::veto_actions::Entity")]
    VetoActions,
}

impl Related<super::veto_actions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VetoActions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
