use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ActionType {
    #[sea_orm(string_value = "ban")]
    Ban,
    #[sea_orm(string_value = "pick")]
    Pick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum SideChoice {
    #[sea_orm(string_value = "attack")]
    Attack,
    #[sea_orm(string_value = "defense")]
    Defense,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "veto_actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "session_id")]
    pub session_id: i64,
    pub action: ActionType,
    #[sea_orm(column_name = "map_id", column_type = "Text")]
    pub map_id: String,
    /// `None` for system actions.
    #[sea_orm(column_name = "team_id")]
    pub team_id: Option<i64>,
    #[sea_orm(column_name = "order_number", column_type = "SmallInteger")]
    pub order_number: i16,
    #[sea_orm(column_name = "performed_by")]
    pub performed_by: Option<i64>,
    #[sea_orm(column_name = "performed_at")]
    pub performed_at: OffsetDateTime,
    pub side: Option<SideChoice>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::veto_sessions::Entity",
        from = "Column::SessionId",
        to = "super::veto_sessions::Column::Id"
    )]
    VetoSession,
}

impl Related<super::veto_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VetoSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
