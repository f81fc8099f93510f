use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(DeriveIden)]
enum VetoSessions {
    Table,
    Id,
    MatchId,
    Status,
    VetoOrder,
    HomeTeamId,
    AwayTeamId,
    CurrentTurnTeamId,
    RollSeed,
    RollTimestamp,
    RollInitiatorId,
    StartedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
    Version,
}

#[derive(DeriveIden)]
enum VetoActions {
    Table,
    Id,
    SessionId,
    Action,
    MapId,
    TeamId,
    OrderNumber,
    PerformedBy,
    PerformedAt,
    Side,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // veto_sessions
        manager
            .create_table(
                Table::create()
                    .table(VetoSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VetoSessions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(VetoSessions::MatchId).big_integer().not_null())
                    .col(
                        ColumnDef::new(VetoSessions::Status)
                            .text()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(VetoSessions::VetoOrder).text().not_null())
                    .col(ColumnDef::new(VetoSessions::HomeTeamId).big_integer().null())
                    .col(ColumnDef::new(VetoSessions::AwayTeamId).big_integer().null())
                    .col(
                        ColumnDef::new(VetoSessions::CurrentTurnTeamId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(VetoSessions::RollSeed).big_integer().null())
                    .col(
                        ColumnDef::new(VetoSessions::RollTimestamp)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(VetoSessions::RollInitiatorId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(VetoSessions::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(VetoSessions::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(VetoSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VetoSessions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VetoSessions::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_veto_sessions_match_id")
                    .table(VetoSessions::Table)
                    .col(VetoSessions::MatchId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_veto_sessions_status")
                    .table(VetoSessions::Table)
                    .col(VetoSessions::Status)
                    .to_owned(),
            )
            .await?;

        // veto_actions
        manager
            .create_table(
                Table::create()
                    .table(VetoActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VetoActions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(VetoActions::SessionId).big_integer().not_null())
                    .col(ColumnDef::new(VetoActions::Action).text().not_null())
                    .col(ColumnDef::new(VetoActions::MapId).text().not_null())
                    .col(ColumnDef::new(VetoActions::TeamId).big_integer().null())
                    .col(
                        ColumnDef::new(VetoActions::OrderNumber)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VetoActions::PerformedBy).big_integer().null())
                    .col(
                        ColumnDef::new(VetoActions::PerformedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VetoActions::Side).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_veto_actions_session_id")
                            .from(VetoActions::Table, VetoActions::SessionId)
                            .to(VetoSessions::Table, VetoSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_veto_actions_session_order")
                    .table(VetoActions::Table)
                    .col(VetoActions::SessionId)
                    .col(VetoActions::OrderNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_veto_actions_session_map")
                    .table(VetoActions::Table)
                    .col(VetoActions::SessionId)
                    .col(VetoActions::MapId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order + drop index before table
        manager
            .drop_index(
                Index::drop()
                    .name("ux_veto_actions_session_map")
                    .table(VetoActions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ux_veto_actions_session_order")
                    .table(VetoActions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(VetoActions::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_veto_sessions_status")
                    .table(VetoSessions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ux_veto_sessions_match_id")
                    .table(VetoSessions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(VetoSessions::Table).to_owned())
            .await?;

        Ok(())
    }
}
