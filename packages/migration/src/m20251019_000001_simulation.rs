use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;
use sea_orm_migration::sea_query::{ColumnDef, Expr, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Games {
    Table,
    Id,
    Code,
    Name,
    Status,
    CurrentPeriod,
    DecisionsAvailable,
    LockVersion,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ExecutionBatches {
    Table,
    Id,
    GameId,
    BatchId,
    Action,
    RequestedAt,
    RequestedBy,
}

#[derive(Iden)]
enum PeriodSteps {
    Table,
    Id,
    ExecutionId,
    GameId,
    Action,
    PeriodFrom,
    PeriodTo,
    DecisionsFrom,
    DecisionsTo,
    StepIndex,
    RequestedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !matches!(
            manager.get_database_backend(),
            DatabaseBackend::Postgres | DatabaseBackend::Sqlite
        ) {
            return Err(DbErr::Custom("Unsupported database backend".into()));
        }

        // games
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(Games::Code)
                            .string_len(40)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Games::Name).string_len(120).not_null())
                    .col(
                        ColumnDef::new(Games::Status)
                            .string_len(8)
                            .not_null()
                            .default("ACTIVE")
                            .check(Expr::col(Games::Status).is_in(["ACTIVE", "INACTIVE"])),
                    )
                    .col(
                        ColumnDef::new(Games::CurrentPeriod)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Games::CurrentPeriod).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Games::DecisionsAvailable)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Games::LockVersion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // execution_batches
        manager
            .create_table(
                Table::create()
                    .table(ExecutionBatches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExecutionBatches::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(ExecutionBatches::GameId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExecutionBatches::BatchId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExecutionBatches::Action)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExecutionBatches::RequestedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExecutionBatches::RequestedBy)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_execution_batches_game_id")
                            .from(ExecutionBatches::Table, ExecutionBatches::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_execution_batches_game_batch")
                    .table(ExecutionBatches::Table)
                    .col(ExecutionBatches::GameId)
                    .col(ExecutionBatches::BatchId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_execution_batches_batch_id")
                    .table(ExecutionBatches::Table)
                    .col(ExecutionBatches::BatchId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_execution_batches_game_requested")
                    .table(ExecutionBatches::Table)
                    .col(ExecutionBatches::GameId)
                    .col(ExecutionBatches::RequestedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_execution_batches_action_requested")
                    .table(ExecutionBatches::Table)
                    .col(ExecutionBatches::Action)
                    .col(ExecutionBatches::RequestedAt)
                    .to_owned(),
            )
            .await?;

        // period_steps
        manager
            .create_table(
                Table::create()
                    .table(PeriodSteps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PeriodSteps::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(PeriodSteps::ExecutionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PeriodSteps::GameId).big_integer().not_null())
                    .col(ColumnDef::new(PeriodSteps::Action).string_len(3).not_null())
                    .col(
                        ColumnDef::new(PeriodSteps::PeriodFrom)
                            .integer()
                            .not_null()
                            .check(Expr::col(PeriodSteps::PeriodFrom).gte(0)),
                    )
                    .col(
                        ColumnDef::new(PeriodSteps::PeriodTo)
                            .integer()
                            .not_null()
                            .check(Expr::col(PeriodSteps::PeriodTo).gte(0)),
                    )
                    .col(ColumnDef::new(PeriodSteps::DecisionsFrom).boolean().null())
                    .col(ColumnDef::new(PeriodSteps::DecisionsTo).boolean().null())
                    .col(
                        ColumnDef::new(PeriodSteps::StepIndex)
                            .integer()
                            .not_null()
                            .check(Expr::col(PeriodSteps::StepIndex).gte(0)),
                    )
                    .col(
                        ColumnDef::new(PeriodSteps::RequestedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_period_steps_execution_id")
                            .from(PeriodSteps::Table, PeriodSteps::ExecutionId)
                            .to(ExecutionBatches::Table, ExecutionBatches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_period_steps_game_id")
                            .from(PeriodSteps::Table, PeriodSteps::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_period_steps_execution_step")
                    .table(PeriodSteps::Table)
                    .col(PeriodSteps::ExecutionId)
                    .col(PeriodSteps::StepIndex)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_period_steps_game_requested")
                    .table(PeriodSteps::Table)
                    .col(PeriodSteps::GameId)
                    .col(PeriodSteps::RequestedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_period_steps_action_requested")
                    .table(PeriodSteps::Table)
                    .col(PeriodSteps::Action)
                    .col(PeriodSteps::RequestedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order; indexes go with their tables
        manager
            .drop_table(
                Table::drop()
                    .table(PeriodSteps::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .table(ExecutionBatches::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Games::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
