use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum GameStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub status: GameStatus,
    pub current_period: i32,
    pub decisions_available: bool,
    pub lock_version: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::execution_batches::Entity")]
    ExecutionBatches,
    #[sea_orm(has_many = "super::period_steps::Entity")]
    PeriodSteps,
}

impl Related<super::execution_batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExecutionBatches.def()
    }
}

impl Related<super::period_steps::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PeriodSteps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
