use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::action_code::ActionCode;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "period_steps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub execution_id: i64,
    pub game_id: i64,
    pub action: ActionCode,
    pub period_from: i32,
    pub period_to: i32,
    pub decisions_from: Option<bool>,
    pub decisions_to: Option<bool>,
    pub step_index: i32,
    pub requested_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::execution_batches::Entity",
        from = "Column::ExecutionId",
        to = "super::execution_batches::Column::Id",
        on_delete = "Cascade"
    )]
    ExecutionBatch,
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::GameId",
        to = "super::games::Column::Id",
        on_delete = "Cascade"
    )]
    Game,
}

impl Related<super::execution_batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExecutionBatch.def()
    }
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
