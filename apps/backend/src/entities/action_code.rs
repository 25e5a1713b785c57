use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::ActionKind;

/// Stored form of an action kind (`action` columns of both audit tables).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
pub enum ActionCode {
    #[sea_orm(string_value = "R0D")]
    R0d,
    #[sea_orm(string_value = "RND")]
    Rnd,
    #[sea_orm(string_value = "SPA")]
    Spa,
    #[sea_orm(string_value = "SPN")]
    Spn,
    #[sea_orm(string_value = "RDA")]
    Rda,
    #[sea_orm(string_value = "LPD")]
    Lpd,
    #[sea_orm(string_value = "CAD")]
    Cad,
    #[sea_orm(string_value = "RSD")]
    Rsd,
}

impl From<ActionKind> for ActionCode {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::ReprocessToCurrent => Self::R0d,
            ActionKind::ReprocessAndReleaseNext => Self::Rnd,
            ActionKind::SimulateCurrent => Self::Spa,
            ActionKind::SimulateAndReleaseNext => Self::Spn,
            ActionKind::ReprocessPast => Self::Rda,
            ActionKind::ReleaseNextDecisions => Self::Lpd,
            ActionKind::CancelLastPeriod => Self::Cad,
            ActionKind::ResetSimulateDecide => Self::Rsd,
        }
    }
}

impl From<ActionCode> for ActionKind {
    fn from(code: ActionCode) -> Self {
        match code {
            ActionCode::R0d => Self::ReprocessToCurrent,
            ActionCode::Rnd => Self::ReprocessAndReleaseNext,
            ActionCode::Spa => Self::SimulateCurrent,
            ActionCode::Spn => Self::SimulateAndReleaseNext,
            ActionCode::Rda => Self::ReprocessPast,
            ActionCode::Lpd => Self::ReleaseNextDecisions,
            ActionCode::Cad => Self::CancelLastPeriod,
            ActionCode::Rsd => Self::ResetSimulateDecide,
        }
    }
}
