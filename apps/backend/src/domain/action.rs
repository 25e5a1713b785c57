use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

/// The closed set of period operations a facilitator can run.
///
/// Wire codes are part of the audit format and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionKind {
    #[serde(rename = "R0D")]
    ReprocessToCurrent,
    #[serde(rename = "RND")]
    ReprocessAndReleaseNext,
    #[serde(rename = "SPA")]
    SimulateCurrent,
    #[serde(rename = "SPN")]
    SimulateAndReleaseNext,
    #[serde(rename = "RDA")]
    ReprocessPast,
    #[serde(rename = "LPD")]
    ReleaseNextDecisions,
    #[serde(rename = "CAD")]
    CancelLastPeriod,
    /// Composite: R0D, then SPN, then LPD
    #[serde(rename = "RSD")]
    ResetSimulateDecide,
}

impl ActionKind {
    pub const ALL: [ActionKind; 8] = [
        ActionKind::ReprocessToCurrent,
        ActionKind::ReprocessAndReleaseNext,
        ActionKind::SimulateCurrent,
        ActionKind::SimulateAndReleaseNext,
        ActionKind::ReprocessPast,
        ActionKind::ReleaseNextDecisions,
        ActionKind::CancelLastPeriod,
        ActionKind::ResetSimulateDecide,
    ];

    /// Three-letter wire code, as stored in the audit tables.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReprocessToCurrent => "R0D",
            Self::ReprocessAndReleaseNext => "RND",
            Self::SimulateCurrent => "SPA",
            Self::SimulateAndReleaseNext => "SPN",
            Self::ReprocessPast => "RDA",
            Self::ReleaseNextDecisions => "LPD",
            Self::CancelLastPeriod => "CAD",
            Self::ResetSimulateDecide => "RSD",
        }
    }

    /// Human-readable name shown in history views.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ReprocessToCurrent => "Reprocess 0 to current",
            Self::ReprocessAndReleaseNext => "Reprocess 0 to current and release next",
            Self::SimulateCurrent => "Simulate current period",
            Self::SimulateAndReleaseNext => "Simulate current period and release next",
            Self::ReprocessPast => "Reprocess past period",
            Self::ReleaseNextDecisions => "Release next decision period",
            Self::CancelLastPeriod => "Cancel last period simulation",
            Self::ResetSimulateDecide => "Reprocess, simulate next and release decisions",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::InvalidAction,
                    format!(
                        "Unknown action '{s}' (expected one of R0D, RND, SPA, SPN, RDA, LPD, CAD, RSD)"
                    ),
                )
            })
    }
}
