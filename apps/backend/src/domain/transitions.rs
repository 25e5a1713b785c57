//! Pure period-transition rules.
//!
//! Every action maps a [`GameSnapshot`] to the steps it records and the state
//! the game ends in. Nothing here touches storage; the batch service persists
//! the output verbatim.

use super::action::ActionKind;

/// The two mutable fields of a game that transitions read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSnapshot {
    pub current_period: u32,
    pub decisions_available: bool,
}

/// One audit step as produced by a transition, before it gets a step index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDraft {
    /// Primitive that produced the step (never `ResetSimulateDecide`)
    pub action: ActionKind,
    pub period_from: u32,
    pub period_to: u32,
    pub decisions_from: Option<bool>,
    pub decisions_to: Option<bool>,
}

impl StepDraft {
    fn period(action: ActionKind, period_from: u32, period_to: u32) -> Self {
        Self {
            action,
            period_from,
            period_to,
            decisions_from: None,
            decisions_to: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub steps: Vec<StepDraft>,
    pub next: GameSnapshot,
}

impl Transition {
    pub fn steps_created(&self) -> usize {
        self.steps.len()
    }
}

/// Apply `action` to `game`.
pub fn apply(action: ActionKind, game: GameSnapshot) -> Transition {
    let mut steps = Vec::new();
    let next = emit(action, game, &mut steps);
    Transition { steps, next }
}

fn emit(action: ActionKind, game: GameSnapshot, steps: &mut Vec<StepDraft>) -> GameSnapshot {
    let p = game.current_period;
    match action {
        ActionKind::ReprocessToCurrent => {
            steps.extend((0..p).map(|k| StepDraft::period(action, k, k + 1)));
            game
        }
        ActionKind::ReprocessAndReleaseNext => {
            steps.extend((0..=p).map(|k| StepDraft::period(action, k, k + 1)));
            GameSnapshot {
                current_period: p + 1,
                ..game
            }
        }
        ActionKind::SimulateCurrent => {
            steps.push(StepDraft::period(action, p, p));
            game
        }
        ActionKind::SimulateAndReleaseNext => {
            steps.push(StepDraft::period(action, p, p + 1));
            GameSnapshot {
                current_period: p + 1,
                ..game
            }
        }
        ActionKind::ReprocessPast => {
            steps.push(StepDraft::period(action, p.saturating_sub(1), p));
            game
        }
        ActionKind::ReleaseNextDecisions => {
            steps.push(StepDraft {
                action,
                period_from: p,
                period_to: p,
                decisions_from: Some(game.decisions_available),
                decisions_to: Some(true),
            });
            GameSnapshot {
                decisions_available: true,
                ..game
            }
        }
        ActionKind::CancelLastPeriod => {
            let after = p.saturating_sub(1);
            steps.push(StepDraft::period(action, p, after));
            GameSnapshot {
                current_period: after,
                ..game
            }
        }
        ActionKind::ResetSimulateDecide => {
            let game = emit(ActionKind::ReprocessToCurrent, game, steps);
            let game = emit(ActionKind::SimulateAndReleaseNext, game, steps);
            emit(ActionKind::ReleaseNextDecisions, game, steps)
        }
    }
}

/// Number of steps `action` records for a game at `current_period`.
pub fn expected_step_count(action: ActionKind, current_period: u32) -> usize {
    let p = current_period as usize;
    match action {
        ActionKind::ReprocessToCurrent => p,
        ActionKind::ReprocessAndReleaseNext => p + 1,
        ActionKind::ResetSimulateDecide => p + 2,
        ActionKind::SimulateCurrent
        | ActionKind::SimulateAndReleaseNext
        | ActionKind::ReprocessPast
        | ActionKind::ReleaseNextDecisions
        | ActionKind::CancelLastPeriod => 1,
    }
}

/// Largest period value `action` writes, in a step or the game counter, for a
/// game at `current_period`.
pub fn highest_period(action: ActionKind, current_period: u32) -> u64 {
    let p = u64::from(current_period);
    match action {
        ActionKind::ReprocessAndReleaseNext
        | ActionKind::SimulateAndReleaseNext
        | ActionKind::ResetSimulateDecide => p + 1,
        ActionKind::ReprocessToCurrent
        | ActionKind::SimulateCurrent
        | ActionKind::ReprocessPast
        | ActionKind::ReleaseNextDecisions
        | ActionKind::CancelLastPeriod => p,
    }
}
