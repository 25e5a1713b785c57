//! Simulation domain: action kinds, batch identifiers and transition rules.

pub mod action;
pub mod batch_id;
pub mod transitions;

pub use action::ActionKind;
pub use batch_id::BatchId;
pub use transitions::{
    apply, expected_step_count, highest_period, GameSnapshot, StepDraft, Transition,
};

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_action;
#[cfg(test)]
mod tests_props_transitions;
