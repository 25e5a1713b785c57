//! Property tests for the transition table (pure domain, no DB).
//!
//! Properties tested:
//! - Periods never decrease except under CAD, which drops by at most one
//! - Step counts match the per-action table
//! - Every step moves the period by at most one
//! - Only LPD-style steps carry decision values
//! - The decisions flag is only ever raised, never cleared
//! - `highest_period` bounds every written period exactly

use proptest::prelude::*;

use crate::domain::{
    apply, expected_step_count, highest_period, test_gens, test_prelude, ActionKind,
};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_period_monotonic_except_cancel(
        action in test_gens::action(),
        game in test_gens::snapshot(),
    ) {
        let t = apply(action, game);
        let before = game.current_period;
        let after = t.next.current_period;
        if action == ActionKind::CancelLastPeriod {
            prop_assert!(after <= before);
            prop_assert!(before - after <= 1);
            prop_assert_eq!(after, before.saturating_sub(1));
        } else {
            prop_assert!(after >= before);
            prop_assert!(after - before <= 1);
        }
    }

    #[test]
    fn prop_step_count_matches_table(
        action in test_gens::action(),
        game in test_gens::snapshot(),
    ) {
        let t = apply(action, game);
        prop_assert_eq!(t.steps_created(), expected_step_count(action, game.current_period));
    }

    #[test]
    fn prop_each_step_moves_at_most_one_period(
        action in test_gens::action(),
        game in test_gens::snapshot(),
    ) {
        for step in apply(action, game).steps {
            prop_assert!(step.period_from.abs_diff(step.period_to) <= 1);
            prop_assert_ne!(step.action, ActionKind::ResetSimulateDecide);
        }
    }

    #[test]
    fn prop_only_decision_steps_carry_flags(
        action in test_gens::action(),
        game in test_gens::snapshot(),
    ) {
        for step in apply(action, game).steps {
            let is_lpd = step.action == ActionKind::ReleaseNextDecisions;
            prop_assert_eq!(step.decisions_from.is_some(), is_lpd);
            prop_assert_eq!(step.decisions_to, is_lpd.then_some(true));
        }
    }

    #[test]
    fn prop_decisions_flag_never_cleared(
        action in test_gens::action(),
        game in test_gens::snapshot(),
    ) {
        let t = apply(action, game);
        if game.decisions_available {
            prop_assert!(t.next.decisions_available);
        }
        let raises = matches!(
            action,
            ActionKind::ReleaseNextDecisions | ActionKind::ResetSimulateDecide
        );
        prop_assert_eq!(t.next.decisions_available, game.decisions_available || raises);
    }

    #[test]
    fn prop_highest_period_is_exact(
        action in test_gens::action(),
        game in test_gens::snapshot(),
    ) {
        let t = apply(action, game);
        let written = t
            .steps
            .iter()
            .flat_map(|step| [step.period_from, step.period_to])
            .chain([t.next.current_period])
            .max()
            .map(u64::from);
        prop_assert_eq!(written, Some(highest_period(action, game.current_period)));
    }
}
