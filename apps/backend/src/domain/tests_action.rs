use std::collections::HashSet;

use crate::domain::ActionKind;
use crate::errors::domain::{DomainError, ValidationKind};

#[test]
fn wire_codes_round_trip_through_from_str() {
    for action in ActionKind::ALL {
        assert_eq!(action.as_str().parse::<ActionKind>().unwrap(), action);
    }
}

#[test]
fn wire_codes_and_labels_are_unique() {
    let codes: HashSet<_> = ActionKind::ALL.iter().map(|a| a.as_str()).collect();
    let labels: HashSet<_> = ActionKind::ALL.iter().map(|a| a.label()).collect();
    assert_eq!(codes.len(), 8);
    assert_eq!(labels.len(), 8);
}

#[test]
fn unknown_or_lowercase_codes_are_rejected() {
    for bad in ["", "XYZ", "spn", "R0DX", " SPN"] {
        match bad.parse::<ActionKind>() {
            Err(DomainError::Validation(ValidationKind::InvalidAction, detail)) => {
                assert!(detail.contains("Unknown action"), "{detail}");
            }
            other => panic!("{bad:?} should be invalid, got {other:?}"),
        }
    }
}

#[test]
fn serde_uses_wire_codes() {
    let json = serde_json::to_string(&ActionKind::ResetSimulateDecide).unwrap();
    assert_eq!(json, "\"RSD\"");
    let back: ActionKind = serde_json::from_str("\"R0D\"").unwrap();
    assert_eq!(back, ActionKind::ReprocessToCurrent);
}
