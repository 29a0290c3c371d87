//! Gate Controller Tests
//!
//! Ordering, readiness and idempotence of field commits.
//!
use formgate_core::prelude::*;
use formgate_test_utils::{
    commit_all, contact_registry, contact_values, ready_two_field_gate, two_field_registry,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_two_field_scenario() {
    let mut gate = GateController::new(two_field_registry());

    let outcome = gate.on_field_commit("name", "Jo", CommitTrigger::Blur).unwrap();
    assert!(outcome.accepted());
    assert_eq!(gate.state().activation("phone"), Some(true));

    let outcome = gate.on_field_commit("phone", "123", CommitTrigger::Blur).unwrap();
    assert!(matches!(outcome.rejection, Some(Rejection::Format(_))));
    assert_eq!(gate.state().validity("phone"), Some(false));
    assert!(gate.reporter().is_visible());
    assert_eq!(gate.reporter().message(), "The field phone is invalid. Check the format.");
    assert!(!gate.is_form_ready());

    let outcome = gate.on_field_commit("phone", "1234567", CommitTrigger::Blur).unwrap();
    assert!(outcome.accepted());
    assert!(gate.is_form_ready());
}

#[test]
fn test_empty_commit_leaves_activation_unchanged() {
    let mut gate = GateController::new(two_field_registry());
    let outcome = gate.on_field_commit("name", "", CommitTrigger::Blur).unwrap();
    assert!(matches!(outcome.rejection, Some(Rejection::Empty(_))));
    assert_eq!(gate.state().activation("phone"), Some(false));

    // already active stays active
    gate.on_field_commit("name", "Jo", CommitTrigger::Blur).unwrap();
    gate.on_field_commit("name", "  ", CommitTrigger::Blur).unwrap();
    assert_eq!(gate.state().activation("phone"), Some(true));
}

#[test]
fn test_forward_navigation_veto_and_advance() {
    let mut gate = GateController::new(contact_registry());

    let vetoed = gate
        .on_field_commit("name", "7", CommitTrigger::ForwardNavigation)
        .unwrap();
    assert_eq!(vetoed.navigation, Navigation::Vetoed);
    assert!(!gate.is_interactable("surname"));

    let advanced = gate
        .on_field_commit("name", "Ana", CommitTrigger::ForwardNavigation)
        .unwrap();
    assert_eq!(
        advanced.navigation,
        Navigation::Advance {
            focus: Some(FieldId::from("surname"))
        }
    );
    assert!(gate.is_interactable("surname"));
}

#[test]
fn test_blur_rejection_never_vetoes() {
    let mut gate = GateController::new(two_field_registry());
    let outcome = gate.on_field_commit("name", "1", CommitTrigger::Blur).unwrap();
    assert_eq!(outcome.navigation, Navigation::Stay);
}

#[test]
fn test_fill_contact_form_in_order() {
    let mut gate = GateController::new(contact_registry());
    let values = contact_values();
    for (i, (id, value)) in values.iter().enumerate() {
        assert!(gate.is_interactable(id));
        if let Some((next, _)) = values.get(i + 1) {
            assert!(!gate.is_interactable(next));
        }
        gate.on_field_commit(id, value, CommitTrigger::Blur).unwrap();
    }
    assert!(gate.is_form_ready());
}

#[test]
fn test_readiness_drops_when_any_field_regresses() {
    let mut gate = GateController::new(contact_registry());
    commit_all(&mut gate, &contact_values());
    assert!(gate.is_form_ready());

    gate.on_field_commit("email", "nope", CommitTrigger::Blur).unwrap();
    assert!(!gate.is_form_ready());
    assert_eq!(gate.field_status("email").unwrap(), FieldStatus::Editable);
    // never demoted back to locked, neither are later fields
    assert!(gate.is_interactable("phone"));
    assert!(gate.is_interactable("mobile"));

    gate.on_field_commit("email", "ok@example.com", CommitTrigger::Blur).unwrap();
    assert!(gate.is_form_ready());
}

#[test]
fn test_snapshot_reflects_marks() {
    let mut gate = GateController::new(two_field_registry());
    gate.on_field_commit("name", " Jo ", CommitTrigger::Blur).unwrap();
    gate.on_field_commit("phone", "12", CommitTrigger::Blur).unwrap();

    let snapshot = gate.snapshot();
    let name = snapshot.field("name").unwrap();
    assert_eq!(name.value, "Jo");
    assert_eq!(name.mark, FieldMark::Valid);
    assert_eq!(name.status, FieldStatus::Valid);

    let phone = snapshot.field("phone").unwrap();
    assert_eq!(phone.mark, FieldMark::Invalid);
    assert_eq!(phone.status, FieldStatus::Editable);
}

#[test]
fn test_dismiss_and_enter() {
    let mut gate = GateController::new(two_field_registry());
    gate.on_field_commit("name", "", CommitTrigger::Blur).unwrap();
    assert!(gate.reporter().is_visible());
    assert!(gate.on_key(Key::Enter));
    assert!(!gate.reporter().is_visible());

    gate.on_field_commit("name", "9", CommitTrigger::Blur).unwrap();
    assert!(gate.dismiss_error());
    assert_eq!(gate.reporter().message(), "The field name is invalid. Check the format.");
}

#[test]
fn test_enter_does_not_submit() {
    let mut gate = ready_two_field_gate();
    gate.on_field_commit("phone", "1", CommitTrigger::Blur).unwrap();
    gate.on_key(Key::Enter);
    gate.on_field_commit("phone", "7654321", CommitTrigger::Blur).unwrap();
    gate.on_key(Key::Enter);
    // key presses only touch the notification
    assert!(gate.is_form_ready());
    assert_eq!(gate.state().value("phone"), Some("7654321"));
}

#[test]
fn test_labels_used_in_messages() {
    let registry = Registry::register([
        FieldDescriptor::new("phone", Rule::digits(7)).with_label("Phone number"),
    ])
    .unwrap();
    let mut gate = GateController::new(registry);
    gate.on_field_commit("phone", "", CommitTrigger::Blur).unwrap();
    assert_eq!(gate.reporter().message(), "The field Phone number cannot be empty.");
}

fn value_choice() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(""),
        Just("   "),
        Just("Jo"),
        Just(" Ana María "),
        Just("J"),
        Just("a1"),
        Just("1234567"),
        Just("3001234567"),
        Just("x@y.io"),
        Just("x@y"),
    ]
}

fn trigger_choice() -> impl Strategy<Value = CommitTrigger> {
    prop_oneof![Just(CommitTrigger::Blur), Just(CommitTrigger::ForwardNavigation)]
}

proptest! {
    #[test]
    fn prop_activation_idempotence_and_readiness(
        events in proptest::collection::vec((0usize..5, value_choice(), trigger_choice()), 1..60)
    ) {
        let mut gate = GateController::new(contact_registry());
        let ids: Vec<FieldId> = gate.registry().ids().cloned().collect();
        let mut ever_valid = vec![false; ids.len()];
        let mut regressed = false;

        for (index, value, trigger) in events {
            let id = ids[index].as_str();
            let was_valid = gate.state().validity(id) == Some(true);
            let activation_before: Vec<Option<bool>> =
                ids.iter().map(|f| gate.state().activation(f.as_str())).collect();

            match gate.on_field_commit(id, value, trigger) {
                Ok(outcome) => {
                    let after_first = gate.state().clone();
                    let again = gate.on_field_commit(id, value, trigger).unwrap();
                    prop_assert_eq!(&again, &outcome);
                    prop_assert_eq!(gate.state(), &after_first);

                    if outcome.accepted() {
                        ever_valid[index] = true;
                    } else {
                        if was_valid {
                            regressed = true;
                        }
                        let activation_after: Vec<Option<bool>> =
                            ids.iter().map(|f| gate.state().activation(f.as_str())).collect();
                        prop_assert_eq!(activation_after, activation_before);
                    }
                }
                Err(FormError::Locked(_)) => {
                    prop_assert!(!activation_before[index].unwrap_or(false));
                }
                Err(e) => prop_assert!(false, "unexpected error: {e}"),
            }

            for (i, f) in ids.iter().enumerate().skip(1) {
                if gate.state().activation(f.as_str()) == Some(true) {
                    if regressed {
                        prop_assert!(ever_valid[..i].iter().all(|v| *v));
                    } else {
                        prop_assert!(ids[..i]
                            .iter()
                            .all(|p| gate.state().validity(p.as_str()) == Some(true)));
                    }
                }
            }

            let all_valid = ids.iter().all(|f| gate.state().validity(f.as_str()) == Some(true));
            prop_assert_eq!(gate.is_form_ready(), all_valid);
        }
    }
}
