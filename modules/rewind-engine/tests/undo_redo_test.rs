//! Undo/Redo over committed History, end to end through the frame hook.

mod support;

use proptest::prelude::*;
use rewind_engine::EventKind;
use support::*;

// =========================================================================
// Walkthrough
// =========================================================================

#[test]
fn counter_walkthrough() {
    let mut system = scene();

    assert_eq!(increment(&mut system, 5), INCREMENT);
    assert_eq!(counter(&system), 5);
    assert_eq!(system.history().len(), 1);

    assert_eq!(commit(&mut system, BUMP, Increment { delta: 3 }), BUMP);
    assert_eq!(counter(&system), 8);
    assert_eq!(system.history().len(), 2);

    assert_eq!(undo(&mut system), EventKind::UNDO);
    assert_eq!(counter(&system), 5);
    assert_eq!(system.history().kinds(), vec![INCREMENT, BUMP, EventKind::UNDO]);

    assert_eq!(undo(&mut system), EventKind::UNDO);
    assert_eq!(counter(&system), 0);
    assert_eq!(system.history().len(), 4);

    assert_eq!(undo(&mut system), EventKind::NOOP);
    assert_eq!(counter(&system), 0);
    assert_eq!(system.history().len(), 4);

    assert_eq!(redo(&mut system), EventKind::REDO);
    assert_eq!(counter(&system), 5);
    assert_eq!(system.history().len(), 5);
}

// =========================================================================
// Round trips
// =========================================================================

#[test]
fn undo_restores_pre_image() {
    let mut system = scene();
    commit(&mut system, SLIDE, Slide::to(12));
    increment(&mut system, -4);
    assert_eq!(counter(&system), 8);

    undo(&mut system);
    assert_eq!(counter(&system), 12);
    undo(&mut system);
    assert_eq!(counter(&system), 0);
}

#[test]
fn n_undos_roll_back_n_commits() {
    let mut system = scene();
    for delta in 1..=6 {
        increment(&mut system, delta);
    }
    assert_eq!(counter(&system), 21);

    for _ in 0..6 {
        assert_eq!(undo(&mut system), EventKind::UNDO);
    }
    assert_eq!(counter(&system), 0);
    assert_eq!(undo(&mut system), EventKind::NOOP);
    assert!(!system.can_undo());
    assert!(system.can_redo());
}

#[test]
fn undo_then_redo_matches_plain_commit() {
    let mut system = scene();
    increment(&mut system, 7);
    undo(&mut system);
    redo(&mut system);

    assert_eq!(counter(&system), 7);
    assert_eq!(
        system.history().kinds(),
        vec![INCREMENT, EventKind::UNDO, EventKind::REDO]
    );
    assert!(system.can_undo());
    assert!(!system.can_redo());
}

#[test]
fn undoing_a_redo_undoes_the_action_again() {
    let mut system = scene();
    increment(&mut system, 2);
    undo(&mut system);
    redo(&mut system);
    undo(&mut system);
    assert_eq!(counter(&system), 0);
    redo(&mut system);
    assert_eq!(counter(&system), 2);
    assert_eq!(system.history().len(), 5);
}

#[test]
fn new_commit_after_undo_discards_redo() {
    let mut system = scene();
    increment(&mut system, 1);
    increment(&mut system, 10);
    undo(&mut system);
    increment(&mut system, 100);

    assert!(!system.can_redo());
    assert_eq!(redo(&mut system), EventKind::NOOP);
    assert_eq!(counter(&system), 101);

    undo(&mut system);
    undo(&mut system);
    assert_eq!(counter(&system), 0);
}

// =========================================================================
// Continuations and side effects
// =========================================================================

#[test]
fn one_undo_reverts_a_whole_drag() {
    let mut system = scene();
    increment(&mut system, 3);
    commit(&mut system, SLIDE, Slide::to(10));
    commit(&mut system, SLIDE, Slide::to(20));
    commit(&mut system, SLIDE, Slide::to(30));
    assert_eq!(system.history().len(), 2);

    undo(&mut system);
    assert_eq!(counter(&system), 3);

    redo(&mut system);
    assert_eq!(counter(&system), 30);
}

#[test]
fn side_effects_unwind_newest_first_before_their_cause() {
    let mut system = scene();
    increment(&mut system, 2);
    commit(&mut system, AUDIT, Audit::line("a"));
    commit(&mut system, AUDIT, Audit::line("b"));
    assert_eq!(system.history().len(), 2);

    assert_eq!(undo(&mut system), EventKind::UNDO);
    assert_eq!(trail(&system), vec!["audit:b", "audit:a"]);
    assert!(audit_lines(&system).is_empty());
    assert_eq!(counter(&system), 0);
}

#[test]
fn side_effects_redo_in_order_after_their_cause() {
    let mut system = scene();
    increment(&mut system, 2);
    commit(&mut system, AUDIT, Audit::line("a"));
    commit(&mut system, AUDIT, Audit::line("b"));
    undo(&mut system);

    assert_eq!(redo(&mut system), EventKind::REDO);
    assert_eq!(counter(&system), 2);
    assert_eq!(audit_lines(&system), vec!["a", "b"]);
}

#[test]
fn side_effects_stay_with_their_own_cause() {
    let mut system = scene();
    increment(&mut system, 1);
    commit(&mut system, AUDIT, Audit::line("first"));
    increment(&mut system, 10);
    commit(&mut system, AUDIT, Audit::line("second"));

    undo(&mut system);
    assert_eq!(counter(&system), 1);
    assert_eq!(audit_lines(&system), vec!["first"]);

    undo(&mut system);
    assert_eq!(counter(&system), 0);
    assert!(audit_lines(&system).is_empty());
}

#[test]
fn redo_fails_when_the_action_declines_to_rerun() {
    let mut system = scene();
    assert_eq!(commit(&mut system, ONCE, Once::default()), ONCE);
    assert_eq!(undo(&mut system), EventKind::UNDO);
    assert_eq!(counter(&system), 0);

    assert_eq!(redo(&mut system), EventKind::NOOP);
    assert_eq!(counter(&system), 0);
    assert_eq!(system.history().kinds(), vec![ONCE, EventKind::UNDO]);
    assert!(system.can_redo());
}

#[test]
fn declined_side_effect_does_not_stop_the_rest_on_redo() {
    let mut system = scene();
    increment(&mut system, 1);
    assert_eq!(commit(&mut system, ONCE_EFFECT, Once::default()), ONCE_EFFECT);
    assert_eq!(commit(&mut system, AUDIT, Audit::line("a")), AUDIT);
    assert_eq!(counter(&system), 2);
    assert_eq!(system.history().len(), 2);

    undo(&mut system);
    assert_eq!(counter(&system), 0);
    assert!(audit_lines(&system).is_empty());

    assert_eq!(redo(&mut system), EventKind::REDO);
    assert_eq!(counter(&system), 1);
    assert_eq!(audit_lines(&system), vec!["a"]);
    assert_eq!(system.history().len(), 4);
}

#[test]
fn side_effect_after_an_undo_is_never_unwound() {
    let mut system = scene();
    increment(&mut system, 4);
    undo(&mut system);
    commit(&mut system, AUDIT, Audit::line("orphan"));

    assert_eq!(redo(&mut system), EventKind::REDO);
    assert_eq!(counter(&system), 4);
    assert_eq!(undo(&mut system), EventKind::UNDO);
    assert_eq!(audit_lines(&system), vec!["orphan"]);
}

// =========================================================================
// Against a two-stack reference
// =========================================================================

#[derive(Debug, Clone, Copy)]
enum Op {
    Add(i64),
    Undo,
    Redo,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1i64..50).prop_map(Op::Add),
        3 => Just(Op::Undo),
        2 => Just(Op::Redo),
    ]
}

proptest! {
    #[test]
    fn prop_counter_tracks_two_stack_model(ops in prop::collection::vec(arb_op(), 1..30)) {
        let mut system = scene();
        let mut applied: Vec<i64> = Vec::new();
        let mut undone: Vec<i64> = Vec::new();

        for op in ops {
            match op {
                Op::Add(delta) => {
                    prop_assert_eq!(increment(&mut system, delta), INCREMENT);
                    applied.push(delta);
                    undone.clear();
                }
                Op::Undo => {
                    let expected = if applied.is_empty() { EventKind::NOOP } else { EventKind::UNDO };
                    prop_assert_eq!(undo(&mut system), expected);
                    if let Some(delta) = applied.pop() {
                        undone.push(delta);
                    }
                }
                Op::Redo => {
                    let expected = if undone.is_empty() { EventKind::NOOP } else { EventKind::REDO };
                    prop_assert_eq!(redo(&mut system), expected);
                    if let Some(delta) = undone.pop() {
                        applied.push(delta);
                    }
                }
            }
            prop_assert_eq!(counter(&system), applied.iter().sum::<i64>());
            prop_assert_eq!(system.can_undo(), !applied.is_empty());
            prop_assert_eq!(system.can_redo(), !undone.is_empty());
        }
    }
}
