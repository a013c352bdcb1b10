//! Tests for ending calls and Low → High escalation

use dispatch_center_core_rs::{
    Call, CallError, CallPriority, Caller, CenterConfig, DispatchCenter, DispatchError,
    EndOutcome, Placement, RngManager, RoutingError, ScriptedSource, Seniority,
};

fn center(juniors: i32, seniors: i32, managers: i32, directors: i32) -> DispatchCenter {
    DispatchCenter::new(CenterConfig {
        juniors,
        seniors,
        managers,
        directors,
        max_call_duration_sec: 10,
        call_escalation_prob: 0.1,
        ..CenterConfig::default()
    })
    .unwrap()
}

#[test]
fn test_end_call_do_not_escalate() {
    let mut center = center(1, 0, 0, 0);
    let call_id = center.register_call("John Cena", CallPriority::Low);

    // Cannot end an unassigned call
    let err = center.end_call(&call_id, None).unwrap_err();
    assert_eq!(
        err,
        DispatchError::Routing(RoutingError::Call(CallError::NotAssigned {
            call_id: call_id.clone(),
        }))
    );

    center.assign_call(&call_id).unwrap();
    assert_eq!(center.free_staff(), 0);

    let outcome = center.end_call(&call_id, Some(false)).unwrap();
    assert_eq!(outcome, EndOutcome::Terminated { released_uid: 0 });

    assert_eq!(center.free_staff(), 1);
    assert_eq!(center.active_call_count(), 0);
    assert_eq!(center.backlog_len(), 0);
    // Terminated calls leave the center
    assert!(center.state().get_call(&call_id).is_none());
}

#[test]
fn test_end_call_do_escalate() {
    let mut center = center(1, 1, 1, 0);
    let receipt = center.dispatch_call("John Cena", CallPriority::Low).unwrap();
    let initial = match receipt.placement {
        Placement::Assigned { employee_uid, .. } => employee_uid,
        other => panic!("expected assignment, got {:?}", other),
    };

    let outcome = center.end_call(&receipt.call_id, Some(true)).unwrap();
    assert!(!outcome.is_terminated());

    let junior = &center.state().registry().tier(Seniority::Junior)[0];
    assert!(junior.is_free());
    assert_eq!(center.active_call_count(), 1);

    let call = center.state().get_call(&receipt.call_id).unwrap();
    assert_eq!(call.priority(), CallPriority::High);
    let handle = call.assigned_to().unwrap();
    assert_eq!(handle.seniority(), Seniority::Manager);
    assert_ne!(handle.uid(), initial);
    assert_eq!(center.backlog_len(), 0);
}

#[test]
fn test_escalation_from_only_free_manager() {
    // Juniors and Seniors absent: the Low call lands on a Manager
    let mut center = center(0, 0, 1, 1);
    let receipt = center.dispatch_call("John Cena", CallPriority::Low).unwrap();
    assert_eq!(
        receipt.placement,
        Placement::Assigned {
            employee_uid: 0,
            seniority: Seniority::Manager,
        }
    );

    center.end_call(&receipt.call_id, Some(true)).unwrap();

    // Escalated to the Director, not back to the same Manager
    let handle = center
        .state()
        .get_call(&receipt.call_id)
        .unwrap()
        .assigned_to()
        .unwrap();
    assert_eq!(handle.seniority(), Seniority::Director);
    assert_eq!(handle.uid(), 1);
    assert_eq!(center.free_staff_in(Seniority::Manager), 1);
}

#[test]
fn test_escalation_without_senior_staff_backlogs() {
    let mut center = center(0, 0, 1, 0);
    let receipt = center.dispatch_call("John Cena", CallPriority::Low).unwrap();

    let outcome = center.end_call(&receipt.call_id, Some(true)).unwrap();
    assert_eq!(
        outcome,
        EndOutcome::Escalated {
            released_uid: 0,
            placement: Placement::Backlogged { backlog_len: 1 },
        }
    );
    assert_eq!(center.active_call_count(), 0);
    assert_eq!(center.free_staff(), 1);

    // The freed Manager picks it up on the next backlog pass
    let review = center.review_backlog().unwrap();
    assert_eq!(review.assigned, vec![receipt.call_id.clone()]);
    assert_eq!(center.active_call_count(), 1);
}

#[test]
fn test_high_priority_end_terminates() {
    let mut center = center(0, 0, 1, 1);
    let receipt = center.dispatch_call("John Cena", CallPriority::High).unwrap();

    let outcome = center.end_call(&receipt.call_id, Some(true)).unwrap();
    assert!(outcome.is_terminated());
    assert_eq!(center.free_staff(), 2);
    assert_eq!(center.event_log().events_of_type("CallEscalated").len(), 0);
}

#[test]
fn test_end_twice_fails() {
    let mut center = center(1, 0, 0, 0);
    let receipt = center.dispatch_call("John Cena", CallPriority::Low).unwrap();
    center.end_call(&receipt.call_id, Some(false)).unwrap();

    assert!(center.end_call(&receipt.call_id, Some(false)).is_err());
    assert_eq!(center.free_staff(), 1);
}

#[test]
fn test_escalation_events() {
    let mut center = center(1, 0, 1, 0);
    let receipt = center.dispatch_call("John Cena", CallPriority::Low).unwrap();
    center.end_call(&receipt.call_id, Some(true)).unwrap();

    let history: Vec<&str> = center
        .event_log()
        .events_for_call(&receipt.call_id)
        .iter()
        .map(|e| e.event_type())
        .collect();
    assert_eq!(
        history,
        vec![
            "CallReceived",
            "CallAssigned",
            "CallEnded",
            "CallEscalated",
            "CallAssigned",
        ]
    );
}

#[test]
fn test_random_escalation_rate() {
    let call = Call::new(
        Caller {
            uid: 0,
            name: "John Cena".to_string(),
        },
        CallPriority::Low,
        0,
        10,
        0.23,
    );
    let mut rng = RngManager::new(12345);

    let escalations = (0..10_000)
        .filter(|_| call.should_escalate(None, &mut rng))
        .count();
    let rate = escalations as f64 / 10_000.0;

    assert!((rate - 0.23).abs() < 0.1, "escalation rate {} too far from 0.23", rate);
}

#[test]
fn test_injected_source_drives_unforced_escalation() {
    // Draws: duration (0 → 1s), call id, then escalation (0.0 < p → escalate)
    let rng = Box::new(ScriptedSource::new(vec![0]));
    let mut center = DispatchCenter::with_random_source(
        CenterConfig {
            juniors: 1,
            seniors: 0,
            managers: 1,
            directors: 0,
            call_escalation_prob: 0.5,
            ..CenterConfig::default()
        },
        rng,
    )
    .unwrap();

    let receipt = center.dispatch_call("John Cena", CallPriority::Low).unwrap();
    let outcome = center.end_call(&receipt.call_id, None).unwrap();
    assert!(!outcome.is_terminated());
}

#[test]
fn test_repeating_source_still_yields_unique_ids() {
    let rng = Box::new(ScriptedSource::new(vec![0]));
    let mut center = DispatchCenter::with_random_source(CenterConfig::default(), rng).unwrap();

    let first = center.dispatch_call("a", CallPriority::Low).unwrap();
    let second = center.dispatch_call("b", CallPriority::Low).unwrap();
    assert_ne!(first.call_id, second.call_id);
    assert_eq!(center.state().num_calls(), 2);
}
