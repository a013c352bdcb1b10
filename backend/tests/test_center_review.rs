//! Tests for the periodic reviews: expiry sweep and backlog retry

use dispatch_center_core_rs::{CallPriority, CenterConfig, DispatchCenter, Seniority};

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

/// Register a call with a fixed duration, without routing it
fn staged_call(center: &mut DispatchCenter, priority: CallPriority, duration_sec: u64) -> String {
    let call_id = center.register_call("John Cena", priority);
    center
        .state_mut()
        .get_call_mut(&call_id)
        .unwrap()
        .set_duration_sec(duration_sec);
    call_id
}

#[test]
fn test_review_active_calls() {
    let mut center = center(5, 0, 0, 0);

    for i in 0..5 {
        let duration = if i % 2 == 0 { 1 } else { 99_999 };
        let call_id = staged_call(&mut center, CallPriority::Low, duration);
        center.assign_call(&call_id).unwrap();
    }
    assert_eq!(center.active_call_count(), 5);

    center.advance_time(1);
    let review = center.review_active_calls(Some(false)).unwrap();

    assert_eq!(review.terminated.len(), 3);
    assert!(review.escalated.is_empty());
    assert_eq!(center.active_call_count(), 2);
    assert_eq!(center.free_staff(), 3);
}

#[test]
fn test_review_preserves_order_of_survivors() {
    let mut center = center(5, 0, 0, 0);
    let mut ids = Vec::new();

    for duration in [1, 50, 1, 60, 70] {
        let call_id = staged_call(&mut center, CallPriority::Low, duration);
        center.assign_call(&call_id).unwrap();
        ids.push(call_id);
    }

    center.advance_time(1);
    center.review_active_calls(Some(false)).unwrap();

    assert_eq!(
        center.state().active_calls(),
        &[ids[1].clone(), ids[3].clone(), ids[4].clone()]
    );
}

#[test]
fn test_nothing_expires_early() {
    let mut center = center(2, 0, 0, 0);
    let call_id = staged_call(&mut center, CallPriority::Low, 5);
    center.assign_call(&call_id).unwrap();

    center.advance_time(4);
    assert_eq!(center.review_active_calls(Some(false)).unwrap().expired(), 0);

    center.advance_time(1);
    assert_eq!(center.review_active_calls(Some(false)).unwrap().expired(), 1);
}

#[test]
fn test_backlogged_calls_never_expire() {
    let mut center = center(0, 0, 0, 0);
    let call_id = staged_call(&mut center, CallPriority::Low, 1);
    center.assign_call(&call_id).unwrap();
    assert_eq!(center.backlog_len(), 1);

    center.advance_time(1_000);
    assert_eq!(center.review_active_calls(None).unwrap().expired(), 0);
    assert_eq!(center.backlog_len(), 1);
}

#[test]
fn test_review_backlog() {
    let mut center = center(2, 2, 1, 0);

    let priorities = [CallPriority::High; 2]
        .into_iter()
        .chain([CallPriority::Low; 5]);
    for priority in priorities {
        let call_id = staged_call(&mut center, priority, 1);
        center.state_mut().enqueue_backlog(call_id);
    }

    // One High to the Manager, four Lows to Juniors and Seniors
    let review = center.review_backlog().unwrap();
    assert_eq!(review.assigned.len(), 5);
    assert_eq!(review.requeued, 2);
    assert_eq!(center.backlog_len(), 2);
    assert_eq!(center.free_staff(), 0);

    center.advance_time(1);
    center.review_active_calls(Some(false)).unwrap();
    assert_eq!(center.active_call_count(), 0);
    assert_eq!(center.free_staff(), 5);

    // The remaining High and Low
    center.review_backlog().unwrap();
    assert_eq!(center.backlog_len(), 0);
    assert_eq!(center.free_staff(), 3);
    assert_eq!(center.free_staff_in(Seniority::Manager), 0);

    center.advance_time(1);
    center.review_active_calls(Some(false)).unwrap();
    assert_eq!(center.active_call_count(), 0);
    assert_eq!(center.backlog_len(), 0);
    assert_eq!(center.free_staff(), 5);
}

#[test]
fn test_backlog_is_fifo() {
    let mut center = center(1, 0, 0, 0);
    let busy = staged_call(&mut center, CallPriority::Low, 1);
    center.assign_call(&busy).unwrap();

    let waiting: Vec<String> = ["A", "B", "C"]
        .iter()
        .map(|name| center.dispatch_call(name, CallPriority::Low).unwrap().call_id)
        .collect();
    assert_eq!(center.backlog_len(), 3);

    for expected in &waiting {
        center.advance_time(1);
        center.review_active_calls(Some(false)).unwrap();
        let review = center.review_backlog().unwrap();

        assert_eq!(&review.assigned, &[expected.clone()]);
        // Give every call a 1s duration so the next round frees the Junior
        center
            .state_mut()
            .get_call_mut(expected)
            .unwrap()
            .set_duration_sec(1);
    }
    assert_eq!(center.backlog_len(), 0);
}

#[test]
fn test_failed_retries_keep_relative_order() {
    let mut center = center(0, 0, 0, 0);
    let ids: Vec<String> = (0..3)
        .map(|_| center.dispatch_call("x", CallPriority::Low).unwrap().call_id)
        .collect();

    let review = center.review_backlog().unwrap();
    assert_eq!(review.requeued, 3);
    assert_eq!(center.state().backlog().iter().cloned().collect::<Vec<_>>(), ids);
}

#[test]
fn test_dispatch_call() {
    let mut center = center(2, 2, 2, 0);

    for _ in 0..5 {
        center.dispatch_call("John Cena", CallPriority::High).unwrap();
    }

    assert_eq!(center.active_call_count(), 2);
    assert_eq!(center.backlog_len(), 3);
    assert_eq!(center.free_staff_in(Seniority::Junior), 2);
    assert_eq!(center.free_staff_in(Seniority::Senior), 2);

    let status = center.status();
    assert_eq!(status.tier(Seniority::Manager).free, 0);
    assert_eq!(status.backlog, 3);
    assert!(status.to_string().contains("## Active Calls: 2"));
}

#[test]
fn test_escalation_during_review_rejoins_tail() {
    let mut center = center(2, 0, 1, 0);
    let short = staged_call(&mut center, CallPriority::Low, 1);
    let long = staged_call(&mut center, CallPriority::Low, 100);
    center.assign_call(&short).unwrap();
    center.assign_call(&long).unwrap();

    center.advance_time(1);
    let review = center.review_active_calls(Some(true)).unwrap();
    assert_eq!(review.escalated, vec![short.clone()]);

    // Survivor first, escalated call re-appended behind it
    assert_eq!(center.state().active_calls(), &[long, short.clone()]);
    let call = center.state().get_call(&short).unwrap();
    assert_eq!(call.priority(), CallPriority::High);
    assert_eq!(call.assigned_at(), Some(1));
    center.state().validate_invariants().unwrap();
}

#[test]
fn test_backlog_pickup_records_current_time() {
    let mut center = center(1, 0, 0, 0);
    let first = staged_call(&mut center, CallPriority::Low, 2);
    let waiting = staged_call(&mut center, CallPriority::Low, 5);
    center.assign_call(&first).unwrap();
    center.assign_call(&waiting).unwrap();
    assert_eq!(center.backlog_len(), 1);

    center.advance_time(2);
    center.review_active_calls(Some(false)).unwrap();
    let review = center.review_backlog().unwrap();
    assert_eq!(review.assigned, vec![waiting.clone()]);
    assert_eq!(center.state().get_call(&waiting).unwrap().assigned_at(), Some(2));
}
