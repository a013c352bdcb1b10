//! Property-based tests: random driver sequences never break the center's
//! membership and eligibility invariants.

use dispatch_center_core_rs::{CallPriority, CenterConfig, DispatchCenter, Seniority};
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    Dispatch(CallPriority),
    Advance(u64),
    ReviewActive(Option<bool>),
    ReviewBacklog,
    Tick,
}

fn priority_strategy() -> impl Strategy<Value = CallPriority> {
    prop_oneof![Just(CallPriority::Low), Just(CallPriority::High)]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => priority_strategy().prop_map(Op::Dispatch),
        2 => (1u64..6).prop_map(Op::Advance),
        2 => prop::option::of(any::<bool>()).prop_map(Op::ReviewActive),
        2 => Just(Op::ReviewBacklog),
        1 => Just(Op::Tick),
    ]
}

fn config_strategy() -> impl Strategy<Value = CenterConfig> {
    (0i32..4, 0i32..3, 0i32..3, 0i32..3, 1u64..15, 0.0f64..=1.0, any::<u64>()).prop_map(
        |(juniors, seniors, managers, directors, max_call_duration_sec, prob, rng_seed)| {
            CenterConfig {
                juniors,
                seniors,
                managers,
                directors,
                max_call_duration_sec,
                call_escalation_prob: prob,
                rng_seed,
                arrivals: None,
            }
        },
    )
}

fn check_center(center: &DispatchCenter) -> Result<(), TestCaseError> {
    let state = center.state();
    prop_assert_eq!(state.validate_invariants(), Ok(()));

    // Every call in the table is either working or waiting
    prop_assert_eq!(state.num_calls(), state.active_len() + state.backlog_len());

    let unique: HashSet<&String> = state.active_calls().iter().collect();
    prop_assert_eq!(unique.len(), state.active_len(), "duplicate active entry");

    for id in state.active_calls() {
        let call = state.get_call(id).expect("active call in table");
        let handle = call.assigned_to().expect("active call assigned");
        prop_assert!(
            call.priority().assignment_order().contains(&handle.seniority()),
            "{} call held by a {}",
            call.priority(),
            handle.seniority()
        );
        let employee = state.registry().get(handle).expect("handle resolves");
        prop_assert!(!employee.is_free());
        if call.priority() == CallPriority::Low {
            prop_assert_ne!(handle.seniority(), Seniority::Director);
        }
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: no driver sequence breaks membership or eligibility
    #[test]
    fn random_driver_sequences_keep_invariants(
        config in config_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let mut center = DispatchCenter::new(config).unwrap();

        for op in ops {
            match op {
                Op::Dispatch(priority) => {
                    center.dispatch_call("Prop Caller", priority).unwrap();
                }
                Op::Advance(seconds) => center.advance_time(seconds),
                Op::ReviewActive(escalate) => {
                    center.review_active_calls(escalate).unwrap();
                }
                Op::ReviewBacklog => {
                    center.review_backlog().unwrap();
                }
                Op::Tick => {
                    center.tick().unwrap();
                }
            }
            check_center(&center)?;
        }
    }

    /// Property: a backlog pass retries each waiting call exactly once
    #[test]
    fn backlog_pass_accounts_for_every_call(
        config in config_strategy(),
        priorities in prop::collection::vec(priority_strategy(), 0..30),
    ) {
        let staffless = CenterConfig { juniors: 0, seniors: 0, managers: 0, directors: 0, ..config.clone() };
        let mut center = DispatchCenter::new(staffless).unwrap();
        for priority in &priorities {
            center.dispatch_call("Prop Caller", *priority).unwrap();
        }
        prop_assert_eq!(center.backlog_len(), priorities.len());

        let review = center.review_backlog().unwrap();
        prop_assert_eq!(review.assigned.len(), 0);
        prop_assert_eq!(review.requeued, priorities.len());
        prop_assert_eq!(center.backlog_len(), priorities.len());
    }

    /// Property: forcing escalation off terminates every expired call
    #[test]
    fn non_escalating_sweep_frees_all_expired(
        config in config_strategy(),
        priorities in prop::collection::vec(priority_strategy(), 0..20),
    ) {
        let max = config.max_call_duration_sec;
        let mut center = DispatchCenter::new(config).unwrap();
        for priority in &priorities {
            center.dispatch_call("Prop Caller", *priority).unwrap();
        }
        let active_before = center.active_call_count();

        center.advance_time(max);
        let review = center.review_active_calls(Some(false)).unwrap();

        prop_assert_eq!(review.terminated.len(), active_before);
        prop_assert!(review.escalated.is_empty());
        prop_assert_eq!(center.active_call_count(), 0);
        prop_assert_eq!(center.free_staff(), center.total_staff());
    }
}
