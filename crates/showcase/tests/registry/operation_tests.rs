use chrono::{DateTime, Duration};
use showcase::{
    Clock, Code, ManualClock, OperationOutcome, OperationSpec, OperationState, Showcase,
    ShowcaseConfig, StatusSpec,
};
use std::sync::Arc;
use test_log::test;

fn showcase_with_clock() -> (Arc<ManualClock>, Showcase) {
    let clock = Arc::new(ManualClock::new(
        DateTime::from_timestamp(1_800_000_000, 0).unwrap(),
    ));
    let showcase = Showcase::with_clock(ShowcaseConfig::default(), clock.clone());
    (clock, showcase)
}

#[test]
fn test_completed_in_past_returns_done_with_success() {
    let (clock, showcase) = showcase_with_clock();
    let op = showcase.start_operation(OperationSpec {
        completion_time: Some(clock.now() - Duration::seconds(1)),
        error: None,
        success: Some("x".to_string()),
    });
    assert_eq!(
        op.state,
        OperationState::Done(OperationOutcome::Succeeded {
            content: "x".to_string()
        })
    );
}

#[test]
fn test_future_completion_is_pending_with_time_remaining() {
    let (clock, showcase) = showcase_with_clock();
    let op = showcase.start_operation(OperationSpec {
        completion_time: Some(clock.now() + Duration::seconds(60)),
        ..Default::default()
    });
    let polled = showcase.get_operation(&op.name).unwrap();
    assert_eq!(polled.time_remaining(), Some(Duration::seconds(60)));
}

#[test]
fn test_missing_completion_time_completes_immediately() {
    let (_, showcase) = showcase_with_clock();
    let op = showcase.start_operation(OperationSpec::default());
    assert!(op.is_done());
}

#[test]
fn test_concurrent_polls_observe_one_terminal_outcome() {
    let (clock, showcase) = showcase_with_clock();
    let showcase = Arc::new(showcase);
    let op = showcase.start_operation(OperationSpec {
        completion_time: Some(clock.now() + Duration::seconds(5)),
        error: Some(StatusSpec::new(Code::ResourceExhausted, "quota")),
        success: None,
    });
    clock.advance(Duration::seconds(5));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let showcase = Arc::clone(&showcase);
            let name = op.name.clone();
            std::thread::spawn(move || showcase.get_operation(&name).unwrap())
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let expected = OperationState::Done(OperationOutcome::Failed(StatusSpec::new(
        Code::ResourceExhausted,
        "quota",
    )));
    assert!(results.iter().all(|r| r.state == expected));
}

#[test]
fn test_list_reflects_current_state() {
    let (clock, showcase) = showcase_with_clock();
    let pending = showcase.start_operation(OperationSpec {
        completion_time: Some(clock.now() + Duration::seconds(30)),
        ..Default::default()
    });
    let done = showcase.start_operation(OperationSpec::default());

    let (ops, token) = showcase.list_operations(0, "").unwrap();
    assert!(token.is_empty());
    assert_eq!(ops.len(), 2);
    let find = |name: &str| ops.iter().find(|o| o.name == name).unwrap().clone();
    assert!(!find(&pending.name).is_done());
    assert!(find(&done.name).is_done());

    showcase.delete_operation(&done.name).unwrap();
    let (ops, _) = showcase.list_operations(0, "").unwrap();
    assert_eq!(ops.len(), 1);
}
