#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{named_flow, processor, rules};
use flowdiff_core::logging_facility::init_test_capture;
use flowdiff_core::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND,
    FIELD_VIOLATION_COUNT,
};
use flowdiff_core::{evaluate_flow, EvaluationOptions, FlowInput, RecordedComparator};
use serde_json::json;

#[test]
fn test_evaluate_flow_emits_start_and_end() {
    let capture = init_test_capture();
    let comparator = RecordedComparator::default();
    let input = FlowInput {
        source: "flows/logged.json".to_string(),
        before: None,
        after: named_flow("logged-flow", json!({"processors": [processor("p1", "Fetch", 9)]})),
        comparator: &comparator,
    };

    evaluate_flow(&input, &EvaluationOptions { checkstyle: true, rules: None }).unwrap();

    let events = capture.for_flow("evaluate_flow", "logged-flow");
    assert!(events.iter().any(|e| e.event() == Some(EVENT_START)));
    let end = events
        .iter()
        .find(|e| e.event() == Some(EVENT_END))
        .expect("end event");
    assert_eq!(end.field(FIELD_VIOLATION_COUNT), Some("1"));
    assert!(end.field(FIELD_DURATION_MS).is_some());
    capture.assert_event_exists("run_checkstyle", EVENT_END);
}

#[test]
fn test_contract_violation_logs_end_error() {
    let capture = init_test_capture();
    let comparator = RecordedComparator::new(vec![serde_json::from_value(
        json!({"differenceType": "PARAMETER_REMOVED"}),
    )
    .unwrap()]);
    let input = FlowInput {
        source: "flows/contract.json".to_string(),
        before: Some(named_flow("contract-flow", json!({}))),
        after: named_flow("contract-flow", json!({})),
        comparator: &comparator,
    };

    let err = evaluate_flow(&input, &EvaluationOptions::default()).unwrap_err();
    assert_eq!(err.flow(), Some("contract-flow"));

    let errors = capture
        .for_flow("evaluate_flow", "contract-flow")
        .into_iter()
        .filter(|e| e.event() == Some(EVENT_END_ERROR))
        .count();
    assert_eq!(errors, 1);
    assert_eq!(
        capture.count(|e| e.op() == Some("render_differences")
            && e.field(FIELD_ERR_CODE) == Some("ERR_CONTRACT_VIOLATION")
            && e.field(FIELD_ERR_KIND) == Some("ContractViolation")),
        1
    );
}

#[test]
fn test_negative_concurrency_limit_is_warned() {
    let capture = init_test_capture();
    let config = rules(json!({
        "include": ["concurrentTasks"],
        "rules": {"concurrentTasks": {"parameters": {"limit": -3}}}
    }));
    let comparator = RecordedComparator::default();
    let input = FlowInput {
        source: "flows/negative.json".to_string(),
        before: None,
        after: named_flow("negative-limit", json!({"processors": [processor("p1", "Fetch", 3)]})),
        comparator: &comparator,
    };

    let report = evaluate_flow(&input, &EvaluationOptions { checkstyle: true, rules: Some(&config) })
        .unwrap();

    // Default limit of 2 applies
    assert_eq!(report.violations.len(), 1);
    assert_eq!(
        capture.count(|e| e.level == tracing::Level::WARN
            && e.field("rule_id") == Some("concurrentTasks")
            && e.field("value") == Some("-3")),
        1
    );
}
