#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{connectable, connection, difference, named_flow, processor, rules, snapshot};
use flowdiff_core::{
    evaluate_batch, evaluate_flow, BatchReport, EvaluationOptions, ExError, ExErrorKind,
    FlowInput, FlowOutcome, RecordedComparator, REPORT_MARKER,
};
use serde_json::json;

fn changes() -> Vec<flowdiff_core::FlowDifference> {
    let mut added = connection("c1", connectable("p1", "Fetch"), connectable("p2", "Put"), &["success"]);
    added["componentType"] = json!("CONNECTION");
    vec![
        difference(json!({
            "differenceType": "BUNDLE_CHANGED",
            "valueA": {"group": "org.example", "artifact": "nar", "version": "1.0"},
            "valueB": {"group": "org.example", "artifact": "nar", "version": "1.1"}
        })),
        difference(json!({"differenceType": "COMPONENT_ADDED", "componentB": added})),
        difference(json!({
            "differenceType": "BUNDLE_CHANGED",
            "valueA": {"group": "org.example", "artifact": "nar", "version": "1.0"},
            "valueB": {"group": "org.example", "artifact": "nar", "version": "1.1"}
        })),
        difference(json!({"differenceType": "POSITION_CHANGED"})),
    ]
}

#[test]
fn test_rendering_is_idempotent_and_order_independent() {
    let before = named_flow("ingest", json!({}));
    let after = named_flow("ingest", json!({}));

    let forward = RecordedComparator::new(changes());
    let mut reversed_diffs = changes();
    reversed_diffs.reverse();
    let reversed = RecordedComparator::new(reversed_diffs);

    let options = EvaluationOptions::default();
    let text = |comparator: &RecordedComparator| {
        let input = FlowInput {
            source: "flows/ingest.json".to_string(),
            before: Some(before.clone()),
            after: after.clone(),
            comparator,
        };
        evaluate_flow(&input, &options).unwrap().text()
    };

    let first = text(&forward);
    assert_eq!(first, text(&forward));
    assert_eq!(first, text(&reversed));
    assert!(first.contains("#### Flow Changes\n- A connection `[success]` from `Fetch` to `Put` has been added\n"));
    // Duplicate bundle lines collapse to one
    assert_eq!(first.matches("The bundle `org.example:nar`").count(), 1);
    assert!(first.contains("\n#### Bundle Changes\n"));
}

#[test]
fn test_concurrent_tasks_scenario_end_to_end() {
    let after = named_flow("ingest", json!({"processors": [processor("p1", "Fetch", 5)]}));
    let comparator = RecordedComparator::default();
    let input = FlowInput {
        source: "flows/ingest.json".to_string(),
        before: None,
        after,
        comparator: &comparator,
    };

    let default_rules = rules(json!({"include": ["concurrentTasks"]}));
    let options = EvaluationOptions { checkstyle: true, rules: Some(&default_rules) };
    let report = evaluate_flow(&input, &options).unwrap();
    assert!(report.has_violations());
    assert_eq!(
        report.text(),
        "### Executing Flow Diff for flow: `ingest`\n\
         #### Checkstyle Violations\n\
         > [!CAUTION]\n\
         > - Processor named `Fetch` (id: `p1`) is configured with 5 concurrent tasks\n\
         \n\
         #### No changes as this is the first version of the flow\n"
    );

    let raised = rules(json!({
        "include": ["concurrentTasks"],
        "rules": {"concurrentTasks": {"overrides": {"ingest": {"limit": 10}}}}
    }));
    let options = EvaluationOptions { checkstyle: true, rules: Some(&raised) };
    let report = evaluate_flow(&input, &options).unwrap();
    assert!(!report.has_violations());
    assert!(report.text().contains("#### No Checkstyle Violations found\n"));
}

#[test]
fn test_batch_isolates_failed_flows() {
    let broken = RecordedComparator::new(vec![difference(
        json!({"differenceType": "PARAMETER_REMOVED", "fieldName": "x"}),
    )]);
    let fine = RecordedComparator::default();

    let inputs = vec![
        Ok(FlowInput {
            source: "flows/broken.json".to_string(),
            before: Some(named_flow("broken", json!({}))),
            after: named_flow("broken", json!({})),
            comparator: &broken,
        }),
        Err((
            "flows/unreadable.json".to_string(),
            ExError::new(ExErrorKind::InvalidSnapshot).with_message("not valid JSON"),
        )),
        Ok(FlowInput {
            source: "flows/fine.json".to_string(),
            before: None,
            after: named_flow("fine", json!({})),
            comparator: &fine,
        }),
    ];

    let report: BatchReport = evaluate_batch(inputs, &EvaluationOptions::default());
    assert_eq!(report.flows.len(), 3);
    assert_eq!(report.failures().count(), 2);
    assert!(matches!(report.flows[2], FlowOutcome::Evaluated(_)));

    let text = report.text();
    assert!(text.starts_with(REPORT_MARKER));
    assert!(text.contains("Identified 3 changed flows in this Pull Request.\n"));
    assert!(text.contains("### Executing Flow Diff for flow: `fine`"));
    assert!(text.contains("#### Flow evaluation failed"));
}

#[test]
fn test_blocking_violations_require_checkstyle() {
    let comparator = RecordedComparator::default();
    let flow = || FlowInput {
        source: "flows/ingest.json".to_string(),
        before: None,
        after: named_flow("ingest", json!({"processors": [processor("p1", "Fetch", 5)]})),
        comparator: &comparator,
    };

    let on = evaluate_batch(vec![Ok(flow())], &EvaluationOptions { checkstyle: true, rules: None });
    assert!(on.has_blocking_violations());

    let off = evaluate_batch(vec![Ok(flow())], &EvaluationOptions::default());
    assert!(!off.has_blocking_violations());
    assert!(!off.text().contains("Checkstyle"));
}

#[test]
fn test_unnamed_flow_matches_catch_all_exclusion() {
    // An unnamed flow is matched as the empty name, so `.*` excludes it
    let after = snapshot(json!({
        "flowContents": {"identifier": "root", "processors": [processor("p1", "Fetch", 5)]}
    }));
    let comparator = RecordedComparator::default();
    let input = FlowInput {
        source: "flows/unnamed.json".to_string(),
        before: None,
        after,
        comparator: &comparator,
    };
    let run = |document: serde_json::Value| {
        let config = rules(document);
        let options = EvaluationOptions { checkstyle: true, rules: Some(&config) };
        evaluate_flow(&input, &options).unwrap().violations
    };

    let excluded = run(json!({
        "include": ["concurrentTasks"],
        "rules": {"concurrentTasks": {"exclude": [".*"]}}
    }));
    assert!(excluded.is_empty());

    let named_only = run(json!({
        "include": ["concurrentTasks"],
        "rules": {"concurrentTasks": {"exclude": ["prod-.*"]}}
    }));
    assert_eq!(named_only.len(), 1);
}
