use std::fs;
use tempfile::NamedTempFile;
use workflow_cpm::config::{AnalysisMode, load_analysis_config};
use workflow_cpm::persistence::{
    PersistenceError, load_workflow_from_json, save_schedule_to_csv, save_schedule_to_json,
    save_workflow_to_json, workflow_from_json_str,
};
use workflow_cpm::{CpmAnalyzer, Dependency, Schedule, Task, WorkflowError, WorkflowGraph};

const DIAMOND_JSON: &str = r#"{
  "directed": true,
  "graph": { "name": "demo" },
  "nodes": [
    { "id": "A", "execution_time": 10 },
    { "id": "B", "execution_time": 25 },
    { "id": "C", "execution_time": 20 },
    { "id": "D", "execution_time": 5 }
  ],
  "links": [
    { "source": "A", "target": "B", "data_amount": 20 },
    { "source": "A", "target": "C", "data_amount": 20 },
    { "source": "B", "target": "D", "data_amount": 20 },
    { "source": "C", "target": "D", "data_amount": 20 }
  ]
}"#;

#[test]
fn parses_node_link_document() {
    let graph = workflow_from_json_str(DIAMOND_JSON).unwrap();
    assert_eq!(graph.name(), "demo");
    assert_eq!(graph.task_count(), 4);
    assert_eq!(graph.dependency_count(), 4);
    assert_eq!(graph.task("B").unwrap().execution_time, 25.0);
    let schedule = CpmAnalyzer::transfer_weighted(&graph, 10.0).analyze().unwrap();
    assert_eq!(schedule.earliest_completion_time(), 44.0);
}

#[test]
fn workflow_json_round_trip() {
    let mut graph = WorkflowGraph::new("round-trip");
    graph.add_task(Task::new("Start", 1.5)).unwrap();
    graph.add_task(Task::new("End", 2.0)).unwrap();
    graph
        .add_dependency(Dependency::new("Start", "End", 12.0))
        .unwrap();

    let tmp = NamedTempFile::new().unwrap();
    save_workflow_to_json(&graph, tmp.path()).unwrap();
    let loaded = load_workflow_from_json(tmp.path()).unwrap();

    assert_eq!(loaded.name(), "round-trip");
    assert_eq!(
        loaded.tasks().cloned().collect::<Vec<_>>(),
        graph.tasks().cloned().collect::<Vec<_>>()
    );
    assert_eq!(loaded.outgoing("Start")[0].1.data_amount, 12.0);
}

#[test]
fn rejects_documents_with_unknown_endpoints() {
    let input = r#"{"graph":{"name":"x"},"nodes":[{"id":"A","execution_time":1}],
        "links":[{"source":"A","target":"Q","data_amount":1}]}"#;
    let err = workflow_from_json_str(input).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::Workflow(WorkflowError::UnknownEndpoint { .. })
    ));
}

#[test]
fn rejects_documents_with_duplicate_ids() {
    let input = r#"{"graph":{"name":"x"},"nodes":[{"id":"A","execution_time":1},{"id":"A","execution_time":2}]}"#;
    let err = workflow_from_json_str(input).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::Workflow(WorkflowError::DuplicateTask(_))
    ));
}

#[test]
fn malformed_json_is_a_serialization_error() {
    let err = workflow_from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, PersistenceError::Serialization(_)));
}

#[test]
fn schedule_json_export_reads_back() {
    let graph = workflow_from_json_str(DIAMOND_JSON).unwrap();
    let schedule = CpmAnalyzer::new(&graph).analyze().unwrap();
    let tmp = NamedTempFile::new().unwrap();
    save_schedule_to_json(&schedule, tmp.path()).unwrap();

    let restored: Schedule = serde_json::from_str(&fs::read_to_string(tmp.path()).unwrap()).unwrap();
    assert_eq!(restored, schedule);
}

#[test]
fn schedule_csv_has_one_row_per_task() {
    let graph = workflow_from_json_str(DIAMOND_JSON).unwrap();
    let schedule = CpmAnalyzer::new(&graph).analyze().unwrap();
    let tmp = NamedTempFile::new().unwrap();
    save_schedule_to_csv(&schedule, tmp.path()).unwrap();

    let mut reader = csv::Reader::from_path(tmp.path()).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "task_id",
            "duration",
            "earliest_start",
            "earliest_finish",
            "latest_start",
            "latest_finish",
            "slack",
            "on_critical_path"
        ]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[2][0], "C");
    assert_eq!(rows[2][6].parse::<f64>().unwrap(), 5.0);
    assert_eq!(&rows[2][7], "false");
    assert_eq!(&rows[1][7], "true");
}

#[test]
fn analysis_config_loads_from_file() {
    let tmp = NamedTempFile::new().unwrap();
    fs::write(tmp.path(), r#"{"mode":"transfer","transfer_rate":4.0}"#).unwrap();
    let config = load_analysis_config(tmp.path()).unwrap();
    assert_eq!(config.mode, AnalysisMode::Transfer);
    assert_eq!(config.transfer_rate, 4.0);
}
