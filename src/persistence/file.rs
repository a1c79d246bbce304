use super::{PersistenceResult, WorkflowDocument};
use crate::graph::WorkflowGraph;
use crate::schedule::{Schedule, TaskTiming};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

pub fn load_workflow_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<WorkflowGraph> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let document: WorkflowDocument = serde_json::from_reader(BufReader::new(file))?;
    let graph = document.into_graph()?;
    debug!(
        path = %path.display(),
        tasks = graph.task_count(),
        dependencies = graph.dependency_count(),
        "loaded workflow"
    );
    Ok(graph)
}

pub fn workflow_from_json_str(input: &str) -> PersistenceResult<WorkflowGraph> {
    let document: WorkflowDocument = serde_json::from_str(input)?;
    Ok(document.into_graph()?)
}

pub fn save_workflow_to_json<P: AsRef<Path>>(
    graph: &WorkflowGraph,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &WorkflowDocument::from_graph(graph))?;
    Ok(())
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, schedule)?;
    Ok(())
}

#[derive(Serialize)]
struct TaskCsvRecord<'a> {
    task_id: &'a str,
    duration: f64,
    earliest_start: f64,
    earliest_finish: f64,
    latest_start: f64,
    latest_finish: f64,
    slack: f64,
    on_critical_path: bool,
}

impl<'a> From<&'a TaskTiming> for TaskCsvRecord<'a> {
    fn from(timing: &'a TaskTiming) -> Self {
        Self {
            task_id: &timing.task_id,
            duration: timing.duration,
            earliest_start: timing.earliest_start,
            earliest_finish: timing.earliest_finish,
            latest_start: timing.latest_start,
            latest_finish: timing.latest_finish,
            slack: timing.slack,
            on_critical_path: timing.on_critical_path,
        }
    }
}

/// One row per task, in graph insertion order.
pub fn save_schedule_to_csv<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for timing in &schedule.tasks {
        writer.serialize(TaskCsvRecord::from(timing))?;
    }
    writer.flush()?;
    Ok(())
}
