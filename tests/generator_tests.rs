use std::collections::{HashSet, VecDeque};
use workflow_cpm::generator::{END_TASK_ID, START_TASK_ID};
use workflow_cpm::persistence::WorkflowDocument;
use workflow_cpm::{CpmAnalyzer, GeneratorParams, WorkflowError, WorkflowGenerator, WorkflowGraph};

fn params(node_count: usize, connectivity: f64) -> GeneratorParams {
    GeneratorParams {
        node_count,
        connectivity,
        ..GeneratorParams::default()
    }
}

fn reaching_end(graph: &WorkflowGraph) -> HashSet<String> {
    let mut seen = HashSet::from([END_TASK_ID.to_string()]);
    let mut queue = VecDeque::from([END_TASK_ID.to_string()]);
    while let Some(id) = queue.pop_front() {
        for (_, dep) in graph.incoming(&id) {
            if seen.insert(dep.source.clone()) {
                queue.push_back(dep.source.clone());
            }
        }
    }
    seen
}

#[test]
fn generated_workflows_are_single_entry_single_exit_dags() {
    let mut generator = WorkflowGenerator::with_seed(2024);
    for n in [2usize, 3, 4, 10, 27, 28, 60, 150] {
        for connectivity in [0.0, 0.1, 0.3, 0.5, 0.8, 1.0] {
            let graph = generator.generate(&params(n, connectivity)).unwrap();
            assert_eq!(graph.task_count(), n);
            assert_eq!(graph.sources(), vec![START_TASK_ID], "n={n} c={connectivity}");
            assert_eq!(graph.sinks(), vec![END_TASK_ID], "n={n} c={connectivity}");
            assert_eq!(reaching_end(&graph).len(), n, "n={n} c={connectivity}");
            assert!(CpmAnalyzer::new(&graph).analyze().is_ok());
        }
    }
}

#[test]
fn two_tasks_give_a_single_link() {
    let graph = WorkflowGenerator::with_seed(1)
        .generate(&params(2, 0.5))
        .unwrap();
    assert_eq!(graph.dependency_count(), 1);
    assert!(graph.has_dependency(START_TASK_ID, END_TASK_ID));
}

#[test]
fn same_seed_gives_identical_workflows() {
    let p = params(40, 0.6);
    let first = WorkflowGenerator::with_seed(77).generate(&p).unwrap();
    let second = WorkflowGenerator::with_seed(77).generate(&p).unwrap();
    assert_eq!(
        WorkflowDocument::from_graph(&first),
        WorkflowDocument::from_graph(&second)
    );
}

#[test]
fn samples_respect_configured_ranges() {
    let p = GeneratorParams {
        node_count: 50,
        min_execution_time: 3,
        max_execution_time: 7,
        connectivity: 0.7,
        min_data_amount: 10,
        max_data_amount: 20,
        ..GeneratorParams::default()
    };
    let graph = WorkflowGenerator::with_seed(5).generate(&p).unwrap();
    for task in graph.tasks() {
        assert!((3.0..=7.0).contains(&task.execution_time));
        assert_eq!(task.execution_time.fract(), 0.0);
    }
    for (_, dep) in graph.dependencies() {
        assert!((10.0..=20.0).contains(&dep.data_amount));
    }
}

#[test]
fn task_names_switch_to_numbered_ids_after_z() {
    let graph = WorkflowGenerator::with_seed(9)
        .generate(&params(30, 0.4))
        .unwrap();
    for id in ["Start", "A", "Z", "Node1", "Node2", "End"] {
        assert!(graph.contains_task(id), "missing {id}");
    }
    assert!(!graph.contains_task("Node3"));
}

#[test]
fn invalid_parameters_are_rejected() {
    let mut generator = WorkflowGenerator::with_seed(0);
    let cases = [
        params(1, 0.5),
        params(10, -0.1),
        params(10, 1.01),
        GeneratorParams {
            min_execution_time: 9,
            max_execution_time: 2,
            ..GeneratorParams::default()
        },
        GeneratorParams {
            min_data_amount: 50,
            max_data_amount: 5,
            ..GeneratorParams::default()
        },
    ];
    for p in cases {
        assert!(matches!(
            generator.generate(&p),
            Err(WorkflowError::InvalidParameter(_))
        ));
    }
}

#[test]
fn seed_is_reported() {
    assert_eq!(WorkflowGenerator::with_seed(31).seed(), 31);
}
