use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::warn;
use workflow_cpm::config::{self, AnalysisConfig, AnalysisMode};
use workflow_cpm::logging::init_logging;
use workflow_cpm::persistence::{self, PersistenceError};
use workflow_cpm::task_validation::validate_transfer_rate;
use workflow_cpm::{CpmAnalyzer, GeneratorParams, Schedule, WorkflowGenerator, WorkflowGraph};

#[derive(Debug, Parser)]
#[command(name = "cli", about = "Interactive critical path analysis of workflow DAGs")]
struct Args {
    /// Seed for the workflow generator (defaults to the wall clock)
    #[arg(long)]
    seed: Option<u64>,
    /// Transfer rate used by transfer-weighted analysis
    #[arg(long)]
    transfer_rate: Option<f64>,
    /// JSON file holding an analysis config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `workflow_cpm=trace`
    #[arg(long)]
    log_level: Option<String>,
}

struct Session {
    generator: WorkflowGenerator,
    analysis: AnalysisConfig,
    graph: Option<WorkflowGraph>,
    schedule: Option<Schedule>,
}

fn render_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.enumerate() {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
        line.push_str(" |");
    }
    line
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&sep);
    out
}

fn render_workflow(graph: &WorkflowGraph) -> String {
    let rows: Vec<Vec<String>> = graph
        .tasks()
        .map(|task| {
            let preds = graph
                .incoming(&task.id)
                .into_iter()
                .map(|(_, dep)| dep.source.clone())
                .collect::<Vec<_>>()
                .join(",");
            vec![task.id.clone(), format!("{:.1}", task.execution_time), preds]
        })
        .collect();
    render_text_table(&["task_id", "execution_time", "predecessors"], &rows)
}

fn render_schedule(schedule: &Schedule) -> String {
    let rows: Vec<Vec<String>> = schedule
        .tasks
        .iter()
        .map(|t| {
            vec![
                t.task_id.clone(),
                format!("{:.1}", t.duration),
                format!("{:.1}", t.earliest_start),
                format!("{:.1}", t.earliest_finish),
                format!("{:.1}", t.latest_start),
                format!("{:.1}", t.latest_finish),
                format!("{:.1}", t.slack),
                if t.on_critical_path { "*".into() } else { String::new() },
            ]
        })
        .collect();
    render_text_table(
        &["task_id", "duration", "es", "ef", "ls", "lf", "slack", "critical"],
        &rows,
    )
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  generate <nodes> <min_exec> <max_exec> <connectivity> <min_data> <max_data> [name]\n                                     Generate a random workflow\n  load <path>                        Load a node-link JSON workflow\n  save <path>                        Save the workflow as node-link JSON\n  show                               Show the current workflow\n  analyze [plain|transfer]           Run critical path analysis\n  path                               Show the ordered critical path\n  rate <f64>                         Set the transfer rate\n  export <json|csv> <path>           Export the last analysis\n  quit|exit                          Exit"
    );
}

fn parse_generate<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<GeneratorParams, String> {
    const USAGE: &str =
        "Usage: generate <nodes> <min_exec> <max_exec> <connectivity> <min_data> <max_data> [name]";
    let mut next = |what: &str| -> Result<&'a str, String> {
        parts.next().ok_or_else(|| format!("{USAGE} (missing {what})"))
    };
    let node_count = next("nodes")?.parse().map_err(|_| "Invalid node count".to_string())?;
    let min_execution_time = next("min_exec")?.parse().map_err(|_| "Invalid min_exec".to_string())?;
    let max_execution_time = next("max_exec")?.parse().map_err(|_| "Invalid max_exec".to_string())?;
    let connectivity = next("connectivity")?
        .parse()
        .map_err(|_| "Invalid connectivity".to_string())?;
    let min_data_amount = next("min_data")?.parse().map_err(|_| "Invalid min_data".to_string())?;
    let max_data_amount = next("max_data")?.parse().map_err(|_| "Invalid max_data".to_string())?;
    let mut params = GeneratorParams {
        node_count,
        min_execution_time,
        max_execution_time,
        connectivity,
        min_data_amount,
        max_data_amount,
        ..GeneratorParams::default()
    };
    if let Ok(name) = next("name") {
        params.name = name.to_string();
    }
    Ok(params)
}

fn startup_config(args: &Args) -> AnalysisConfig {
    let mut analysis = match &args.config {
        Some(path) => match config::load_analysis_config(path) {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "falling back to default analysis config");
                AnalysisConfig::default()
            }
        },
        None => AnalysisConfig::default(),
    };
    if let Some(rate) = args.transfer_rate {
        analysis.transfer_rate = rate;
    }
    analysis
}

fn export(schedule: &Schedule, format: &str, path: &str) -> Result<(), PersistenceError> {
    match format {
        "csv" => persistence::save_schedule_to_csv(schedule, path),
        _ => persistence::save_schedule_to_json(schedule, path),
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let mut session = Session {
        generator: match args.seed {
            Some(seed) => WorkflowGenerator::with_seed(seed),
            None => WorkflowGenerator::new(),
        },
        analysis: startup_config(&args),
        graph: None,
        schedule: None,
    };

    println!("Workflow CPM (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "generate" => {
                let params = match parse_generate(parts) {
                    Ok(params) => params,
                    Err(msg) => {
                        println!("{msg}");
                        continue;
                    }
                };
                match session.generator.generate(&params) {
                    Ok(graph) => {
                        println!(
                            "Generated workflow '{}' with {} tasks and {} dependencies (seed {}).",
                            graph.name(),
                            graph.task_count(),
                            graph.dependency_count(),
                            session.generator.seed()
                        );
                        session.graph = Some(graph);
                        session.schedule = None;
                    }
                    Err(e) => println!("Error: {e}"),
                }
            }
            "load" => match parts.next() {
                Some(path) => match persistence::load_workflow_from_json(path) {
                    Ok(graph) => {
                        println!(
                            "Workflow loaded from {path} ({} tasks, {} dependencies).",
                            graph.task_count(),
                            graph.dependency_count()
                        );
                        session.graph = Some(graph);
                        session.schedule = None;
                    }
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: load <path>"),
            },
            "save" => match (parts.next(), &session.graph) {
                (Some(path), Some(graph)) => match persistence::save_workflow_to_json(graph, path) {
                    Ok(()) => println!("Workflow saved to {path}."),
                    Err(e) => println!("Error: {e}"),
                },
                (None, _) => println!("Usage: save <path>"),
                (_, None) => println!("No workflow loaded. Use 'generate' or 'load'."),
            },
            "show" => match &session.graph {
                Some(graph) => println!("{}", render_workflow(graph)),
                None => println!("No workflow loaded. Use 'generate' or 'load'."),
            },
            "analyze" => {
                let Some(graph) = &session.graph else {
                    println!("No workflow loaded. Use 'generate' or 'load'.");
                    continue;
                };
                let mut analysis = session.analysis;
                if let Some(mode) = parts.next() {
                    match AnalysisMode::parse(mode) {
                        Some(mode) => analysis.mode = mode,
                        None => {
                            println!("Usage: analyze [plain|transfer]");
                            continue;
                        }
                    }
                }
                match CpmAnalyzer::with_cost_model(graph, analysis.cost_model()).analyze() {
                    Ok(schedule) => {
                        println!(
                            "Analyzed ({})\n{}",
                            schedule.summary().to_cli_summary(),
                            render_schedule(&schedule)
                        );
                        session.schedule = Some(schedule);
                    }
                    Err(e) => println!("Analysis error: {e}"),
                }
            }
            "path" => match &session.schedule {
                Some(schedule) => println!(
                    "Critical path: {} (completion {:.1})",
                    schedule.ordered_critical_path().join(" -> "),
                    schedule.earliest_completion_time()
                ),
                None => println!("No analysis yet. Run 'analyze' first."),
            },
            "rate" => match parts.next().map(str::parse::<f64>) {
                Some(Ok(rate)) => match validate_transfer_rate(rate) {
                    Ok(()) => {
                        session.analysis.transfer_rate = rate;
                        println!("Transfer rate set to {rate}.");
                    }
                    Err(e) => println!("Error: {e}"),
                },
                Some(Err(_)) => println!("Invalid float"),
                None => println!("Usage: rate <f64>"),
            },
            "export" => match (parts.next(), parts.next(), &session.schedule) {
                (Some(format @ ("json" | "csv")), Some(path), Some(schedule)) => {
                    match export(schedule, format, path) {
                        Ok(()) => println!("Schedule exported to {path}."),
                        Err(e) => println!("Error: {e}"),
                    }
                }
                (Some("json" | "csv"), Some(_), None) => {
                    println!("No analysis yet. Run 'analyze' first.")
                }
                _ => println!("Usage: export <json|csv> <path>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
