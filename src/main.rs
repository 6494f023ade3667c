// stockflow: command-line client for the system-dynamics store.
// Loads project diagrams, runs remote simulations, exports datasets.

use std::path::PathBuf;

use clap::{Arg, Command};

use stockflow::editor::engine::DiagramEditor;
use stockflow::graph_utils::graph::NodeData;
use stockflow::persistence::settings::ClientSettings;
use stockflow::remote::RemoteStore;
use stockflow::remote::http::HttpRemote;
use stockflow::sim::bridge;

fn project_arg() -> Arg {
    Arg::new("project").long("project").required(true).value_name("ID").help("Project id")
}

fn parse_project(matches: &clap::ArgMatches) -> anyhow::Result<u64> {
    let raw = matches.get_one::<String>("project").expect("required");
    raw.parse().map_err(|_| anyhow::anyhow!("invalid project id '{}'", raw))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let settings = ClientSettings::load().unwrap_or_default();

    let matches = Command::new("stockflow")
        .about("System-dynamics modelling client: inspect project diagrams and run simulations")
        .arg(
            Arg::new("api_url")
                .long("api-url")
                .value_name("URL")
                .help("Remote store endpoint (overrides the settings file)"),
        )
        .subcommand_required(true)
        .subcommand(Command::new("projects").about("List projects in the store"))
        .subcommand(
            Command::new("show")
                .about("Load a project's diagram and print its nodes and flows")
                .arg(project_arg()),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run the remote simulation and print the resulting dataset")
                .arg(project_arg())
                .arg(Arg::new("steps").long("steps").value_name("N").help("Step count"))
                .arg(
                    Arg::new("csv")
                        .long("csv")
                        .value_name("PATH")
                        .num_args(0..=1)
                        .default_missing_value("")
                        .help("Also export the dataset as CSV (default: the settings export dir)"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or update the persisted client settings")
                .arg(
                    Arg::new("set_api_url")
                        .long("set-api-url")
                        .value_name("URL")
                        .help("Persist a new remote store endpoint"),
                )
                .arg(
                    Arg::new("set_steps")
                        .long("set-steps")
                        .value_name("N")
                        .help("Persist a new default step count"),
                ),
        )
        .get_matches();

    let api_url =
        matches.get_one::<String>("api_url").cloned().unwrap_or_else(|| settings.api_url.clone());
    let remote = HttpRemote::new(api_url);

    match matches.subcommand() {
        Some(("projects", _)) => {
            let projects = remote.fetch_projects().await?;
            for p in projects {
                println!("{:>6}  {}", p.id, p.name);
            }
        }
        Some(("show", sub)) => {
            let project_id = parse_project(sub)?;
            let mut editor = DiagramEditor::new(remote, project_id);
            editor.load().await?;

            let graph = editor.graph();
            println!(
                "project {}: {} nodes, {} edges",
                project_id,
                graph.node_count(),
                graph.edge_count()
            );
            // Stable listing order; the map iterates in hash order
            let mut nodes: Vec<_> = graph.nodes().collect();
            nodes.sort_by(|a, b| a.data.name().cmp(b.data.name()));
            for node in nodes {
                match &node.data {
                    NodeData::Stock { name, initial_value } => {
                        println!("  stock     {:<12} {} (initial {})", node.id, name, initial_value)
                    }
                    NodeData::Variable { name, value } => {
                        println!("  variable  {:<12} {} = {}", node.id, name, value)
                    }
                    NodeData::FlowRate { flow_value, .. } => {
                        println!("  flow-rate {:<12} rate {}", node.id, flow_value)
                    }
                }
            }
            for edge in graph.edges() {
                println!("  flow      {:<12} {} -> {}", edge.id, edge.source, edge.target);
            }
        }
        Some(("simulate", sub)) => {
            let project_id = parse_project(sub)?;
            let steps = match sub.get_one::<String>("steps") {
                Some(raw) => raw.parse().map_err(|_| anyhow::anyhow!("invalid step count"))?,
                None => settings.sim_steps,
            };

            let dataset = bridge::run_simulation(&remote, project_id, steps).await?;

            let names: Vec<&str> = dataset.series.iter().map(|s| s.name.as_str()).collect();
            println!("time  {}", names.join("  "));
            for point in &dataset.points {
                let row: Vec<String> = dataset
                    .series
                    .iter()
                    .map(|s| {
                        point.values.get(&s.name).map(|v| v.to_string()).unwrap_or_default()
                    })
                    .collect();
                println!("{:>4}  {}", point.time, row.join("  "));
            }

            if let Some(raw) = sub.get_one::<String>("csv") {
                // Bare --csv falls back to the settings export directory
                let path = if raw.is_empty() {
                    settings.export_dir().join(format!("project-{}.csv", project_id))
                } else {
                    PathBuf::from(raw)
                };
                bridge::export_dataset_csv(&dataset, &path)?;
                println!("dataset written to {}", path.display());
            }
        }
        Some(("config", sub)) => {
            let mut settings = settings.clone();
            let mut changed = false;
            if let Some(url) = sub.get_one::<String>("set_api_url") {
                settings.api_url = url.clone();
                changed = true;
            }
            if let Some(raw) = sub.get_one::<String>("set_steps") {
                settings.sim_steps =
                    raw.parse().map_err(|_| anyhow::anyhow!("invalid step count"))?;
                changed = true;
            }
            if changed {
                settings.save()?;
            }
            let file = ClientSettings::settings_dir().join("settings.json");
            println!("settings file  {}", file.display());
            println!("api_url        {}", settings.api_url);
            println!("sim_steps      {}", settings.sim_steps);
            println!("export_dir     {}", settings.export_dir().display());
        }
        _ => unreachable!("subcommand required"),
    }

    Ok(())
}
