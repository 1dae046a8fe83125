//! `phasegraph` command-line driver
//!
//! Replays edit scripts against a fresh phase graph, then prints the derived
//! layout or writes the lifecycle export.

mod config;
mod script;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use config::DesignerConfig;
use phasegraph_layout::{DiagramLayout, LayoutDeriver};
use phasegraph_model::{PhaseGraph, PhaseNode};
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let script_arg = Arg::new("script")
        .long("script")
        .short('s')
        .value_parser(value_parser!(PathBuf))
        .help("Edit script to replay (YAML, or JSON with a .json extension)");

    Command::new("phasegraph")
        .version(phasegraph_model::VERSION)
        .about("Phase sequence designer: edit scripts, grid layout, lifecycle export")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level"),
        )
        .subcommand(
            Command::new("export")
                .about("Write application-lifecycle.json for the scripted graph")
                .arg(script_arg.clone())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Output directory (overrides config)"),
                )
                .arg(
                    Arg::new("stdout")
                        .long("stdout")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("out")
                        .help("Print the export instead of writing a file"),
                ),
        )
        .subcommand(
            Command::new("layout")
                .about("Print node placement for the scripted graph")
                .arg(script_arg)
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(Command::new("demo").about("Print the export of a built-in sample graph"))
}

fn main() -> Result<()> {
    let matches = cli().get_matches();

    let config_path = matches.get_one::<PathBuf>("config");
    let config = DesignerConfig::load_or_default(config_path.map(PathBuf::as_path))
        .context("loading configuration")?;
    init_tracing(&config, matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("export", args)) => run_export(&config, args),
        Some(("layout", args)) => run_layout(&config, args),
        Some(("demo", _)) => run_demo(),
        _ => Ok(()),
    }
}

fn init_tracing(config: &DesignerConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_graph(script: Option<&Path>) -> Result<PhaseGraph> {
    let mut graph = PhaseGraph::new();
    if let Some(path) = script {
        let commands = script::load_script(path)
            .with_context(|| format!("loading edit script {}", path.display()))?;
        script::replay(&mut graph, &commands);
    }
    Ok(graph)
}

fn script_path(args: &ArgMatches) -> Option<&Path> {
    args.get_one::<PathBuf>("script").map(PathBuf::as_path)
}

fn run_export(config: &DesignerConfig, args: &ArgMatches) -> Result<()> {
    let graph = build_graph(script_path(args))?;

    if args.get_flag("stdout") {
        let json = phasegraph_export::export_json(&graph).context("serializing export")?;
        println!("{json}");
        return Ok(());
    }

    let config = match args.get_one::<PathBuf>("out") {
        Some(dir) => config.clone().with_output_dir(dir),
        None => config.clone(),
    };
    let path = config
        .exporter()
        .write(&graph)
        .context("writing lifecycle export")?;
    println!("Exported {} phases to {}", graph.len(), path.display());
    Ok(())
}

fn run_layout(config: &DesignerConfig, args: &ArgMatches) -> Result<()> {
    let graph = build_graph(script_path(args))?;
    let layout = LayoutDeriver::new(config.layout).derive(&graph);

    if args.get_flag("json") {
        let json = serde_json::to_string_pretty(&layout).context("serializing layout")?;
        println!("{json}");
    } else {
        let summary = layout_summary(&graph, &layout).context("formatting layout summary")?;
        print!("{summary}");
    }
    Ok(())
}

fn run_demo() -> Result<()> {
    let commands = script::demo_script().context("parsing built-in demo script")?;
    let mut graph = PhaseGraph::new();
    script::replay(&mut graph, &commands);
    let json = phasegraph_export::export_json(&graph).context("serializing export")?;
    println!("{json}");
    Ok(())
}

fn layout_summary(graph: &PhaseGraph, layout: &DiagramLayout) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Canvas: {} x {}", layout.width, layout.height)?;
    for placed in &layout.phases {
        let r = placed.rect;
        writeln!(out, "{} {:?} at ({}, {})", placed.id, placed.name, r.x, r.y)?;
        let Some(phase) = graph.phase(placed.id) else {
            continue;
        };
        write_routes(&mut out, "  ", &phase.node, layout)?;
        for sub in &placed.sub_phases {
            let r = sub.rect;
            writeln!(out, "  {} {:?} at ({}, {})", sub.id, sub.name, r.x, r.y)?;
            if let Some(node) = phase.sub_phase(sub.id) {
                write_routes(&mut out, "    ", node, layout)?;
            }
        }
    }
    for end in &layout.ends {
        writeln!(out, "{} at ({}, {})", end.label, end.center.x, end.center.y)?;
    }
    Ok(out)
}

fn write_routes(
    out: &mut String,
    indent: &str,
    node: &PhaseNode,
    layout: &DiagramLayout,
) -> fmt::Result {
    for (label, target) in [
        ("success", node.success_target),
        ("failure", node.failure_target),
    ] {
        let Some(target) = target else { continue };
        if let Some(point) = layout.target_anchor(target) {
            writeln!(out, "{indent}{label} -> {target} ({}, {})", point.x, point.y)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let matches = cli()
            .try_get_matches_from(["phasegraph", "layout", "--json", "-v", "--config", "a.toml"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
        assert_eq!(
            matches.get_one::<PathBuf>("config"),
            Some(&PathBuf::from("a.toml"))
        );
    }

    #[test]
    fn stdout_conflicts_with_out() {
        let result =
            cli().try_get_matches_from(["phasegraph", "export", "--stdout", "--out", "dir"]);
        assert!(result.is_err());
    }

    #[test]
    fn summary_lists_nodes_routes_and_ends() {
        let mut graph = PhaseGraph::new();
        let commands = script::demo_script().unwrap();
        script::replay(&mut graph, &commands);
        let layout = LayoutDeriver::default().derive(&graph);
        let summary = layout_summary(&graph, &layout).unwrap();

        assert!(summary.starts_with("Canvas: 1160 x 570\n"));
        assert!(summary.contains("phase-1 \"Intake\" at (60, 160)"));
        assert!(summary.contains("  success -> phase-2 (280, 195)"));
        assert!(summary.contains("  failure -> end-3 (1060, 320)"));
        assert!(summary.contains("  phase-4 \"Background check\" at (60, 320)"));
        assert!(summary.contains("    success -> end-1 (1060, 80)"));
        assert!(summary.contains("End 3 at (1060, 320)"));
    }

    #[test]
    fn export_command_writes_into_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let matches = cli()
            .try_get_matches_from(["phasegraph", "export", "--out", dir.path().to_str().unwrap()])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        run_export(&DesignerConfig::default(), args).unwrap();

        let written = std::fs::read_to_string(dir.path().join("application-lifecycle.json")).unwrap();
        assert!(written.contains("\"name\": \"Phase 1\""));
    }
}
