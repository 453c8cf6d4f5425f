//! qsmflow - compose QSM reconstruction workflows.
//!
//! Reads a run configuration, composes and validates the workflow
//! graph, and prints its JSON description for the execution engine.

use anyhow::Context;
use clap::Parser;
use qsmflow_rs::config::WorkflowConfig;
use qsmflow_rs::workflow::{GraphDescription, WorkflowComposer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Compose a QSM reconstruction workflow from a run configuration.
#[derive(Parser, Debug)]
#[command(name = "qsmflow", version, about)]
struct Args {
    /// Path to the run configuration (TOML)
    config: PathBuf,

    /// Write the graph description to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compose and validate only, printing a one-line summary
    #[arg(long)]
    check: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the description on stdout stays clean.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,qsmflow_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = WorkflowConfig::load(&args.config)
        .with_context(|| format!("loading configuration from {:?}", args.config))?;

    let graph = WorkflowComposer::compose(&config).context("composing workflow")?;

    if args.check {
        println!(
            "workflow ok: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        return Ok(());
    }

    let description = GraphDescription::from_graph(&graph);
    let json = description
        .to_json()
        .context("serializing graph description")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("writing description to {:?}", path))?;
            tracing::info!("Wrote graph description to {:?}", path);
        }
        None => println!("{json}"),
    }

    Ok(())
}
