//! Route query CLI: loads a level, builds its board graph and prints the
//! shortest route between two actors.
//!
//! Usage:
//!   pacgraph-route --from 0 --to 8
//!   pacgraph-route --level maze.json --from '3>4@2,4' --to 12 --exclude-portals
//!   RUST_LOG=debug pacgraph-route --from 0 --to 8

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pacgraph_paths::{ActorState, BoardGraph, BuildOptions, PathFinder};

#[derive(Parser)]
#[command(name = "pacgraph-route")]
#[command(about = "Shortest route between two actors on a pacgraph level")]
struct Args {
    /// Level file (JSON node list). Uses the bundled sample level if omitted
    #[arg(long)]
    level: Option<PathBuf>,

    /// Start actor: `N` (on node N) or `A>B@X,Y` (moving A to B, at X,Y)
    #[arg(long, value_parser = pacgraph_demo::parse_actor)]
    from: ActorState,

    /// Goal actor, same syntax as --from
    #[arg(long, value_parser = pacgraph_demo::parse_actor)]
    to: ActorState,

    /// Leave ghost-house nodes out of the graph
    #[arg(long)]
    exclude_house: bool,

    /// Leave portal nodes out of the graph
    #[arg(long)]
    exclude_portals: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let level = pacgraph_demo::load_level(args.level.as_deref())?;
    let opts = BuildOptions {
        include_ghost_house: !args.exclude_house,
        include_portals: !args.exclude_portals,
    };
    let mut graph = BoardGraph::build_with(&level, opts).context("building board graph")?;
    log::info!("board graph has {} nodes", graph.len());

    let route = PathFinder::new()
        .route(&mut graph, &args.from, &args.to)
        .context("route query failed")?;
    match route {
        Some(route) => print!("{}", pacgraph_demo::describe(&route)),
        None => println!("no path"),
    }
    Ok(())
}
