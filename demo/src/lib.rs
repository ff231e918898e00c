//! Helpers behind the `pacgraph-route` binary: level loading, actor specs
//! and route printing.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use pacgraph_core::{LevelNodes, NodeId, Pos};
use pacgraph_paths::{ActorState, Route};

/// Level used when no file is given.
pub const SAMPLE_LEVEL: &str = include_str!("../levels/sample.json");

/// Read a JSON node list from `path`, or the bundled sample level.
pub fn load_level(path: Option<&Path>) -> Result<LevelNodes> {
    let level: LevelNodes = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading level {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing level {}", path.display()))?
        }
        None => serde_json::from_str(SAMPLE_LEVEL).context("parsing bundled sample level")?,
    };
    log::debug!("loaded level with {} nodes", level.len());
    Ok(level)
}

/// Parse an actor spec: `N` for an actor standing on node `N`, or
/// `A>B@X,Y` for one moving from `A` toward `B`, currently at `(X, Y)`.
pub fn parse_actor(spec: &str) -> Result<ActorState> {
    let spec = spec.trim();
    let Some((edge, at)) = spec.split_once('@') else {
        return Ok(ActorState::at(parse_id(spec)?));
    };
    let (from, toward) = edge
        .split_once('>')
        .ok_or_else(|| anyhow!("expected A>B before '@' in '{spec}'"))?;
    let (x, y) = at
        .split_once(',')
        .ok_or_else(|| anyhow!("expected X,Y after '@' in '{spec}'"))?;
    let pos = Pos::new(parse_coord(x)?, parse_coord(y)?);
    Ok(ActorState::transit(parse_id(from)?, parse_id(toward)?, pos))
}

fn parse_id(s: &str) -> Result<NodeId> {
    let s = s.trim();
    s.parse::<i32>()
        .map(NodeId)
        .with_context(|| format!("invalid node id '{s}'"))
}

fn parse_coord(s: &str) -> Result<f32> {
    let s = s.trim();
    s.parse::<f32>()
        .with_context(|| format!("invalid coordinate '{s}'"))
}

/// One line per waypoint, then the total cost.
pub fn describe(route: &Route) -> String {
    let mut out: String = route
        .waypoints
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let label = w.node.map_or_else(|| "middle".to_string(), |n| n.to_string());
            format!("{i:>3}  {label:<8} {}\n", w.pos)
        })
        .collect();
    out.push_str(&format!("cost {:.2}\n", route.cost));
    out
}
