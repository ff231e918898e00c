use pacgraph_core::{NodeId, Pos};

/// One step of a route. `node` is `None` for a splice middle node.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub pos: Pos,
    pub node: Option<NodeId>,
}

/// A found path, start and goal included, with its total Euclidean length.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub waypoints: Vec<Waypoint>,
    pub cost: f32,
}

impl Route {
    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    #[inline]
    pub fn start(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    #[inline]
    pub fn goal(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// The waypoint right after the start, i.e. where the actor should head
    /// now. `None` when start and goal coincide.
    #[inline]
    pub fn next_waypoint(&self) -> Option<&Waypoint> {
        self.waypoints.get(1)
    }

    /// Board ids along the route (`None` for middle nodes).
    pub fn node_ids(&self) -> Vec<Option<NodeId>> {
        self.waypoints.iter().map(|w| w.node).collect()
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.waypoints.iter().map(|w| w.pos)
    }

    /// Sum of segment lengths, recomputed from the waypoints.
    pub fn length(&self) -> f32 {
        self.waypoints
            .windows(2)
            .map(|w| w[0].pos.distance(w[1].pos))
            .sum()
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn route_with_middle_round_trips() {
        let route = Route {
            waypoints: vec![
                Waypoint {
                    pos: Pos::new(0.5, 0.0),
                    node: None,
                },
                Waypoint {
                    pos: Pos::new(2.0, 0.0),
                    node: Some(NodeId(1)),
                },
            ],
            cost: 1.5,
        };
        let json = serde_json::to_string(&route).unwrap();
        assert!(json.contains(r#""node":null"#), "{json}");
        let back: Route = serde_json::from_str(&json).unwrap();
        assert_eq!(back, route);
    }
}
