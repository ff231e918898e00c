//! Chase target tiles.
//!
//! Each ghost aims at a different point while chasing. Targets are plain
//! positions and may lie off the board; the pursuit layer maps them to the
//! nearest walkable node.

use pacgraph_core::Pos;

/// How far ahead of pacman Pinky aims.
pub const PINKY_LEAD: f32 = 4.0;
/// How far ahead of pacman Inky's pivot point lies.
pub const INKY_LEAD: f32 = 2.0;
/// Clyde gives up the chase when closer than this to pacman.
pub const CLYDE_SHY_RADIUS: f32 = 8.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

/// Everything a chase target depends on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChaseContext {
    pub pacman: Pos,
    /// Pacman's heading as a unit vector (zero when standing still).
    pub heading: Pos,
    /// The ghost's own position.
    pub ghost: Pos,
    /// Blinky's position, needed by Inky.
    pub blinky: Option<Pos>,
    /// The ghost's scatter corner.
    pub scatter: Pos,
}

impl GhostKind {
    pub const ALL: [GhostKind; 4] = [Self::Blinky, Self::Pinky, Self::Inky, Self::Clyde];

    /// The point this ghost heads for while chasing.
    pub fn chase_target(self, ctx: &ChaseContext) -> Pos {
        match self {
            Self::Blinky => ctx.pacman,
            Self::Pinky => ctx.pacman + ctx.heading * PINKY_LEAD,
            Self::Inky => {
                let Some(blinky) = ctx.blinky else {
                    log::warn!("inky has no blinky to pivot on, targeting pacman");
                    return ctx.pacman;
                };
                let pivot = ctx.pacman + ctx.heading * INKY_LEAD;
                blinky + (pivot - blinky) * 2.0
            }
            Self::Clyde => {
                if ctx.ghost.distance(ctx.pacman) > CLYDE_SHY_RADIUS {
                    ctx.pacman
                } else {
                    ctx.scatter
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ChaseContext {
        ChaseContext {
            pacman: Pos::new(10.0, 10.0),
            heading: Pos::new(1.0, 0.0),
            ghost: Pos::new(0.0, 0.0),
            blinky: Some(Pos::new(10.0, 6.0)),
            scatter: Pos::new(-2.0, -2.0),
        }
    }

    #[test]
    fn blinky_targets_pacman() {
        assert_eq!(GhostKind::Blinky.chase_target(&ctx()), Pos::new(10.0, 10.0));
    }

    #[test]
    fn pinky_leads() {
        assert_eq!(GhostKind::Pinky.chase_target(&ctx()), Pos::new(14.0, 10.0));
        let still = ChaseContext {
            heading: Pos::ZERO,
            ..ctx()
        };
        assert_eq!(GhostKind::Pinky.chase_target(&still), still.pacman);
    }

    #[test]
    fn inky_doubles_vector_from_blinky() {
        // Pivot (12, 10); blinky (10, 6) -> (10, 6) + 2 * (2, 4).
        assert_eq!(GhostKind::Inky.chase_target(&ctx()), Pos::new(14.0, 14.0));
        let alone = ChaseContext {
            blinky: None,
            ..ctx()
        };
        assert_eq!(GhostKind::Inky.chase_target(&alone), alone.pacman);
    }

    #[test]
    fn clyde_is_shy() {
        assert_eq!(GhostKind::Clyde.chase_target(&ctx()), Pos::new(10.0, 10.0));
        let close = ChaseContext {
            ghost: Pos::new(9.0, 9.0),
            ..ctx()
        };
        assert_eq!(GhostKind::Clyde.chase_target(&close), Pos::new(-2.0, -2.0));
    }
}
