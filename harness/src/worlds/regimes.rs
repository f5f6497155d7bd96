//! Canonical maze regimes.
//!
//! Each regime returns `(maze, policy, expectations)` as a matched triple so
//! tests and benchmarks cannot pair a maze with the wrong schedule. Every
//! policy knob is set explicitly (no reliance on `AnytimePolicy::default()`).

use crate::policy::AnytimePolicy;

use super::maze::{catalogue, Connectivity, GridMaze, MazeError};

/// Test-side expectations for a regime.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeExpectations {
    /// Optimal path cost when it is known in closed form. `None` means the
    /// reference solver is the only oracle.
    pub optimal_cost: Option<f64>,
    /// Whether the goal can be reached at all.
    pub reachable: bool,
}

/// A matched `(maze, policy, expectations)` triple.
#[derive(Debug, Clone)]
pub struct Regime {
    pub name: &'static str,
    pub maze: GridMaze,
    pub policy: AnytimePolicy,
    pub expectations: RegimeExpectations,
}

fn explicit_policy(epsilon_schedule: &[f64], max_advances_per_pass: u64) -> AnytimePolicy {
    AnytimePolicy {
        epsilon_schedule: epsilon_schedule.to_vec(),
        max_advances_per_pass,
    }
}

/// **Corridor**: a single 12-cell row, optimum 11.
///
/// # Errors
///
/// Returns [`MazeError`] only if the catalogue text is malformed.
pub fn regime_corridor() -> Result<Regime, MazeError> {
    Ok(Regime {
        name: "corridor",
        maze: GridMaze::parse(catalogue::CORRIDOR, Connectivity::Four)?,
        policy: explicit_policy(&[2.5, 1.0], 1_000),
        expectations: RegimeExpectations {
            optimal_cost: Some(11.0),
            reachable: true,
        },
    })
}

/// **Serpentine**: one winding solution of 23 steps; the heuristic is
/// misleading for most of the route.
///
/// # Errors
///
/// Returns [`MazeError`] only if the catalogue text is malformed.
pub fn regime_serpentine() -> Result<Regime, MazeError> {
    Ok(Regime {
        name: "serpentine",
        maze: GridMaze::parse(catalogue::SERPENTINE, Connectivity::Four)?,
        policy: explicit_policy(&[3.0, 2.0, 1.0], 5_000),
        expectations: RegimeExpectations {
            optimal_cost: Some(23.0),
            reachable: true,
        },
    })
}

/// **Room, 8-connected**: many near-optimal routes, so inflated passes
/// usually settle on a worse one first.
///
/// # Errors
///
/// Returns [`MazeError`] only if the catalogue text is malformed.
pub fn regime_room_eight() -> Result<Regime, MazeError> {
    Ok(Regime {
        name: "room_eight",
        maze: GridMaze::parse(catalogue::ROOM, Connectivity::Eight)?,
        policy: explicit_policy(&[5.0, 2.5, 1.5, 1.0], 10_000),
        expectations: RegimeExpectations {
            optimal_cost: None,
            reachable: true,
        },
    })
}

/// **Two routes**: short route of 8 steps through a door cell, long route
/// of 14 steps.
///
/// # Errors
///
/// Returns [`MazeError`] only if the catalogue text is malformed.
pub fn regime_two_routes() -> Result<Regime, MazeError> {
    Ok(Regime {
        name: "two_routes",
        maze: GridMaze::parse(catalogue::TWO_ROUTES, Connectivity::Four)?,
        policy: explicit_policy(&[1.0], 1_000),
        expectations: RegimeExpectations {
            optimal_cost: Some(8.0),
            reachable: true,
        },
    })
}

/// **Sealed**: the goal is walled off.
///
/// # Errors
///
/// Returns [`MazeError`] only if the catalogue text is malformed.
pub fn regime_sealed() -> Result<Regime, MazeError> {
    Ok(Regime {
        name: "sealed",
        maze: GridMaze::parse(catalogue::SEALED, Connectivity::Eight)?,
        policy: explicit_policy(&[2.0, 1.0], 1_000),
        expectations: RegimeExpectations {
            optimal_cost: None,
            reachable: false,
        },
    })
}

/// Every regime, in a fixed order.
///
/// # Errors
///
/// Returns [`MazeError`] only if a catalogue text is malformed.
pub fn all_regimes() -> Result<Vec<Regime>, MazeError> {
    Ok(vec![
        regime_corridor()?,
        regime_serpentine()?,
        regime_room_eight()?,
        regime_two_routes()?,
        regime_sealed()?,
    ])
}
