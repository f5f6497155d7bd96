//! Shared test helpers for building maze drivers and checking them against
//! the uniform-cost oracle.
//!
//! Every suite builds drivers and oracles through these helpers so that a
//! maze is always searched and checked under the same construction.

use adstar_harness::reference::uniform_cost;
use adstar_harness::runner::converge;
use adstar_harness::worlds::maze::{Cell, Connectivity, GridMaze};
use adstar_search::expander::AdStarExpander;
use adstar_search::policy::AdStarPolicy;
use adstar_search::search::AdStarForward;

/// Driver type over a maze.
pub type MazeDriver = AdStarForward<AdStarExpander<GridMaze>>;

/// Tolerance for comparing floating path costs.
pub const COST_TOLERANCE: f64 = 1e-9;

/// Advance budget large enough for every catalogue maze.
pub const CONVERGE_BUDGET: u64 = 100_000;

/// Parse a maze.
///
/// # Panics
///
/// Panics if `text` is not a valid maze. Test-only invariant.
#[must_use]
pub fn maze(text: &str, connectivity: Connectivity) -> GridMaze {
    GridMaze::parse(text, connectivity).unwrap()
}

/// A driver from the maze's start to its goal at `epsilon`.
///
/// # Panics
///
/// Panics if `epsilon` is invalid. Test-only invariant.
#[must_use]
pub fn maze_driver(maze: GridMaze, epsilon: f64, record: bool) -> MazeDriver {
    let mut policy = AdStarPolicy::default().with_epsilon(epsilon);
    if record {
        policy = policy.recording();
    }
    let (start, goal) = (maze.start(), maze.goal());
    AdStarForward::with_policy(start, [goal], AdStarExpander::new(maze), &policy).unwrap()
}

/// Advance until the driver reports no more work.
///
/// # Panics
///
/// Panics if the driver does not converge within [`CONVERGE_BUDGET`].
pub fn run_to_convergence(driver: &mut MazeDriver) -> u64 {
    converge(driver, CONVERGE_BUDGET).unwrap()
}

/// Best-goal g-value of a driver.
#[must_use]
pub fn best_cost(driver: &MazeDriver) -> f64 {
    driver.node(driver.best_goal()).g
}

/// Best-goal path of a driver, start first.
#[must_use]
pub fn best_path(driver: &MazeDriver) -> Vec<Cell> {
    driver.context().states_to(driver.best_goal())
}

/// Optimal cost from the uniform-cost oracle, `INFINITY` when unreachable.
#[must_use]
pub fn reference_cost(maze: &GridMaze) -> f64 {
    uniform_cost(maze, &maze.start(), &[maze.goal()]).map_or(f64::INFINITY, |s| s.cost)
}

/// Sum of step costs along `path` in `maze`.
#[must_use]
pub fn path_cost(maze: &GridMaze, path: &[Cell]) -> f64 {
    use adstar_search::contract::SearchDomain;
    path.windows(2)
        .map(|w| {
            maze.successors(&w[0])
                .into_iter()
                .find(|t| t.to == w[1])
                .map_or(f64::INFINITY, |t| maze.cost(&t))
        })
        .sum()
}

/// Assert two costs agree within [`COST_TOLERANCE`] (infinities included).
///
/// # Panics
///
/// Panics if they differ.
pub fn assert_cost_eq(actual: f64, expected: f64, context: &str) {
    if expected.is_infinite() {
        assert!(actual.is_infinite(), "{context}: expected unreachable, got {actual}");
        return;
    }
    assert!(
        (actual - expected).abs() < COST_TOLERANCE,
        "{context}: expected {expected}, got {actual}"
    );
}
