//! Shared helpers for the AD* benchmark suites.

use std::fmt::Write;

use adstar_harness::runner::AnytimeReportV1;
use adstar_harness::worlds::maze::{Connectivity, GridMaze};
use adstar_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use adstar_search::expander::AdStarExpander;
use adstar_search::policy::AdStarPolicy;
use adstar_search::search::AdStarForward;

/// Driver type over a maze.
pub type MazeDriver = AdStarForward<AdStarExpander<GridMaze>>;

/// Build a driver from the maze's start to its goal.
///
/// # Panics
///
/// Panics if `epsilon` is invalid. Benchmark setup failures are fatal.
#[must_use]
pub fn maze_driver(maze: GridMaze, epsilon: f64) -> MazeDriver {
    let policy = AdStarPolicy::default().with_epsilon(epsilon);
    let (start, goal) = (maze.start(), maze.goal());
    AdStarForward::with_policy(start, [goal], AdStarExpander::new(maze), &policy)
        .expect("valid benchmark policy")
}

/// Advance until no work remains; returns the advance count.
pub fn drain(driver: &mut MazeDriver) -> u64 {
    let mut advances = 0;
    while driver.has_more_work() {
        driver.advance();
        advances += 1;
    }
    advances
}

/// ASCII text of a `rows × cols` baffle maze.
///
/// Every fourth column is a wall with a single gap that alternates between
/// the top and bottom row, so the only routes snake across the grid. Start
/// is top-left, goal bottom-right.
#[must_use]
pub fn baffle_maze_text(rows: usize, cols: usize) -> String {
    let mut text = String::with_capacity(rows * (cols * 2 + 1));
    for row in 0..rows {
        for col in 0..cols {
            let cell = if (row, col) == (0, 0) {
                'S'
            } else if (row, col) == (rows - 1, cols - 1) {
                'G'
            } else if col % 4 == 2 {
                let gap_row = if (col / 4) % 2 == 0 { rows - 1 } else { 0 };
                if row == gap_row {
                    '.'
                } else {
                    '#'
                }
            } else {
                '.'
            };
            let _ = write!(text, "{cell} ");
        }
        text.push('\n');
    }
    text
}

/// Parse a baffle maze.
///
/// # Panics
///
/// Panics if `rows` or `cols` is below 3. Benchmark setup failures are fatal.
#[must_use]
pub fn baffle_maze(rows: usize, cols: usize, connectivity: Connectivity) -> GridMaze {
    assert!(rows >= 3 && cols >= 3, "baffle maze needs at least 3×3 cells");
    GridMaze::parse(&baffle_maze_text(rows, cols), connectivity).expect("generated maze parses")
}

/// Digest guarding that a benchmarked run produced the expected report.
///
/// # Panics
///
/// Panics if the report cannot be serialized.
#[must_use]
pub fn bench_guard<C: adstar_kernel::cost::Cost>(report: &AnytimeReportV1<C>) -> ContentHash {
    let bytes = report.to_canonical_json_bytes().expect("report serializes");
    canonical_hash(HashDomain::BenchGuard, &bytes)
}
