//! Optimality lock tests: at epsilon 1 the driver's best-goal cost equals
//! the uniform-cost oracle on every catalogue maze.

use adstar_harness::worlds::maze::{catalogue, Cell, Connectivity};
use adstar_harness::worlds::regimes::all_regimes;
use lock_tests::maze_test_helpers::{
    assert_cost_eq, best_cost, best_path, maze, maze_driver, path_cost, reference_cost,
    run_to_convergence,
};

#[test]
fn corridor_cost_is_cell_count_minus_one() {
    let m = maze(catalogue::CORRIDOR, Connectivity::Four);
    let cells = m.free_cells();
    let oracle = reference_cost(&m);
    let mut driver = maze_driver(m, 1.0, false);
    run_to_convergence(&mut driver);

    #[allow(clippy::cast_precision_loss)]
    let expected = (cells - 1) as f64;
    assert_cost_eq(best_cost(&driver), expected, "corridor");
    assert_cost_eq(oracle, expected, "corridor oracle");
    assert_eq!(best_path(&driver).len(), cells);
}

#[test]
fn every_regime_matches_the_oracle_at_epsilon_one() {
    for regime in all_regimes().unwrap() {
        let oracle = reference_cost(&regime.maze);
        if let Some(known) = regime.expectations.optimal_cost {
            assert_cost_eq(oracle, known, regime.name);
        }
        assert_eq!(oracle.is_finite(), regime.expectations.reachable, "{}", regime.name);

        let m = regime.maze.clone();
        let mut driver = maze_driver(regime.maze, 1.0, false);
        run_to_convergence(&mut driver);
        assert_cost_eq(best_cost(&driver), oracle, regime.name);
        if oracle.is_finite() {
            let path = best_path(&driver);
            assert_eq!(path.first(), Some(&m.start()), "{}", regime.name);
            assert_eq!(path.last(), Some(&m.goal()), "{}", regime.name);
            assert_cost_eq(path_cost(&m, &path), oracle, regime.name);
        }
    }
}

#[test]
fn both_connectivities_match_the_oracle() {
    for text in [catalogue::SERPENTINE, catalogue::ROOM, catalogue::TWO_ROUTES] {
        for connectivity in [Connectivity::Four, Connectivity::Eight] {
            let m = maze(text, connectivity);
            let oracle = reference_cost(&m);
            let mut driver = maze_driver(m, 1.0, false);
            run_to_convergence(&mut driver);
            assert_cost_eq(best_cost(&driver), oracle, &format!("{connectivity:?}"));
        }
    }
}

#[test]
fn zero_heuristic_behaves_like_uniform_cost() {
    let m = maze(catalogue::ROOM, Connectivity::Eight).without_heuristic();
    let oracle = reference_cost(&m);
    let mut driver = maze_driver(m, 1.0, false);
    run_to_convergence(&mut driver);
    assert_cost_eq(best_cost(&driver), oracle, "room without heuristic");
}

#[test]
fn heuristic_expands_no_more_than_uniform_cost() {
    let guided = maze(catalogue::ROOM, Connectivity::Four);
    let blind = guided.clone().without_heuristic();

    let mut a = maze_driver(guided, 1.0, false);
    let mut b = maze_driver(blind, 1.0, false);
    run_to_convergence(&mut a);
    run_to_convergence(&mut b);
    assert!(
        a.stats().total_expansions <= b.stats().total_expansions,
        "guided {} > blind {}",
        a.stats().total_expansions,
        b.stats().total_expansions
    );
}

#[test]
fn path_is_a_chain_of_adjacent_cells() {
    let m = maze(catalogue::SERPENTINE, Connectivity::Four);
    let mut driver = maze_driver(m, 1.0, false);
    run_to_convergence(&mut driver);
    let path = best_path(&driver);
    for w in path.windows(2) {
        let (a, b): (Cell, Cell) = (w[0], w[1]);
        assert_eq!(a.row.abs_diff(b.row) + a.col.abs_diff(b.col), 1, "{a:?} → {b:?}");
    }
}
