//! Dynamic repair lock tests: after reporting changed transitions, the next
//! convergence matches a from-scratch oracle on the changed maze.

use std::collections::BTreeMap;

use adstar_harness::worlds::graph::WeightedGraph;
use adstar_harness::worlds::maze::{catalogue, Cell, Connectivity, GridMaze};
use adstar_search::expander::AdStarExpander;
use adstar_search::search::AdStarForward;
use lock_tests::maze_test_helpers::{
    assert_cost_eq, best_cost, best_path, maze, maze_driver, reference_cost, run_to_convergence,
    MazeDriver,
};

const DOOR: Cell = Cell::new(0, 4);

/// Toggle `cell` inside the driver's maze and report the touched transitions.
fn toggle(driver: &mut MazeDriver, cell: Cell, blocked: bool) -> usize {
    let changed = driver.producer_mut().domain_mut().set_blocked(cell, blocked);
    let count = changed.len();
    driver.add_transitions_changed(changed);
    count
}

fn current_maze(driver: &MazeDriver) -> GridMaze {
    driver.producer().domain().clone()
}

#[test]
fn blocking_the_door_reroutes_through_the_long_corridor() {
    let mut driver = maze_driver(maze(catalogue::TWO_ROUTES, Connectivity::Four), 1.0, false);
    run_to_convergence(&mut driver);
    assert_cost_eq(best_cost(&driver), 8.0, "open door");
    assert!(best_path(&driver).contains(&DOOR));

    assert_eq!(toggle(&mut driver, DOOR, true), 4);
    assert!(driver.has_more_work(), "pending changes must wake the driver");
    run_to_convergence(&mut driver);
    assert_cost_eq(best_cost(&driver), 14.0, "blocked door");
    assert!(!best_path(&driver).contains(&DOOR));
    assert_cost_eq(best_cost(&driver), reference_cost(&current_maze(&driver)), "oracle");
}

#[test]
fn unblocking_restores_the_short_route() {
    let mut driver = maze_driver(maze(catalogue::TWO_ROUTES, Connectivity::Four), 1.0, false);
    run_to_convergence(&mut driver);
    toggle(&mut driver, DOOR, true);
    run_to_convergence(&mut driver);
    toggle(&mut driver, DOOR, false);
    run_to_convergence(&mut driver);
    assert_cost_eq(best_cost(&driver), 8.0, "reopened door");
    assert!(best_path(&driver).contains(&DOOR));
}

#[test]
fn settled_nodes_upstream_of_the_change_keep_their_g() {
    let mut driver = maze_driver(maze(catalogue::TWO_ROUTES, Connectivity::Four), 1.0, false);
    run_to_convergence(&mut driver);
    let door = driver.context().lookup(&DOOR).unwrap();
    let door_g = driver.node(door).g;
    let upstream: BTreeMap<Cell, f64> = driver
        .closed()
        .iter()
        .map(|(&state, &id)| (state, driver.node(id).g))
        .filter(|&(state, g)| state != DOOR && g < door_g)
        .collect();
    assert!(!upstream.is_empty());

    toggle(&mut driver, DOOR, true);
    run_to_convergence(&mut driver);
    for (state, g) in upstream {
        let id = driver.context().lookup(&state).unwrap();
        assert_cost_eq(driver.node(id).g, g, &format!("{state:?}"));
    }
}

#[test]
fn changes_without_cost_effect_need_no_expansions() {
    let mut driver = maze_driver(maze(catalogue::TWO_ROUTES, Connectivity::Four), 1.0, false);
    run_to_convergence(&mut driver);
    let far = Cell::new(3, 4);
    let expansions = driver.stats().total_expansions;

    // Block and immediately unblock before the driver replans.
    let mut changed = driver.producer_mut().domain_mut().set_blocked(far, true);
    changed.extend(driver.producer_mut().domain_mut().set_blocked(far, false));
    driver.add_transitions_changed(changed);
    run_to_convergence(&mut driver);
    assert_cost_eq(best_cost(&driver), 8.0, "unchanged maze");
    assert_eq!(driver.stats().total_expansions, expansions);
}

#[test]
fn blocking_the_only_route_makes_the_goal_unreachable() {
    let mut driver = maze_driver(maze(catalogue::SERPENTINE, Connectivity::Four), 1.0, false);
    run_to_convergence(&mut driver);
    toggle(&mut driver, Cell::new(1, 6), true);
    run_to_convergence(&mut driver);
    assert!(best_cost(&driver).is_infinite());

    toggle(&mut driver, Cell::new(1, 6), false);
    run_to_convergence(&mut driver);
    assert_cost_eq(best_cost(&driver), 23.0, "serpentine reopened");
}

/// Deterministic LCG so the sequence is identical on every run.
struct Lcg(u64);

impl Lcg {
    fn next_below(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        usize::try_from(self.0 >> 33).unwrap() % bound
    }
}

#[test]
fn random_toggle_sequence_tracks_the_oracle() {
    for connectivity in [Connectivity::Four, Connectivity::Eight] {
        let m = maze(catalogue::ROOM, connectivity);
        let (start, goal) = (m.start(), m.goal());
        let free: Vec<Cell> = (0..m.rows())
            .flat_map(|r| (0..m.cols()).map(move |c| Cell::new(r, c)))
            .filter(|&c| m.is_free(c) && c != start && c != goal)
            .collect();

        let mut driver = maze_driver(m, 1.0, false);
        run_to_convergence(&mut driver);
        let mut rng = Lcg(0x5eed);
        for step in 0..40 {
            let cell = free[rng.next_below(free.len())];
            let blocked = !driver.producer().domain().is_blocked(cell);
            toggle(&mut driver, cell, blocked);
            run_to_convergence(&mut driver);
            let oracle = reference_cost(&current_maze(&driver));
            assert_cost_eq(
                best_cost(&driver),
                oracle,
                &format!("{connectivity:?} step {step} toggling {cell:?}"),
            );
        }
    }
}

#[test]
fn weighted_graph_cost_changes_are_repaired() {
    let graph = WeightedGraph::from_edges([
        (0, 1, 2),
        (1, 2, 2),
        (2, 5, 2),
        (0, 3, 3),
        (3, 4, 3),
        (4, 5, 3),
    ]);
    let mut driver = AdStarForward::with_single_goal(0, 5, AdStarExpander::new(graph));
    while driver.has_more_work() {
        driver.advance();
    }
    assert_eq!(driver.node(driver.best_goal()).g, 6);

    let changed = driver.producer_mut().domain_mut().set_edge_cost(1, 2, 50);
    driver.add_transitions_changed(changed);
    while driver.has_more_work() {
        driver.advance();
    }
    assert_eq!(driver.node(driver.best_goal()).g, 9);

    let changed = driver.producer_mut().domain_mut().set_edge_cost(4, 5, 0);
    driver.add_transitions_changed(changed);
    while driver.has_more_work() {
        driver.advance();
    }
    assert_eq!(driver.node(driver.best_goal()).g, 6);
    let path = driver.context().states_to(driver.best_goal());
    assert_eq!(path, vec![0, 3, 4, 5]);
}
