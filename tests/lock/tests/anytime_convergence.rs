//! Anytime lock tests: inflated passes return bounded-suboptimal paths and
//! tightening epsilon to 1 converges to the optimum without restarting.

use adstar_harness::policy::AnytimePolicy;
use adstar_harness::runner::run_anytime;
use adstar_harness::worlds::maze::{catalogue, Connectivity};
use adstar_harness::worlds::regimes::{all_regimes, regime_corridor};
use lock_tests::maze_test_helpers::{
    assert_cost_eq, best_cost, maze, maze_driver, reference_cost, run_to_convergence,
    COST_TOLERANCE,
};

#[test]
fn corridor_epsilon_two_and_a_half_then_one() {
    let regime = regime_corridor().unwrap();
    let optimal = reference_cost(&regime.maze);
    let mut driver = maze_driver(regime.maze, 2.5, false);

    run_to_convergence(&mut driver);
    let first = best_cost(&driver);
    assert!(first >= optimal - COST_TOLERANCE, "first pass beat the optimum");
    assert!(first <= 2.5 * optimal + COST_TOLERANCE, "first pass exceeded its bound");

    driver.set_epsilon(1.0).unwrap();
    run_to_convergence(&mut driver);
    assert_cost_eq(best_cost(&driver), optimal, "corridor final pass");
}

#[test]
fn every_pass_respects_its_bound() {
    for regime in all_regimes().unwrap() {
        let optimal = reference_cost(&regime.maze);
        let mut driver = maze_driver(regime.maze, regime.policy.epsilon_schedule[0], false);
        let report = run_anytime(&mut driver, &regime.policy).unwrap();

        assert_eq!(report.passes.len(), regime.policy.epsilon_schedule.len());
        for pass in &report.passes {
            if optimal.is_infinite() {
                assert!(!pass.reachable(), "{}: sealed goal reached", regime.name);
                continue;
            }
            assert!(
                pass.cost >= optimal - COST_TOLERANCE,
                "{}: pass {} below optimum",
                regime.name,
                pass.pass_index
            );
            assert!(
                pass.cost <= pass.epsilon * optimal + COST_TOLERANCE,
                "{}: pass {} cost {} exceeds {} x {}",
                regime.name,
                pass.pass_index,
                pass.cost,
                pass.epsilon,
                optimal
            );
        }
        assert!(report.costs_non_increasing(), "{}", regime.name);
        assert_cost_eq(report.final_cost().unwrap(), optimal, regime.name);
    }
}

#[test]
fn decreasing_schedule_yields_non_increasing_costs() {
    let m = maze(catalogue::ROOM, Connectivity::Eight);
    let optimal = reference_cost(&m);
    let mut driver = maze_driver(m, 8.0, false);
    let policy = AnytimePolicy {
        epsilon_schedule: vec![8.0, 4.0, 3.0, 2.0, 1.5, 1.25, 1.0],
        max_advances_per_pass: 10_000,
    };
    let report = run_anytime(&mut driver, &policy).unwrap();
    let costs: Vec<f64> = report.passes.iter().map(|p| p.cost).collect();
    for w in costs.windows(2) {
        assert!(w[1] <= w[0] + COST_TOLERANCE, "cost rose: {costs:?}");
    }
    assert_cost_eq(report.final_cost().unwrap(), optimal, "room final pass");
}

#[test]
fn each_epsilon_change_costs_one_replan() {
    let m = maze(catalogue::SERPENTINE, Connectivity::Four);
    let mut driver = maze_driver(m, 3.0, false);
    run_to_convergence(&mut driver);
    let replans = driver.stats().total_replans;

    driver.set_epsilon(2.0).unwrap();
    assert!(driver.is_replan_pending());
    run_to_convergence(&mut driver);
    assert_eq!(driver.stats().total_replans, replans + 1);
    assert!(!driver.is_replan_pending());
    assert!((driver.epsilon() - 2.0).abs() < f64::EPSILON);
}

#[test]
fn g_values_never_rise_without_cost_changes() {
    let m = maze(catalogue::ROOM, Connectivity::Eight);
    let mut driver = maze_driver(m, 4.0, false);
    run_to_convergence(&mut driver);
    let before: Vec<_> = driver.context().iter().map(|(id, n)| (id, n.g)).collect();

    driver.set_epsilon(1.0).unwrap();
    run_to_convergence(&mut driver);
    for (id, g) in before {
        let now = driver.node(id).g;
        assert!(now <= g, "{:?} rose from {g} to {now}", driver.node(id).state);
    }
}
