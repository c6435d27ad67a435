use crate::*;
use maplit::*;
use std::collections::BTreeSet;
use topology::{EdgeId, Network, Time, Train, TrainId};

fn line(sections: Vec<Vec<EdgeId>>) -> Network {
    let n = sections.iter().map(|s| s.len()).sum::<usize>();
    let edges = (0..n)
        .map(|i| (format!("e{}", i), i, i + 1, 10.0))
        .collect();
    let sections = sections
        .into_iter()
        .enumerate()
        .map(|(i, s)| (format!("ttd{}", i), s))
        .collect();
    Network::new(n + 1, edges, sections).unwrap()
}

fn train(id: TrainId, arrival: Time, start: EdgeId, goal: EdgeId) -> Train {
    Train {
        id,
        name: format!("t{}", id),
        arrival,
        start,
        stops: vec![goal],
        length: 10.0,
        speed: 1.0,
    }
}

/// Two trains running in the same direction on a single section, the
/// second one entering one time step after the first.
fn following() -> Instance {
    Instance::new(
        line(vec![vec![0, 1, 2]]),
        vec![train(0, 0, 0, 2), train(1, 1, 0, 2)],
        5,
    )
    .unwrap()
}

#[test]
fn following_trains_need_one_interior_border() {
    let solution = following().solve(&SolveConfig::base()).unwrap();
    assert!(solution.check());
    assert_eq!(solution.borders(), vec![0, 1, 3]);
    assert_eq!(solution.boundary_count(), 3);
    assert_eq!(solution.objectives().boundaries, Some(3));
    assert_eq!(solution.vss(0), vec![vec![0, 1], vec![1, 2, 3]]);
}

#[test]
fn following_trains_infeasible_without_vss() {
    assert!(following().solve(&SolveConfig::fixed_vss()).is_none());
}

#[test]
fn fixed_schedule_keeps_stop_requirements() {
    let solution = following().solve(&SolveConfig::fixed_schedule()).unwrap();
    assert_eq!(solution.borders(), vec![0, 1, 3]);
}

#[test]
fn optimize_prefers_early_exit() {
    let solution = following().solve(&SolveConfig::optimize()).unwrap();
    assert!(solution.check());
    // The first train leaves after visiting e2 at t=2; the second one is
    // held back on e0 until t=2 and cannot leave within the horizon.
    assert_eq!(solution.finished_count(), 2);
    assert_eq!(solution.objectives().unfinished, Some(9 - 2));
    assert_eq!(solution.boundary_count(), 3);
    assert_eq!(solution.objectives().boundaries, Some(3));
    assert!(solution.occupied_edges(0, 3).is_empty());
    assert!(solution.occupied_edges(0, 4).is_empty());
}

#[test]
fn following_train_routes() {
    let solution = following().solve(&SolveConfig::base()).unwrap();
    let routes = solution.train_routes();
    assert_eq!(routes.len(), 2);

    let a = routes[0]
        .steps
        .iter()
        .map(|s| (s.time, s.edges.clone()))
        .collect::<Vec<_>>();
    assert_eq!(a, vec![(0, vec![0]), (1, vec![1]), (2, vec![2])]);
    assert_eq!(routes[0].steps[2].endpoints, vec![(2, 3)]);

    let b = routes[1]
        .steps
        .iter()
        .map(|s| (s.time, s.edges.clone()))
        .collect::<Vec<_>>();
    assert_eq!(b, vec![(1, vec![0]), (2, vec![0]), (3, vec![1]), (4, vec![2])]);

    assert_eq!(
        format!("{}", routes[0]),
        "t0:\n  t=0: (0 1)\n  t=1: (1 2)\n  t=2: (2 3)\n"
    );
    assert_eq!(format!("{}", solution.vss_layout()), "ttd0: [0 1] [1 2 3]\n");
}

#[test]
fn opposing_trains_cannot_pass_on_single_line() {
    let instance = Instance::new(
        line(vec![vec![0, 1, 2]]),
        vec![train(0, 0, 0, 2), train(1, 0, 2, 0)],
        5,
    )
    .unwrap();
    assert!(instance.solve(&SolveConfig::base()).is_none());
    assert!(instance.solve(&SolveConfig::optimize()).is_none());
}

#[test]
fn solution_properties() {
    let solution = following().solve(&SolveConfig::base()).unwrap();
    let instance = solution.instance();
    let horizon = instance.horizon();

    // Stop coverage.
    for train in instance.trains() {
        assert!(solution.occupies(train.id, train.arrival, train.start));
        for stop in &train.stops {
            assert!((train.arrival..horizon).any(|t| solution.occupies(train.id, t, *stop)));
        }
    }

    // Occupancy exclusivity.
    for t in 0..horizon {
        for e in 0..instance.network().edges().len() {
            assert!(!(solution.occupies(0, t, e) && solution.occupies(1, t, e)));
        }
    }

    // Length conservation: a 10 m train on 10 m edges covers one edge.
    for train in instance.trains() {
        for t in train.arrival..horizon {
            assert!(solution.occupied_edges(train.id, t).len() <= 1);
        }
    }

    // Nothing is tracked before arrival.
    assert!(solution.occupied_edges(1, 0).is_empty());
}

#[test]
fn fixed_vss_uses_physical_boundaries_only() {
    // Vertex 2 separates the two detection sections.
    let network = line(vec![vec![0, 1], vec![2]]);
    let instance = Instance::new(network, vec![train(0, 0, 0, 2)], 4).unwrap();

    let fixed = instance.solve(&SolveConfig::fixed_vss()).unwrap();
    assert!(fixed.check());
    let physical = (0..4)
        .filter(|v| instance.network().is_boundary(*v))
        .collect::<Vec<_>>();
    assert_eq!(physical, vec![0, 2, 3]);
    assert_eq!(fixed.borders(), physical);
    assert_eq!(fixed.objectives(), ObjectiveValues::default());

    let base = instance.solve(&SolveConfig::base()).unwrap();
    assert_eq!(base.borders(), physical);
    assert_eq!(base.vss_layout().sections.len(), 2);
    assert_eq!(base.vss(0), vec![vec![0, 1, 2]]);
    assert_eq!(base.vss(1), vec![vec![2, 3]]);
}

#[test]
fn vss_decoding_round_trip() {
    let instance = Instance::new(line(vec![vec![0, 1, 2, 3]]), vec![train(0, 0, 0, 3)], 2).unwrap();
    let vars = instance.variables();
    let interior = vec![1, 2, 3];

    for bits in 0..(1usize << interior.len()) {
        let chosen = interior
            .iter()
            .enumerate()
            .filter(|(i, _)| bits & (1 << i) != 0)
            .map(|(_, v)| *v)
            .collect::<BTreeSet<_>>();
        let mut values = vec![false; vars.count()];
        for v in &chosen {
            values[vars.border(*v).0] = true;
        }
        let solution = Solution::new(instance.clone(), vec![], values, ObjectiveValues::default());

        let runs = solution.vss(0);
        assert_eq!(runs.first().and_then(|r| r.first()), Some(&0));
        assert_eq!(runs.last().and_then(|r| r.last()), Some(&4));
        let mut derived = BTreeSet::new();
        for pair in runs.windows(2) {
            let end = pair[0][pair[0].len() - 1];
            assert_eq!(Some(&end), pair[1].first());
            derived.insert(end);
        }
        assert_eq!(derived, chosen);
    }
}

#[test]
fn stop_constraints_cover_every_stop() {
    let network = line(vec![vec![0, 1, 2]]);
    let mut t = train(0, 1, 0, 2);
    t.stops = vec![1, 2];
    let instance = Instance::new(network, vec![t], 4).unwrap();
    let stops = instance.stop_constraints();
    // Start edge at arrival, plus one disjunction per stop.
    assert_eq!(stops.len(), 3);
    let vars = instance.variables();
    assert_eq!(stops[0], Formula::Var(vars.occupies(0, 1, 0)));
    assert_eq!(
        stops[1].vars().into_iter().collect::<BTreeSet<_>>(),
        btreeset! { vars.occupies(0, 1, 1), vars.occupies(0, 2, 1), vars.occupies(0, 3, 1) }
    );

    let solution = instance.solve(&SolveConfig::base()).unwrap();
    assert!(solution.occupies(0, 1, 0));
    assert!(solution.occupies(0, 2, 1));
    assert!(solution.occupies(0, 3, 2));
}

#[test]
fn boundary_constraints_by_policy() {
    let instance = following();
    let vars = instance.variables();
    let free = instance.boundary_constraints(BoundaryPolicy::Free);
    assert_eq!(
        free,
        vec![Formula::from(vars.border(0)), Formula::from(vars.border(3))]
    );
    let fixed = instance.boundary_constraints(BoundaryPolicy::PhysicalOnly);
    assert_eq!(fixed.len(), 4);
    assert_eq!(fixed[1], !vars.border(1));
}

#[test]
fn train_without_path_is_infeasible() {
    // Two disconnected stretches of track.
    let network = Network::new(
        4,
        vec![("a".to_string(), 0, 1, 10.0), ("b".to_string(), 2, 3, 10.0)],
        vec![("s1".to_string(), vec![0]), ("s2".to_string(), vec![1])],
    )
    .unwrap();
    let instance = Instance::new(network, vec![train(0, 0, 0, 1)], 3).unwrap();
    assert!(instance.paths(0).is_empty());
    assert!(instance.solve(&SolveConfig::base()).is_none());
}

#[test]
fn rejects_malformed_trains() {
    let network = || line(vec![vec![0, 1, 2]]);
    assert_eq!(
        Instance::new(network(), vec![train(0, 0, 0, 2)], 0).unwrap_err(),
        InstanceError::ZeroHorizon
    );
    assert_eq!(
        Instance::new(network(), vec![train(1, 0, 0, 2)], 3).unwrap_err(),
        InstanceError::NonDenseId("t1".to_string(), 1, 0)
    );
    let mut t = train(0, 0, 0, 2);
    t.stops.clear();
    assert_eq!(
        Instance::new(network(), vec![t], 3).unwrap_err(),
        InstanceError::NoStops("t0".to_string())
    );
    assert_eq!(
        Instance::new(network(), vec![train(0, 0, 0, 7)], 3).unwrap_err(),
        InstanceError::UnknownEdge("t0".to_string(), 7)
    );
    let mut t = train(0, 0, 0, 2);
    t.speed = 0.0;
    assert_eq!(
        Instance::new(network(), vec![t], 3).unwrap_err(),
        InstanceError::NonPositiveSpeed("t0".to_string())
    );
    assert_eq!(
        Instance::new(network(), vec![train(0, 3, 0, 2)], 3).unwrap_err(),
        InstanceError::ArrivalOutsideHorizon("t0".to_string(), 3, 3)
    );
}

#[test]
fn instance_from_text() {
    let network = topology::get_network_string(
        "
        # single detection section
        vertices 4
        edge e0 0 1 10
        edge e1 1 2 10
        edge e2 2 3 10
        section ttd0 e0 e1 e2
        ",
    )
    .unwrap();
    let trains = topology::input::train_parser::parse_trains(
        "train a arrival=0 start=e0 stops=e2 length=10 speed=1\n\
         train b arrival=1 start=e0 stops=e2 length=10 speed=1\n",
        &network,
    )
    .unwrap();
    let instance = Instance::new(network, trains, 5).unwrap();
    let stats = instance.stats();
    assert_eq!(stats.occupancy_variables, (5 + 4) * 3);
    assert_eq!(stats.variables, (5 + 4) * 3 + 4);
    assert_eq!(stats.paths, 2);

    let solution = instance.solve(&Variant::Base.config()).unwrap();
    assert_eq!(solution.vss_layout().sections[0].1, vec![vec![0, 1], vec![1, 2, 3]]);
}

#[test]
fn derived_instances_share_constraints() {
    let base = following();
    let derived = base.clone();
    assert!(std::ptr::eq(base.constraints(), derived.constraints()));
    assert!(derived.solve(&SolveConfig::fixed_vss()).is_none());
    assert!(base.solve(&SolveConfig::base()).is_some());
}
