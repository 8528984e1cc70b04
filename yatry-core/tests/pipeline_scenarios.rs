//! Integration tests mirroring the six concrete scenarios and the
//! idempotence/ordering guarantees of `spec.md` §8.

use yatry_core::{BracketPolicy, Config, MapGraph, Passenger, PassengerId, Pipeline, TimeWindow};

fn forced_single_cluster() -> Config {
    Config {
        // A strongly negative preference discourages every candidate
        // exemplar, biasing affinity propagation toward the smallest
        // possible number of clusters; used where a scenario's narrative
        // assumes a single group regardless of the default percentile rule.
        preference_override: Some(-1_000_000.0),
        ..Config::default()
    }
}

#[test]
fn scenario_1_two_identical_passengers_share_one_vehicle() {
    let mut graph = MapGraph::new("IISERB");
    let root = graph.root();
    let dmart = graph.register_location("DMART");
    let lal_ghati = graph.register_location("LAL_GHATI");
    graph.add_edge(root, dmart, 150.0).unwrap();
    graph.add_edge(dmart, lal_ghati, 50.0).unwrap();

    let window = TimeWindow::new(0.0, 3600.0).unwrap();
    let passengers = vec![
        Passenger::new(PassengerId::new(0), root, lal_ghati, window),
        Passenger::new(PassengerId::new(1), root, lal_ghati, window),
    ];

    let pipeline = Pipeline::new(forced_single_cluster());
    let output = pipeline.run(&graph, &passengers).unwrap();

    assert_eq!(output.groups.len(), 1);
    let group = &output.groups[0];
    assert_eq!(group.members, vec![0, 1]);
    assert!((group.departure_time - 1800.0).abs() < 1.0);
    assert_eq!(group.vehicles.len(), 1);
    assert_eq!(group.passenger_fares.len(), 2);
    for fare in &group.passenger_fares {
        assert!((fare.fare - 100.0).abs() < 1e-6);
    }
}

#[test]
fn scenario_2_prefix_subsumption_splits_fare_by_route_length() {
    let mut graph = MapGraph::new("IISERB");
    let root = graph.root();
    let dmart = graph.register_location("DMART");
    let lal_ghati = graph.register_location("LAL_GHATI");
    graph.add_edge(root, dmart, 150.0).unwrap();
    graph.add_edge(dmart, lal_ghati, 50.0).unwrap();

    let window = TimeWindow::new(0.0, 3600.0).unwrap();
    let passengers = vec![
        Passenger::new(PassengerId::new(0), root, dmart, window),
        Passenger::new(PassengerId::new(1), root, lal_ghati, window),
    ];

    let pipeline = Pipeline::new(forced_single_cluster());
    let output = pipeline.run(&graph, &passengers).unwrap();

    assert_eq!(output.groups.len(), 1);
    let group = &output.groups[0];
    assert_eq!(group.vehicles.len(), 1);

    let mut fares = group.passenger_fares.clone();
    fares.sort_by_key(|f| f.passenger);
    assert!((fares[0].fare - 75.0).abs() < 1e-6);
    assert!((fares[1].fare - 125.0).abs() < 1e-6);
}

#[test]
fn scenario_3_disjoint_routes_form_two_clusters() {
    let mut graph = MapGraph::new("IISERB");
    let root = graph.root();
    let shivhare = graph.register_location("SHIVHARE");
    let green_bay = graph.register_location("GREEN_BAY");
    graph.add_edge(root, shivhare, 80.0).unwrap();
    graph.add_edge(root, green_bay, 120.0).unwrap();

    let window = TimeWindow::new(0.0, 3600.0).unwrap();
    let passengers = vec![
        Passenger::new(PassengerId::new(0), root, shivhare, window),
        Passenger::new(PassengerId::new(1), root, green_bay, window),
    ];

    let pipeline = Pipeline::new(Config::default());
    let output = pipeline.run(&graph, &passengers).unwrap();

    assert_eq!(output.groups.len(), 2);
}

#[test]
fn scenario_4_capacity_split_produces_two_vehicles() {
    let mut graph = MapGraph::new("IISERB");
    let root = graph.root();
    let dmart = graph.register_location("DMART");
    let lal_ghati = graph.register_location("LAL_GHATI");
    graph.add_edge(root, dmart, 150.0).unwrap();
    graph.add_edge(dmart, lal_ghati, 50.0).unwrap();

    let window = TimeWindow::new(0.0, 3600.0).unwrap();
    let passengers: Vec<Passenger> = (0..7)
        .map(|i| Passenger::new(PassengerId::new(i), root, lal_ghati, window))
        .collect();

    let pipeline = Pipeline::new(Config {
        capacity: 5,
        ..forced_single_cluster()
    });
    let output = pipeline.run(&graph, &passengers).unwrap();

    assert_eq!(output.groups.len(), 1);
    let group = &output.groups[0];
    assert_eq!(group.members.len(), 7);
    assert_eq!(group.vehicles.len(), 2);

    let mut occupancy: Vec<usize> = group.vehicles.iter().map(|v| v.trips[0].count as usize).collect();
    occupancy.sort_unstable();
    assert_eq!(occupancy, vec![2, 5]);

    for vehicle in &group.vehicles {
        for trip in &vehicle.trips {
            assert!(trip.count <= 5);
        }
    }

    let mut fares: Vec<f64> = group.passenger_fares.iter().map(|f| f.fare).collect();
    fares.sort_by(|a, b| a.partial_cmp(b).unwrap());
    for fare in &fares[..5] {
        assert!((fare - 40.0).abs() < 1e-6);
    }
    for fare in &fares[5..] {
        assert!((fare - 100.0).abs() < 1e-6);
    }
}

#[test]
fn scenario_5_mismatched_windows_form_two_clusters() {
    let mut graph = MapGraph::new("IISERB");
    let root = graph.root();
    let lal_ghati = graph.register_location("LAL_GHATI");
    graph.add_edge(root, lal_ghati, 200.0).unwrap();

    let passengers = vec![
        Passenger::new(
            PassengerId::new(0),
            root,
            lal_ghati,
            TimeWindow::new(0.0, 600.0).unwrap(),
        ),
        Passenger::new(
            PassengerId::new(1),
            root,
            lal_ghati,
            TimeWindow::new(7200.0, 7800.0).unwrap(),
        ),
    ];

    let pipeline = Pipeline::new(Config::default());
    let output = pipeline.run(&graph, &passengers).unwrap();

    assert_eq!(output.groups.len(), 2);
}

#[test]
fn scenario_6_golden_section_bracket_finds_the_analytic_midpoint() {
    let mut graph = MapGraph::new("IISERB");
    let root = graph.root();
    let lal_ghati = graph.register_location("LAL_GHATI");
    graph.add_edge(root, lal_ghati, 200.0).unwrap();

    let passengers = vec![
        Passenger::new(
            PassengerId::new(0),
            root,
            lal_ghati,
            TimeWindow::new(70.0, 130.0).unwrap(),
        ),
        Passenger::new(
            PassengerId::new(1),
            root,
            lal_ghati,
            TimeWindow::new(90.0, 150.0).unwrap(),
        ),
    ];

    let pipeline = Pipeline::new(Config {
        bracket_policy: BracketPolicy::Wide,
        ..forced_single_cluster()
    });
    let output = pipeline.run(&graph, &passengers).unwrap();

    assert_eq!(output.groups.len(), 1);
    assert!((output.groups[0].departure_time - 110.0).abs() < 0.5);
}

#[test]
fn pipeline_is_idempotent_given_identical_input() {
    let mut graph = MapGraph::new("IISERB");
    let root = graph.root();
    let dmart = graph.register_location("DMART");
    let lal_ghati = graph.register_location("LAL_GHATI");
    let shivhare = graph.register_location("SHIVHARE");
    graph.add_edge(root, dmart, 150.0).unwrap();
    graph.add_edge(dmart, lal_ghati, 50.0).unwrap();
    graph.add_edge(root, shivhare, 80.0).unwrap();

    let passengers = vec![
        Passenger::new(
            PassengerId::new(0),
            root,
            lal_ghati,
            TimeWindow::new(0.0, 3600.0).unwrap(),
        ),
        Passenger::new(
            PassengerId::new(1),
            root,
            lal_ghati,
            TimeWindow::new(0.0, 3600.0).unwrap(),
        ),
        Passenger::new(
            PassengerId::new(2),
            root,
            shivhare,
            TimeWindow::new(7200.0, 7800.0).unwrap(),
        ),
    ];

    let pipeline = Pipeline::new(Config::default());
    let first = pipeline.run(&graph, &passengers).unwrap();
    let second = pipeline.run(&graph, &passengers).unwrap();
    assert_eq!(first, second);
}

#[test]
fn rejects_empty_passenger_batch() {
    let graph = MapGraph::new("IISERB");
    let pipeline = Pipeline::new(Config::default());
    let result = pipeline.run(&graph, &[]);
    assert!(matches!(result, Err(yatry_core::Error::EmptyPassengers)));
}
