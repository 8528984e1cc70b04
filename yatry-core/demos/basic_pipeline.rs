//! Demonstrates `Pipeline::run` end to end on the campus scenario worked
//! through `spec.md` §8's concrete scenarios. Not a CLI: a driver program
//! wiring up a `MapGraph` and passenger batch would do the same thing.

use yatry_core::{Config, MapGraph, Passenger, PassengerId, Pipeline, TimeWindow};

fn main() {
    tracing_subscriber::fmt::init();

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
    let output = pipeline.run(&graph, &passengers).expect("pipeline run");

    for group in &output.groups {
        println!(
            "group exemplar={} members={:?} departure_time={:.1}",
            group.exemplar, group.members, group.departure_time
        );
        for fare in &group.passenger_fares {
            println!("  passenger {} pays {:.2}", fare.passenger, fare.fare);
        }
    }
    println!(
        "clustering: {} iterations, converged={}",
        output.report.cluster_iterations, output.report.cluster_converged
    );
}
