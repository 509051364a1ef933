use dslab_core::Id;
use dslab_topology::{
    shortest_path::ShortestPathTopology,
    topology::{NetworkTopology, NullTopology, TopologyError},
};

const A: Id = 0;
const B: Id = 1;
const C: Id = 2;
const D: Id = 3;

#[test]
fn null_topology() {
    let mut topology = NullTopology;
    assert_eq!(topology.add_link(A, B, 100., 1.), Ok(()));
    assert_eq!(topology.delay(A, B), 0.);
    topology.remove_link(A, B);
    assert_eq!(topology.delay(C, D), 0.);
}

#[test]
fn shortest_path_delay() {
    let mut topology = ShortestPathTopology::new();
    topology.add_link(A, B, 100., 1.).unwrap();
    topology.add_link(B, C, 100., 2.).unwrap();
    topology.add_link(A, C, 100., 5.).unwrap();

    assert!((topology.delay(A, C) - 3.).abs() < 1e-9);
    assert!((topology.delay(C, A) - 3.).abs() < 1e-9);
    assert_eq!(topology.delay(B, B), 0.);
    assert_eq!(topology.bandwidth(C, B), Some(100.));

    topology.remove_link(B, C);
    assert!((topology.delay(A, C) - 5.).abs() < 1e-9);
}

#[test]
fn unknown_and_disconnected_nodes() {
    let mut topology = ShortestPathTopology::new();
    topology.add_link(A, B, 10., 1.).unwrap();
    topology.add_node(C);

    assert_eq!(topology.try_delay(A, C), None);
    assert_eq!(topology.delay(A, C), 0.);
    assert_eq!(topology.try_delay(A, D), None);
    assert_eq!(topology.delay(D, D), 0.);
    assert_eq!(topology.try_delay(C, C), Some(0.));

    topology.remove_link(A, B);
    assert_eq!(topology.try_delay(A, B), None);
    assert_eq!(topology.nodes().len(), 3);
}

#[test]
fn invalid_links_are_rejected() {
    let mut topology = ShortestPathTopology::new();
    assert!(matches!(
        topology.add_link(A, B, 0., 1.),
        Err(TopologyError::InvalidLink { src: A, dst: B, .. })
    ));
    assert!(matches!(
        topology.add_link(A, B, 10., -1.),
        Err(TopologyError::InvalidLink { .. })
    ));
    assert!(matches!(
        topology.add_link(A, B, 10., f64::NAN),
        Err(TopologyError::InvalidLink { .. })
    ));
    assert!(topology.nodes().is_empty());
}

#[test]
fn replaced_link_updates_delay() {
    let mut topology = ShortestPathTopology::new();
    topology.add_link(A, B, 100., 4.).unwrap();
    topology.add_link(B, A, 50., 1.).unwrap();
    assert!((topology.delay(A, B) - 1.).abs() < 1e-9);
    assert_eq!(topology.bandwidth(A, B), Some(50.));
    assert!(matches!(
        topology.add_link(C, C, 10., 1.),
        Err(TopologyError::InvalidLink { src: C, dst: C, .. })
    ));
}
