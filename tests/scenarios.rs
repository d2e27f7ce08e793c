use std::f32::consts::TAU;

use relviz::chord::{self, ChordLayout};
use relviz::color::{ColorCode, GradientScale};
use relviz::config::{AxisConfig, ChordConfig, HiveConfig, LayoutKind, PanelConfig};
use relviz::graph::{NodeKey, RelationGraph, RelationGraphBuilder};
use relviz::hive;
use relviz::network::TickStatus;
use relviz::sort::SortPolicy;
use relviz::{Layout, LabelSplitter, Relation, RenderSession, render_pass};

fn sample() -> Vec<Relation> {
    vec![
        Relation::new("A", "B", 4.0),
        Relation::new("B", "A", 2.0),
        Relation::new("A", "C", 1.0),
    ]
}

fn edge_weight(graph: &RelationGraph, source: &str, target: &str) -> Option<f64> {
    let source = graph.node_id(&NodeKey::label(source))?;
    let target = graph.node_id(&NodeKey::label(target))?;
    graph
        .edges()
        .iter()
        .find(|edge| edge.source == source && edge.target == target)
        .map(|edge| edge.weight)
}

#[test]
fn directed_relations_keep_both_directions() {
    let graph = RelationGraphBuilder::new().directed(true).build(&sample());
    let labels = graph.nodes().iter().map(|node| node.label()).collect::<Vec<_>>();
    assert_eq!(labels, ["A", "B", "C"]);

    let a = &graph.nodes()[0];
    assert_eq!(a.out_weight, 5.0);
    assert_eq!(a.in_weight, 2.0);
    assert_eq!(graph.edges().len(), 3);
    assert_eq!(edge_weight(&graph, "A", "B"), Some(4.0));
    assert_eq!(edge_weight(&graph, "B", "A"), Some(2.0));
}

#[test]
fn undirected_relations_merge_by_pair() {
    let graph = RelationGraphBuilder::new().directed(false).build(&sample());
    assert_eq!(graph.edges().len(), 2);
    assert_eq!(edge_weight(&graph, "A", "B"), Some(6.0));
    assert_eq!(edge_weight(&graph, "A", "C"), Some(1.0));
    assert!(graph.edges().iter().all(|edge| !edge.directed));
}

#[test]
fn two_hive_axes_sit_a_third_of_a_turn_apart() {
    let relations = [
        Relation::new("noon", "Paris", 3.0).with_axes("Time", "City"),
        Relation::new("dusk", "Rome", 1.0).with_axes("Time", "City"),
    ];
    let graph = RelationGraphBuilder::new()
        .directed(true)
        .keyed_by_axis(true)
        .build(&relations);
    let config = HiveConfig {
        axes: vec![
            AxisConfig { axis: "Time".to_owned(), sort: SortPolicy::default() },
            AxisConfig { axis: "City".to_owned(), sort: SortPolicy::default() },
        ],
        ..HiveConfig::default()
    };
    let layout = hive::compute(&graph, &config);
    assert_eq!(layout.axes.len(), 2);
    let separation = layout.axis_separation(0, 1).unwrap();
    assert!((separation - TAU / 3.0).abs() < 1e-4, "separation was {separation}");
}

#[test]
fn equal_link_weights_take_the_first_gradient_color() {
    let palette = ColorCode::Colored.gradient();
    let scale = GradientScale::new(palette, 5.0, 5.0);
    assert_eq!(scale.color_for(5.0), palette[0]);

    let relations = [
        Relation::new("a", "b", 5.0).with_axes("X", "Y"),
        Relation::new("c", "d", 5.0).with_axes("X", "Y"),
    ];
    let graph = RelationGraphBuilder::new().directed(true).keyed_by_axis(true).build(&relations);
    let layout = hive::compute(&graph, &HiveConfig::default());
    assert_eq!(layout.links.len(), 2);
    assert!(layout.links.iter().all(|link| link.color == palette[0]));
}

#[test]
fn empty_relations_render_empty_diagrams() {
    let session = RenderSession::new();
    for kind in [LayoutKind::Chord, LayoutKind::Hive, LayoutKind::Network] {
        let mut diagram = render_pass(&[], &PanelConfig::default_for(kind), &session);
        assert!(diagram.graph.nodes().is_empty());
        assert!(diagram.graph.edges().is_empty());
        assert!(diagram.is_empty());
        assert_eq!(diagram.tick(&session), TickStatus::Settled);
        let controller = diagram.controller();
        assert!(controller.node_tooltip(relviz::graph::NodeId(0)).is_none());
    }
}

#[test]
fn terms_facet_feeds_a_chord_pass() {
    let raw = r#"{"terms": [
        {"term": "A-B", "count": 4},
        {"term": "B-A", "count": 2},
        {"term": "A-C", "count": 1}
    ]}"#;
    let relations = relviz::relation::parse_relations(raw, &LabelSplitter::new("-")).unwrap();
    assert_eq!(relations, sample());

    let config = PanelConfig::from_json_str(r#"{"type": "chord", "directed": true}"#).unwrap();
    let session = RenderSession::new();
    let diagram = render_pass(&relations, &config, &session);
    let Layout::Chord(layout) = &diagram.layout else {
        panic!("expected a chord layout");
    };
    assert_eq!(layout.groups.len(), 3);
    assert_eq!(layout.ribbons.len(), 2);
}

#[test]
fn chord_arcs_and_padding_fill_the_circle() {
    let graph = RelationGraphBuilder::new().directed(true).build(&sample());
    for config in [
        ChordConfig::default(),
        ChordConfig { padding: 0.2, ..ChordConfig::default() },
        ChordConfig { sorting: Some(SortPolicy::default()), ..ChordConfig::default() },
    ] {
        let layout: ChordLayout = chord::compute(&graph, &config);
        let arcs: f32 = layout.groups.iter().map(|group| group.span()).sum();
        let padding = layout.padding * layout.groups.len() as f32;
        assert!((arcs + padding - TAU).abs() < 1e-3, "arcs {arcs} + padding {padding}");
    }
}

#[test]
fn large_sparse_ring_stays_sparse_through_a_pass() {
    let size = 6000;
    let relations = (0..size)
        .map(|index| Relation::new(format!("n{index}"), format!("n{}", (index + 1) % size), 1.0))
        .collect::<Vec<_>>();
    let session = RenderSession::new();

    let diagram = render_pass(&relations, &PanelConfig::default_for(LayoutKind::Network), &session);
    assert_eq!(diagram.graph.nodes().len(), size);
    assert_eq!(diagram.graph.edges().len(), size);
    assert_eq!(diagram.graph.matrix().stored_cells(), size);
    assert_eq!(diagram.graph.directed_matrix().stored_cells(), size);

    let config = PanelConfig::from_json_str(r#"{"type": "network", "directed": false}"#).unwrap();
    let diagram = render_pass(&relations, &config, &session);
    assert_eq!(diagram.graph.matrix().stored_cells(), 2 * size);
    assert_eq!(diagram.graph.directed_matrix().stored_cells(), size);
}
