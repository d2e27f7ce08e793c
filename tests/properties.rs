use std::collections::HashSet;

use relviz::color::{ColorAssigner, ColorScheme};
use relviz::config::NetworkConfig;
use relviz::graph::{RelationGraphBuilder, aggregate_undirected};
use relviz::network;
use relviz::sort::{SortOrder, sort_by_property};
use relviz::{Relation, RenderSession};
use eframe::egui::Color32;

fn relation_lists() -> Vec<Vec<Relation>> {
    vec![
        Vec::new(),
        vec![Relation::new("A", "A", 3.0)],
        vec![
            Relation::new("A", "B", 4.0),
            Relation::new("B", "A", 2.0),
            Relation::new("A", "C", 1.0),
        ],
        vec![
            Relation::new("x", "y", 1.5),
            Relation::new("x", "y", 2.5),
            Relation::new("y", "z", 0.0),
            Relation::new("z", "x", 7.0),
            Relation::new("w", "x", 0.25),
        ],
    ]
}

#[test]
fn node_keys_are_unique_and_weights_balance() {
    for relations in relation_lists() {
        let graph = RelationGraphBuilder::new().directed(true).build(&relations);

        let keys = graph.nodes().iter().map(|node| &node.key).collect::<HashSet<_>>();
        assert_eq!(keys.len(), graph.nodes().len());

        let total: f64 = relations.iter().map(|relation| relation.weight).sum();
        let out: f64 = graph.nodes().iter().map(|node| node.out_weight).sum();
        let incoming: f64 = graph.nodes().iter().map(|node| node.in_weight).sum();
        assert!((out - total).abs() < 1e-9, "out {out} vs {total}");
        assert!((incoming - total).abs() < 1e-9, "in {incoming} vs {total}");
    }
}

#[test]
fn undirected_aggregation_is_idempotent() {
    for relations in relation_lists() {
        let graph = RelationGraphBuilder::new().directed(true).build(&relations);
        let once = aggregate_undirected(graph.edges());
        let twice = aggregate_undirected(&once);
        assert_eq!(once, twice);
    }
}

#[test]
fn node_sorting_is_stable_and_ignores_unknown_properties() {
    let relations = [
        Relation::new("c", "a", 1.0),
        Relation::new("b", "a", 1.0),
        Relation::new("d", "a", 1.0),
    ];
    let graph = RelationGraphBuilder::new().directed(true).build(&relations);
    let nodes = graph.nodes();

    let by_out = sort_by_property(nodes, "outgoing", SortOrder::Descending);
    let labels = by_out.iter().map(|node| node.label()).collect::<Vec<_>>();
    assert_eq!(labels, ["c", "b", "d", "a"]);

    let untouched = sort_by_property(nodes, "colour", SortOrder::Ascending);
    assert_eq!(untouched, nodes);
}

#[test]
fn palette_assignment_is_repeatable() {
    let palette = vec![
        Color32::from_rgb(10, 20, 30),
        Color32::from_rgb(40, 50, 60),
    ];
    let first = ColorAssigner::palette(palette.clone()).assign(7);
    let second = ColorAssigner::new(ColorScheme::Palette(palette)).assign(7);
    assert_eq!(first, second);
    assert_eq!(first[1], Color32::from_rgb(40, 50, 60));
}

#[test]
fn connectivity_is_symmetric() {
    for relations in relation_lists() {
        for directed in [true, false] {
            let graph = RelationGraphBuilder::new().directed(directed).build(&relations);
            let layout = network::compute(&graph, &NetworkConfig::default(), RenderSession::new().begin_pass());
            for a in graph.nodes() {
                for b in graph.nodes() {
                    assert_eq!(layout.is_connected(a.id, b.id), layout.is_connected(b.id, a.id));
                }
            }
        }
    }
}
