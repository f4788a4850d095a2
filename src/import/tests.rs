// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;
use serde_json::{json, Value};

use crate::model::{defaults, ArrowHead, EdgeId, MarkerKind, NodeId, NodeKind};
use crate::ops::LayerDirection;
use crate::store::GraphStore;
use crate::surface::HeadlessSurface;

use super::{
    import_into, parse_payload, payload_schema, validate_payload, DiagramPayload, SchemaError,
};

fn nid(raw: &str) -> NodeId {
    NodeId::new(raw).expect("node id")
}

fn eid(raw: &str) -> EdgeId {
    EdgeId::new(raw).expect("edge id")
}

fn paths(err: &SchemaError) -> Vec<&str> {
    err.issues.iter().map(|issue| issue.path.as_str()).collect()
}

fn three_nodes_two_edges() -> Value {
    json!({
        "nodes": [
            { "id": "a", "type": "rectangle", "position": { "x": 0, "y": 0 },
              "data": { "label": "Start" } },
            { "id": "b", "type": "diamond", "position": { "x": 200, "y": 0 } },
            { "id": "c", "type": "circle", "position": { "x": 400, "y": 0 },
              "data": { "color": "#000000" } }
        ],
        "edges": [
            { "id": "e1", "source": "a", "target": "b" },
            { "source": "b", "target": "c", "label": "yes", "animated": false }
        ]
    })
}

#[test]
fn valid_payload_is_built_with_defaults_filled_in() {
    let graph = validate_payload(&three_nodes_two_edges()).expect("valid payload");
    assert_eq!(graph.nodes().len(), 3);
    assert_eq!(graph.edges().len(), 2);

    let a = graph.node(&nid("a")).expect("a");
    assert_eq!(a.data().label, "Start");
    assert_eq!(a.z_index(), defaults::Z_INDEX);
    assert_eq!(
        (a.data().width, a.data().height),
        defaults::size(NodeKind::Rectangle)
    );
    assert_eq!(a.data().fill_color, defaults::palette_color(0));

    let b = graph.node(&nid("b")).expect("b");
    assert_eq!(b.kind(), NodeKind::Diamond);
    assert_eq!(b.data().label, "Diamond 1");

    let c = graph.node(&nid("c")).expect("c");
    assert_eq!(c.data().fill_color, "#000000");

    let e1 = graph.edge(&eid("e1")).expect("e1");
    assert!(e1.animated());
    assert_eq!(e1.marker_end().kind, MarkerKind::ArrowClosed);

    let generated = graph.edge(&eid("edge-b-c")).expect("generated edge id");
    assert!(!generated.animated());
    assert_eq!(generated.label(), Some("yes"));
    assert_eq!(graph.check_integrity(), Ok(()));
}

#[test]
fn arrow_nodes_get_arrow_style_defaults_and_overrides() {
    let payload = json!({
        "nodes": [
            { "id": "p", "type": "arrow", "position": { "x": 0, "y": 0 } },
            { "id": "q", "type": "arrow", "position": { "x": 0, "y": 0 },
              "data": { "rotation": 90, "arrowHead": "open" } }
        ]
    });
    let graph = validate_payload(&payload).expect("valid payload");

    let p = graph
        .node(&nid("p"))
        .and_then(|node| node.data().arrow.clone())
        .expect("arrow style");
    assert_eq!(p.head, ArrowHead::Closed);
    assert_eq!(p.rotation, 0.0);
    assert_eq!(graph.node(&nid("p")).expect("p").data().label, "");

    let q = graph
        .node(&nid("q"))
        .and_then(|node| node.data().arrow.clone())
        .expect("arrow style");
    assert_eq!(q.head, ArrowHead::Open);
    assert_eq!(q.rotation, 90.0);
}

#[test]
fn dangling_edge_rejects_the_whole_payload() {
    let payload = json!({
        "nodes": [{ "id": "a", "type": "rectangle", "position": { "x": 0, "y": 0 } }],
        "edges": [{ "id": "e1", "source": "a", "target": "ghost" }]
    });
    let err = validate_payload(&payload).expect_err("dangling edge");
    assert_eq!(paths(&err), vec!["edges[0].target"]);
    assert!(err.issues[0].message.contains("ghost"));
}

#[test]
fn rejected_import_leaves_the_live_graph_alone() {
    let mut store = GraphStore::default();
    let mut surface = HeadlessSurface::default();
    store.add_node(NodeKind::Circle);
    let before = store.graph().clone();
    let history_len = store.history().len();

    let payload = json!({
        "nodes": [{ "id": "a", "type": "rectangle", "position": { "x": 0, "y": 0 } }],
        "edges": [{ "source": "a", "target": "nowhere" }]
    });
    assert!(import_into(&mut store, &mut surface, &payload).is_err());

    assert_eq!(store.graph(), &before);
    assert_eq!(store.history().len(), history_len);
    assert_eq!(surface.fit_requests, 0);
}

#[rstest]
#[case::node_twice(json!({
    "nodes": [
        { "id": "a", "type": "rectangle", "position": { "x": 0, "y": 0 } },
        { "id": "a", "type": "circle", "position": { "x": 1, "y": 1 } }
    ]
}), "nodes[1].id")]
#[case::edge_reuses_node_id(json!({
    "nodes": [
        { "id": "a", "type": "rectangle", "position": { "x": 0, "y": 0 } },
        { "id": "b", "type": "rectangle", "position": { "x": 0, "y": 0 } }
    ],
    "edges": [{ "id": "a", "source": "a", "target": "b" }]
}), "edges[0].id")]
#[case::edge_twice(json!({
    "nodes": [
        { "id": "a", "type": "rectangle", "position": { "x": 0, "y": 0 } },
        { "id": "b", "type": "rectangle", "position": { "x": 0, "y": 0 } }
    ],
    "edges": [
        { "id": "e", "source": "a", "target": "b" },
        { "id": "e", "source": "b", "target": "a" }
    ]
}), "edges[1].id")]
fn duplicate_ids_are_rejected(#[case] payload: Value, #[case] path: &str) {
    let err = validate_payload(&payload).expect_err("duplicate id");
    assert_eq!(paths(&err), vec![path]);
    assert!(err.issues[0].message.contains("duplicate"));
}

#[test]
fn every_problem_is_reported_at_once() {
    let payload = json!({
        "nodes": [
            { "id": "a", "type": "hexagon", "position": { "x": 0, "y": 0 } },
            { "id": "b", "type": "circle", "position": { "x": "left", "y": 0 } },
            { "type": "diamond", "position": { "x": 0, "y": 0 } }
        ],
        "edges": [{ "source": "b", "target": "a", "animated": "yes" }]
    });
    let err = validate_payload(&payload).expect_err("invalid payload");
    let found = paths(&err);
    for expected in [
        "nodes[0].type",
        "nodes[1].position.x",
        "nodes[2].id",
        "edges[0].source",
        "edges[0].target",
        "edges[0].animated",
    ] {
        assert!(
            found.contains(&expected),
            "missing issue at {expected}: {found:?}"
        );
    }
    assert!(err.to_string().starts_with("invalid diagram schema"));
}

#[rstest]
#[case::not_an_object(json!([1, 2, 3]), "$")]
#[case::missing_nodes(json!({ "edges": [] }), "nodes")]
#[case::nodes_not_array(json!({ "nodes": {} }), "nodes")]
#[case::edges_not_array(json!({ "nodes": [], "edges": "none" }), "edges")]
fn malformed_top_level_is_rejected(#[case] payload: Value, #[case] path: &str) {
    let err = validate_payload(&payload).expect_err("malformed payload");
    assert_eq!(paths(&err), vec![path]);
}

#[test]
fn non_json_input_is_a_schema_error() {
    let err = parse_payload("{ nodes: ").expect_err("not json");
    assert_eq!(paths(&err), vec!["$"]);
}

#[test]
fn generated_edge_ids_avoid_taken_ones() {
    let payload = json!({
        "nodes": [
            { "id": "a", "type": "rectangle", "position": { "x": 0, "y": 0 } },
            { "id": "b", "type": "rectangle", "position": { "x": 0, "y": 0 } }
        ],
        "edges": [
            { "source": "a", "target": "b" },
            { "id": "edge-a-b", "source": "b", "target": "a" },
            { "source": "a", "target": "b" }
        ]
    });
    let graph = validate_payload(&payload).expect("valid payload");
    let ids = graph
        .edges()
        .keys()
        .map(|id| id.as_str().to_owned()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["edge-a-b", "edge-a-b-2", "edge-a-b-3"]);
    let explicit = graph.edge(&eid("edge-a-b")).expect("explicit");
    assert_eq!(explicit.source().as_str(), "b");
}

#[test]
fn empty_payload_imports_an_empty_graph() {
    let graph = validate_payload(&json!({ "nodes": [] })).expect("valid payload");
    assert!(graph.is_empty());
}

#[test]
fn successful_import_replaces_graph_fits_view_and_is_undoable() {
    let mut store = GraphStore::default();
    let mut surface = HeadlessSurface::default();
    store.add_node(NodeKind::Circle);
    let before = store.graph().clone();

    let summary = import_into(&mut store, &mut surface, &three_nodes_two_edges()).expect("import");
    assert_eq!((summary.nodes, summary.edges), (3, 2));
    assert_eq!(store.graph().nodes().len(), 3);
    assert_eq!(store.selected(), None);
    assert_eq!(surface.fit_requests, 1);

    assert!(store.undo());
    assert_eq!(store.graph(), &before);
    assert!(store.redo());
    assert_eq!(store.graph().edges().len(), 2);
}

#[test]
fn exported_schema_describes_nodes_and_edges() {
    let schema = payload_schema();
    let properties = &schema.as_value()["properties"];
    assert!(properties.get("nodes").is_some());
    assert!(properties.get("edges").is_some());
}

#[rstest]
#[case::max(json!(i64::MAX))]
#[case::min(json!(i64::MIN))]
#[case::just_past_limit(json!(defaults::Z_INDEX_LIMIT + 1))]
#[case::fractional(json!(10.5))]
fn z_index_outside_the_supported_range_is_rejected(#[case] z_index: Value) {
    let payload = json!({
        "nodes": [
            { "id": "a", "type": "rectangle", "position": { "x": 0, "y": 0 }, "zIndex": z_index }
        ]
    });
    let err = validate_payload(&payload).expect_err("z-index out of range");
    assert_eq!(paths(&err), vec!["nodes[0].zIndex"]);
}

#[test]
fn node_imported_at_the_z_limit_can_still_be_covered() {
    let mut store = GraphStore::default();
    let mut surface = HeadlessSurface::default();
    let payload = json!({
        "nodes": [
            { "id": "top", "type": "rectangle", "position": { "x": 0, "y": 0 },
              "zIndex": defaults::Z_INDEX_LIMIT },
            { "id": "low", "type": "circle", "position": { "x": 50, "y": 0 } }
        ]
    });
    import_into(&mut store, &mut surface, &payload).expect("import");

    store
        .change_layer(&nid("low"), LayerDirection::Front)
        .expect("change layer");

    let top = store.node(&nid("top")).expect("top").z_index();
    let low = store.node(&nid("low")).expect("low").z_index();
    assert!(low > top, "front must land strictly above {top}, got {low}");
}

fn onboarding_fixture() -> Value {
    let raw = include_str!("../../tests/fixtures/payloads/onboarding_flowchart.json");
    serde_json::from_str(raw).expect("fixture is JSON")
}

#[rstest]
#[case::mixed_kinds(three_nodes_two_edges())]
#[case::fixture(onboarding_fixture())]
#[case::null_edges(json!({ "nodes": [], "edges": null }))]
#[case::arrow_styles(json!({
    "nodes": [
        { "id": "p", "type": "arrow", "position": { "x": 0, "y": 0 }, "zIndex": 3,
          "data": { "rotation": 90, "arrowHead": "open", "arrowHeadColor": "#ff0000" } }
    ],
    "edges": [
        { "id": null, "source": "p", "target": "p", "animated": null,
          "markerEnd": { "type": "arrow" } }
    ]
}))]
fn accepted_payloads_fit_the_published_types(#[case] payload: Value) {
    let graph = validate_payload(&payload).expect("valid payload");
    let typed = serde_json::from_value::<DiagramPayload>(payload).expect("typed payload");

    assert_eq!(typed.nodes.len(), graph.nodes().len());
    assert_eq!(typed.edges.len(), graph.edges().len());
}

#[rstest]
#[case::unknown_kind(json!({
    "nodes": [{ "id": "a", "type": "hexagon", "position": { "x": 0, "y": 0 } }]
}))]
#[case::missing_position(json!({ "nodes": [{ "id": "a", "type": "circle" }] }))]
#[case::huge_z_index(json!({
    "nodes": [{ "id": "a", "type": "circle", "position": { "x": 0, "y": 0 }, "zIndex": i64::MAX }]
}))]
#[case::bad_marker(json!({
    "nodes": [{ "id": "a", "type": "circle", "position": { "x": 0, "y": 0 } }],
    "edges": [{ "source": "a", "target": "a", "markerEnd": { "type": "dot" } }]
}))]
#[case::label_not_text(json!({
    "nodes": [{ "id": "a", "type": "circle", "position": { "x": 0, "y": 0 } }],
    "edges": [{ "source": "a", "target": "a", "label": 7 }]
}))]
fn payloads_the_types_refuse_are_rejected(#[case] payload: Value) {
    let typed = serde_json::from_value::<DiagramPayload>(payload.clone());
    assert!(typed.is_err());
    assert!(validate_payload(&payload).is_err());
}
