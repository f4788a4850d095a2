// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Op application helpers used by `apply_op`/`apply_ops`.
/// Every branch validates first so a failing op never leaves a half-applied change.
fn apply_one(graph: &mut Graph, op: &Op, delta: &mut DeltaBuilder) -> Result<(), ApplyError> {
    match op {
        Op::AddNode { node } => {
            if graph.contains_id(node.id().as_str()) {
                return Err(ApplyError::AlreadyExists {
                    id: node.id().to_string(),
                });
            }
            graph.nodes_mut().insert(node.id().clone(), node.clone());
            delta.record_added(ElementRef::Node(node.id().clone()));
            Ok(())
        }
        Op::UpdateNode { node_id, patch } => {
            let existing = node_mut(graph, node_id)?;
            if patch.touches_arrow_fields() && existing.data().arrow.is_none() {
                return Err(ApplyError::NotAnArrow {
                    node_id: node_id.clone(),
                });
            }
            merge_node_patch(existing, patch);
            delta.record_updated(ElementRef::Node(node_id.clone()));
            Ok(())
        }
        Op::MoveNode { node_id, position } => {
            node_mut(graph, node_id)?.set_position(*position);
            delta.record_updated(ElementRef::Node(node_id.clone()));
            Ok(())
        }
        Op::ChangeLayer { node_id, direction } => {
            if graph.node(node_id).is_none() {
                return Err(not_found(ObjectKind::Node, node_id.as_str()));
            }
            let z_index = match layer_z_index(graph, *direction) {
                Some(z_index) => z_index,
                None => {
                    compact_z_order(graph, delta);
                    // Compacted indices are 0..n, so there is room on both sides.
                    layer_z_index(graph, *direction).unwrap_or_default()
                }
            };
            node_mut(graph, node_id)?.set_z_index(z_index);
            delta.record_updated(ElementRef::Node(node_id.clone()));
            Ok(())
        }
        Op::RemoveNode { node_id } => {
            if graph.nodes_mut().remove(node_id).is_none() {
                return Err(not_found(ObjectKind::Node, node_id.as_str()));
            }
            let removed_edge_ids = graph
                .edges_touching(node_id)
                .map(|edge| edge.id().clone())
                .collect::<Vec<_>>();
            graph.edges_mut().retain(|_, edge| !edge.touches(node_id));
            for edge_id in removed_edge_ids {
                delta.record_removed(ElementRef::Edge(edge_id));
            }
            delta.record_removed(ElementRef::Node(node_id.clone()));
            Ok(())
        }
        Op::AddEdge { edge } => {
            if graph.contains_id(edge.id().as_str()) {
                return Err(ApplyError::AlreadyExists {
                    id: edge.id().to_string(),
                });
            }
            for endpoint in [edge.source(), edge.target()] {
                if graph.node(endpoint).is_none() {
                    return Err(ApplyError::InvalidReference {
                        node_id: endpoint.to_string(),
                    });
                }
            }
            graph.edges_mut().insert(edge.id().clone(), edge.clone());
            delta.record_added(ElementRef::Edge(edge.id().clone()));
            Ok(())
        }
        Op::UpdateEdge { edge_id, patch } => {
            let Some(existing) = graph.edges_mut().get_mut(edge_id) else {
                return Err(not_found(ObjectKind::Edge, edge_id.as_str()));
            };
            merge_edge_patch(existing, patch);
            delta.record_updated(ElementRef::Edge(edge_id.clone()));
            Ok(())
        }
        Op::RemoveEdge { edge_id } => {
            if graph.edges_mut().remove(edge_id).is_none() {
                return Err(not_found(ObjectKind::Edge, edge_id.as_str()));
            }
            delta.record_removed(ElementRef::Edge(edge_id.clone()));
            Ok(())
        }
        Op::Clear => {
            let removed = graph
                .edges()
                .keys()
                .map(|id| ElementRef::Edge(id.clone()))
                .chain(graph.nodes().keys().map(|id| ElementRef::Node(id.clone())))
                .collect::<Vec<_>>();
            *graph = Graph::default();
            for element in removed {
                delta.record_removed(element);
            }
            Ok(())
        }
    }
}

/// `max + 1` or `min - 1`; `None` when that would leave the `i64` range.
fn layer_z_index(graph: &Graph, direction: LayerDirection) -> Option<i64> {
    match direction {
        LayerDirection::Front => graph.max_z_index()?.checked_add(1),
        LayerDirection::Back => graph.min_z_index()?.checked_sub(1),
    }
}

/// Renumbers every node to its render-order rank, keeping the relative stacking.
fn compact_z_order(graph: &mut Graph, delta: &mut DeltaBuilder) {
    let ranked = graph
        .render_order()
        .into_iter()
        .map(|node| node.id().clone())
        .collect::<Vec<_>>();
    for (rank, node_id) in ranked.into_iter().enumerate() {
        let Some(node) = graph.nodes_mut().get_mut(&node_id) else {
            continue;
        };
        let rank = rank as i64;
        if node.z_index() != rank {
            node.set_z_index(rank);
            delta.record_updated(ElementRef::Node(node_id));
        }
    }
}

fn node_mut<'a>(graph: &'a mut Graph, node_id: &NodeId) -> Result<&'a mut Node, ApplyError> {
    graph
        .nodes_mut()
        .get_mut(node_id)
        .ok_or_else(|| not_found(ObjectKind::Node, node_id.as_str()))
}

fn not_found(kind: ObjectKind, id: &str) -> ApplyError {
    ApplyError::NotFound {
        kind,
        id: id.to_owned(),
    }
}

fn merge_node_patch(node: &mut Node, patch: &NodePatch) {
    let data = node.data_mut();
    if let Some(label) = &patch.label {
        data.label = label.clone();
    }
    if let Some(fill_color) = &patch.fill_color {
        data.fill_color = fill_color.clone();
    }
    if let Some(text_color) = &patch.text_color {
        data.text_color = text_color.clone();
    }
    if let Some(font_weight) = &patch.font_weight {
        data.font_weight = font_weight.clone();
    }
    if let Some(width) = patch.width {
        data.width = width;
    }
    if let Some(height) = patch.height {
        data.height = height;
    }
    if let Some(font_size) = patch.font_size {
        data.font_size = font_size;
    }
    if let Some(text_offset) = patch.text_offset {
        data.text_offset = text_offset;
    }
    if let Some(arrow) = data.arrow.as_mut() {
        if let Some(rotation) = patch.rotation {
            arrow.rotation = rotation;
        }
        if let Some(head) = patch.arrow_head {
            arrow.head = head;
        }
        if let Some(head_color) = &patch.arrow_head_color {
            arrow.head_color = head_color.clone();
        }
    }
}

fn merge_edge_patch(edge: &mut Edge, patch: &EdgePatch) {
    if let Some(label) = &patch.label {
        edge.set_label(label.clone());
    }
    if let Some(animated) = patch.animated {
        edge.set_animated(animated);
    }
    if let Some(kind) = patch.marker_kind {
        edge.marker_end_mut().kind = kind;
    }
    if let Some(color) = &patch.marker_color {
        edge.marker_end_mut().color = color.clone();
    }
}
