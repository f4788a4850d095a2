// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::edge::Edge;
use super::ids::{EdgeId, ElementRef, NodeId};
use super::node::Node;

/// The node/edge set of one diagram.
///
/// Mutation goes through `ops::apply_op` (or a whole-graph swap on import), which keeps
/// edges pointing at existing nodes and ids unique across both maps. Deserialized graphs
/// are checked against the same rules.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawGraph")]
pub struct Graph {
    nodes: BTreeMap<NodeId, Node>,
    edges: BTreeMap<EdgeId, Edge>,
}

#[derive(Deserialize)]
struct RawGraph {
    #[serde(default)]
    nodes: BTreeMap<NodeId, Node>,
    #[serde(default)]
    edges: BTreeMap<EdgeId, Edge>,
}

impl TryFrom<RawGraph> for Graph {
    type Error = GraphError;

    fn try_from(raw: RawGraph) -> Result<Self, Self::Error> {
        let graph = Self {
            nodes: raw.nodes,
            edges: raw.edges,
        };
        graph.check_integrity()?;
        Ok(graph)
    }
}

/// A graph that breaks the structural rules every live graph keeps.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("map key '{key}' does not match the id '{id}' stored under it")]
    KeyMismatch { key: String, id: String },
    #[error("id '{id}' is used by both a node and an edge")]
    SharedId { id: String },
    #[error("edge '{edge_id}' references missing node '{node_id}'")]
    DanglingEdge { edge_id: String, node_id: String },
}

impl Graph {
    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut BTreeMap<NodeId, Node> {
        &mut self.nodes
    }

    pub fn edges(&self) -> &BTreeMap<EdgeId, Edge> {
        &self.edges
    }

    pub(crate) fn edges_mut(&mut self) -> &mut BTreeMap<EdgeId, Edge> {
        &mut self.edges
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn edge(&self, edge_id: &EdgeId) -> Option<&Edge> {
        self.edges.get(edge_id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Whether `id` is taken by a node or an edge.
    pub fn contains_id(&self, id: &str) -> bool {
        self.nodes.contains_key(id) || self.edges.contains_key(id)
    }

    /// Resolves a raw id against the shared namespace.
    pub fn resolve(&self, id: &str) -> Option<ElementRef> {
        if let Some((node_id, _)) = self.nodes.get_key_value(id) {
            return Some(ElementRef::Node(node_id.clone()));
        }
        self.edges
            .get_key_value(id)
            .map(|(edge_id, _)| ElementRef::Edge(edge_id.clone()))
    }

    pub fn contains(&self, element: &ElementRef) -> bool {
        match element {
            ElementRef::Node(id) => self.nodes.contains_key(id),
            ElementRef::Edge(id) => self.edges.contains_key(id),
        }
    }

    pub fn edges_touching<'a>(
        &'a self,
        node_id: &'a NodeId,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .values()
            .filter(move |edge| edge.touches(node_id))
    }

    pub fn max_z_index(&self) -> Option<i64> {
        self.nodes.values().map(Node::z_index).max()
    }

    pub fn min_z_index(&self) -> Option<i64> {
        self.nodes.values().map(Node::z_index).min()
    }

    /// Nodes back-to-front, ties broken by id so the order is stable.
    pub fn render_order(&self) -> Vec<&Node> {
        let mut nodes = self.nodes.values().collect::<Vec<_>>();
        nodes.sort_by(|a, b| {
            a.z_index()
                .cmp(&b.z_index())
                .then_with(|| a.id().cmp(b.id()))
        });
        nodes
    }

    /// Checks keys against stored ids, the shared id namespace and edge endpoints.
    pub fn check_integrity(&self) -> Result<(), GraphError> {
        for (key, node) in &self.nodes {
            if key != node.id() {
                return Err(GraphError::KeyMismatch {
                    key: key.to_string(),
                    id: node.id().to_string(),
                });
            }
        }
        for (key, edge) in &self.edges {
            if key != edge.id() {
                return Err(GraphError::KeyMismatch {
                    key: key.to_string(),
                    id: edge.id().to_string(),
                });
            }
            if self.nodes.contains_key(key.as_str()) {
                return Err(GraphError::SharedId {
                    id: key.to_string(),
                });
            }
            for endpoint in [edge.source(), edge.target()] {
                if !self.nodes.contains_key(endpoint) {
                    return Err(GraphError::DanglingEdge {
                        edge_id: key.to_string(),
                        node_id: endpoint.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
