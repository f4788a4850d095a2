// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for the diagram graph.
//!
//! Ops are validated before they touch the graph and produce a minimal delta that the
//! store logs and the render surface can use to refresh derived state. A batch is
//! applied to a copy and swapped in only when every op succeeded.

use std::collections::BTreeSet;

use crate::model::{ArrowHead, Edge, EdgeId, ElementRef, Graph, MarkerKind, Node, NodeId, Position};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    AddNode { node: Node },
    UpdateNode { node_id: NodeId, patch: NodePatch },
    MoveNode { node_id: NodeId, position: Position },
    ChangeLayer {
        node_id: NodeId,
        direction: LayerDirection,
    },
    RemoveNode { node_id: NodeId },
    AddEdge { edge: Edge },
    UpdateEdge { edge_id: EdgeId, patch: EdgePatch },
    RemoveEdge { edge_id: EdgeId },
    Clear,
}

/// Shallow patch over `NodeData`; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub label: Option<String>,
    pub fill_color: Option<String>,
    pub text_color: Option<String>,
    pub font_weight: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub font_size: Option<f64>,
    pub text_offset: Option<Position>,
    pub rotation: Option<f64>,
    pub arrow_head: Option<ArrowHead>,
    pub arrow_head_color: Option<String>,
}

impl NodePatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn touches_arrow_fields(&self) -> bool {
        self.rotation.is_some() || self.arrow_head.is_some() || self.arrow_head_color.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgePatch {
    /// `Some(None)` removes the label.
    pub label: Option<Option<String>>,
    pub animated: Option<bool>,
    pub marker_kind: Option<MarkerKind>,
    pub marker_color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerDirection {
    Front,
    Back,
}

/// Which elements changed as the result of applying ops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ElementRef>,
    pub removed: Vec<ElementRef>,
    pub updated: Vec<ElementRef>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<ElementRef>,
    removed: BTreeSet<ElementRef>,
    updated: BTreeSet<ElementRef>,
}

impl DeltaBuilder {
    fn record_added(&mut self, element: ElementRef) {
        self.removed.remove(&element);
        self.updated.remove(&element);
        self.added.insert(element);
    }

    fn record_removed(&mut self, element: ElementRef) {
        // Added and removed within one batch nets out to nothing.
        if self.added.remove(&element) {
            self.updated.remove(&element);
            return;
        }
        self.updated.remove(&element);
        self.removed.insert(element);
    }

    fn record_updated(&mut self, element: ElementRef) {
        if self.added.contains(&element) || self.removed.contains(&element) {
            return;
        }
        self.updated.insert(element);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Node,
    Edge,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error("edge endpoint does not reference an existing node (id={node_id})")]
    InvalidReference { node_id: String },
    #[error("object not found ({kind:?}, id={id})")]
    NotFound { kind: ObjectKind, id: String },
    #[error("id already in use (id={id})")]
    AlreadyExists { id: String },
    #[error("arrow fields can only be set on arrow nodes (id={node_id})")]
    NotAnArrow { node_id: NodeId },
}

/// Applies one op in place. On error the graph is left untouched.
pub fn apply_op(graph: &mut Graph, op: &Op) -> Result<Delta, ApplyError> {
    let mut delta = DeltaBuilder::default();
    apply_one(graph, op, &mut delta)?;
    Ok(delta.finish())
}

/// Applies a batch atomically: either every op lands or none does.
pub fn apply_ops(graph: &mut Graph, ops: &[Op]) -> Result<Delta, ApplyError> {
    if ops.is_empty() {
        return Ok(Delta::default());
    }

    let mut next = graph.clone();
    let mut delta = DeltaBuilder::default();
    for op in ops {
        apply_one(&mut next, op, &mut delta)?;
    }
    *graph = next;
    Ok(delta.finish())
}

// Per-op validation and mutation.
include!("ops_impl.rs");
