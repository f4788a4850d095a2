// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The live diagram and everything that mutates it.
//!
//! Every public mutation applies one op and then goes through `commit`,
//! the single place that talks to the history. Undo/redo swap a snapshot in through the
//! same hook; the history is in its restoring state at that point and records nothing.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::EngineConfig;
use crate::history::{CoalesceKey, HistoryManager, RecordOutcome, Snapshot};
use crate::model::{
    defaults, Edge, EdgeId, ElementRef, Graph, GraphError, Node, NodeId, NodeKind, Position,
};
use crate::ops::{apply_op, ApplyError, Delta, EdgePatch, LayerDirection, NodePatch, Op};
use crate::selection::{PropertyEdit, SelectionController};
use crate::surface::SurfaceEvent;

/// How a committed change lands in the history.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Commit {
    Discrete,
    Continuous(CoalesceKey),
    /// Snapshot swap from undo/redo; must be ignored by the history.
    Restore,
}

#[derive(Debug, Clone)]
pub struct GraphStore {
    graph: Graph,
    history: HistoryManager,
    selection: SelectionController,
    coalesce_continuous_edits: bool,
    next_node_seq: usize,
    next_edge_seq: usize,
    created_nodes: usize,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl GraphStore {
    pub fn new(config: &EngineConfig) -> Self {
        let graph = Graph::default();
        Self {
            history: HistoryManager::new(&graph, config.history_limit),
            graph,
            selection: SelectionController::default(),
            coalesce_continuous_edits: config.coalesce_continuous_edits,
            next_node_seq: 1,
            next_edge_seq: 1,
            created_nodes: 0,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.graph.node(node_id)
    }

    pub fn edge(&self, edge_id: &EdgeId) -> Option<&Edge> {
        self.graph.edge(edge_id)
    }

    pub fn render_order(&self) -> Vec<&Node> {
        self.graph.render_order()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn selected(&self) -> Option<&ElementRef> {
        self.selection.selected()
    }

    /// Creates a node with the per-kind defaults, selects it and returns its id.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let node_id = self.fresh_node_id();
        let ordinal = self
            .graph
            .nodes()
            .values()
            .filter(|node| node.kind() == kind)
            .count()
            + 1;
        let data = defaults::node_data(
            kind,
            defaults::label(kind, ordinal),
            defaults::palette_color(self.created_nodes),
        );
        let position = defaults::position(self.created_nodes);
        let node = Node::new(node_id.clone(), kind, position, data);
        self.created_nodes += 1;

        match self.commit(Op::AddNode { node }, Commit::Discrete) {
            Ok(_) => {
                self.selection.select(ElementRef::Node(node_id.clone()));
            }
            // Fresh ids are checked against the graph, so this only logs.
            Err(err) => debug!(%node_id, "add_node rejected: {err}"),
        }
        node_id
    }

    /// Deletes a node (with every edge touching it) or a single edge.
    /// Unknown ids are ignored. Returns whether anything was removed.
    pub fn delete_element(&mut self, id: &str) -> bool {
        let op = match self.graph.resolve(id) {
            Some(ElementRef::Node(node_id)) => Op::RemoveNode { node_id },
            Some(ElementRef::Edge(edge_id)) => Op::RemoveEdge { edge_id },
            None => {
                debug!(id, "delete of unknown element ignored");
                return false;
            }
        };
        self.commit(op, Commit::Discrete).is_ok()
    }

    /// Connects two existing nodes with an animated, closed-arrow edge.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<EdgeId, ApplyError> {
        let source = self.existing_node(source)?;
        let target = self.existing_node(target)?;
        let edge_id = self.fresh_edge_id();
        let edge = Edge::new(edge_id.clone(), source, target);
        self.commit(Op::AddEdge { edge }, Commit::Discrete)?;
        Ok(edge_id)
    }

    pub fn update_node_data(
        &mut self,
        node_id: &NodeId,
        patch: NodePatch,
    ) -> Result<(), ApplyError> {
        let op = Op::UpdateNode {
            node_id: node_id.clone(),
            patch,
        };
        self.commit(op, Commit::Discrete).map(drop)
    }

    pub fn update_edge_data(
        &mut self,
        edge_id: &EdgeId,
        patch: EdgePatch,
    ) -> Result<(), ApplyError> {
        let op = Op::UpdateEdge {
            edge_id: edge_id.clone(),
            patch,
        };
        self.commit(op, Commit::Discrete).map(drop)
    }

    pub fn move_node(&mut self, node_id: &NodeId, position: Position) -> Result<(), ApplyError> {
        let op = Op::MoveNode {
            node_id: node_id.clone(),
            position,
        };
        self.commit(op, Commit::Discrete).map(drop)
    }

    pub fn change_layer(
        &mut self,
        node_id: &NodeId,
        direction: LayerDirection,
    ) -> Result<(), ApplyError> {
        let op = Op::ChangeLayer {
            node_id: node_id.clone(),
            direction,
        };
        self.commit(op, Commit::Discrete).map(drop)
    }

    /// Empties the diagram and the selection. Clearing an empty diagram records nothing.
    pub fn clear(&mut self) {
        self.selection.clear_selection();
        self.selection.cancel_delete();
        if self.graph.is_empty() {
            return;
        }
        if let Err(err) = self.commit(Op::Clear, Commit::Discrete) {
            debug!("clear rejected: {err}");
        }
    }

    /// Swaps in a whole graph (used by import) as one undoable step.
    ///
    /// A graph whose keys, ids or edge endpoints disagree is refused and the store is left as is.
    pub fn replace_graph(&mut self, graph: Graph) -> Result<(), GraphError> {
        graph.check_integrity()?;
        self.graph = graph;
        self.selection.clear_selection();
        self.selection.cancel_delete();
        self.record(Commit::Discrete);
        Ok(())
    }

    /// Returns `false` at the start of the timeline.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.begin_undo() else {
            return false;
        };
        self.restore(snapshot);
        self.history.end_restore();
        true
    }

    /// Returns `false` at the end of the timeline.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.begin_redo() else {
            return false;
        };
        self.restore(snapshot);
        self.history.end_restore();
        true
    }

    /// Selects an element by raw id; unknown ids leave the selection untouched.
    pub fn select(&mut self, id: &str) -> bool {
        match self.graph.resolve(id) {
            Some(element) => {
                self.selection.select(element);
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
    }

    /// Applies a property-panel edit to whatever is selected right now.
    pub fn edit_selected(&mut self, edit: PropertyEdit) -> bool {
        let Some(routed) = self.selection.route(&self.graph, edit) else {
            return false;
        };
        let commit = if routed.continuous && self.coalesce_continuous_edits {
            Commit::Continuous(routed.key)
        } else {
            Commit::Discrete
        };
        self.commit(routed.op, commit).is_ok()
    }

    /// Ends a continuous edit gesture (slider released, input blurred).
    pub fn end_edit(&mut self) {
        self.history.seal();
    }

    /// Context-menu delete: parked until [`confirm_delete`](Self::confirm_delete).
    pub fn request_delete(&mut self, id: &str) -> bool {
        match self.graph.resolve(id) {
            Some(element) => {
                self.selection.request_delete(element);
                true
            }
            None => false,
        }
    }

    pub fn confirm_delete(&mut self) -> bool {
        match self.selection.take_pending_delete() {
            Some(element) => self.delete_element(element.as_str()),
            None => false,
        }
    }

    pub fn cancel_delete(&mut self) {
        self.selection.cancel_delete();
    }

    /// Routes a render-surface gesture to the matching operation. Bad references from
    /// the surface are dropped silently.
    pub fn handle_surface_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Connect { source, target } => {
                if let Err(err) = self.connect(&source, &target) {
                    debug!(%source, %target, "connect ignored: {err}");
                }
            }
            SurfaceEvent::NodeClick(id) | SurfaceEvent::EdgeClick(id) => {
                self.select(&id);
            }
            SurfaceEvent::PaneClick => self.clear_selection(),
            SurfaceEvent::ElementContextMenu(id) => {
                self.request_delete(&id);
            }
            SurfaceEvent::NodeMoved { node_id, position } => {
                if let Err(err) = self.move_node(&node_id, position) {
                    debug!(%node_id, "move ignored: {err}");
                }
            }
        }
    }

    fn commit(&mut self, op: Op, commit: Commit) -> Result<Delta, ApplyError> {
        let delta = apply_op(&mut self.graph, &op)?;
        self.selection.retain_existing(&self.graph);
        debug!(
            added = delta.added.len(),
            removed = delta.removed.len(),
            updated = delta.updated.len(),
            "committed graph change"
        );
        self.record(commit);
        Ok(delta)
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.graph = snapshot.to_graph();
        self.selection.retain_existing(&self.graph);
        self.record(Commit::Restore);
    }

    fn record(&mut self, commit: Commit) {
        let outcome = match &commit {
            Commit::Continuous(key) => self.history.record_coalesced(&self.graph, key.clone()),
            Commit::Discrete | Commit::Restore => self.history.record(&self.graph),
        };
        debug!(
            ?outcome,
            pointer = self.history.pointer(),
            len = self.history.len(),
            "history commit"
        );
        debug_assert!(
            commit_matches_state(&commit, outcome),
            "restore must never be recorded"
        );
    }

    fn existing_node(&self, raw: &str) -> Result<NodeId, ApplyError> {
        match self.graph.resolve(raw) {
            Some(ElementRef::Node(node_id)) => Ok(node_id),
            _ => Err(ApplyError::InvalidReference {
                node_id: raw.to_owned(),
            }),
        }
    }

    fn fresh_node_id(&mut self) -> NodeId {
        loop {
            let candidate = format!("node-{}", self.next_node_seq);
            self.next_node_seq += 1;
            if self.graph.contains_id(&candidate) {
                continue;
            }
            if let Ok(node_id) = NodeId::new(candidate) {
                return node_id;
            }
        }
    }

    fn fresh_edge_id(&mut self) -> EdgeId {
        loop {
            let candidate = format!("edge-{}", self.next_edge_seq);
            self.next_edge_seq += 1;
            if self.graph.contains_id(&candidate) {
                continue;
            }
            if let Ok(edge_id) = EdgeId::new(candidate) {
                return edge_id;
            }
        }
    }

    /// Node counts per kind, used by the CLI summary.
    pub fn kind_counts(&self) -> BTreeMap<NodeKind, usize> {
        let mut counts = BTreeMap::new();
        for node in self.graph.nodes().values() {
            *counts.entry(node.kind()).or_insert(0) += 1;
        }
        counts
    }
}

fn commit_matches_state(commit: &Commit, outcome: RecordOutcome) -> bool {
    match commit {
        Commit::Restore => outcome == RecordOutcome::Skipped,
        Commit::Discrete | Commit::Continuous(_) => outcome != RecordOutcome::Skipped,
    }
}
