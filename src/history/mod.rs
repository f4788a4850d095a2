// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Snapshot-based undo/redo.
//!
//! The timeline is a list of immutable graph snapshots plus a pointer at the one that is
//! currently live. Recording after an undo truncates everything past the pointer, so the
//! undone branch can no longer be redone.
//!
//! Restoring a snapshot is bracketed by `begin_undo`/`begin_redo` and `end_restore`.
//! In between the manager is in [`HistoryState::Restoring`] and `record` refuses to
//! append, so the graph swap caused by the restore never lands in the timeline.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::debug;

use crate::model::{ElementRef, Graph};

/// An immutable capture of the full node/edge set.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    graph: Arc<Graph>,
}

impl Snapshot {
    pub fn capture(graph: &Graph) -> Self {
        Self {
            graph: Arc::new(graph.clone()),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn to_graph(&self) -> Graph {
        Graph::clone(&self.graph)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryState {
    #[default]
    Recording,
    Restoring,
}

/// Identifies one continuous edit gesture (e.g. dragging a width slider on one node).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoalesceKey {
    pub element: ElementRef,
    pub field: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Appended,
    /// The top entry was replaced in place by a continuation of the same gesture.
    Coalesced,
    /// The manager was restoring; nothing was recorded.
    Skipped,
}

#[derive(Debug, Clone)]
struct Entry {
    snapshot: Snapshot,
    coalesce_key: Option<CoalesceKey>,
}

impl Entry {
    fn capture(graph: &Graph, coalesce_key: Option<CoalesceKey>) -> Self {
        Self {
            snapshot: Snapshot::capture(graph),
            coalesce_key,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryManager {
    entries: VecDeque<Entry>,
    pointer: usize,
    state: HistoryState,
    limit: Option<usize>,
}

impl HistoryManager {
    /// Starts a timeline whose first entry is `initial`, so the first mutation can be undone.
    ///
    /// `limit` caps the number of retained snapshots; `Some(0)` is treated as `Some(1)`.
    pub fn new(initial: &Graph, limit: Option<usize>) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(Entry::capture(initial, None));
        Self {
            entries,
            pointer: 0,
            state: HistoryState::Recording,
            limit: limit.map(|limit| limit.max(1)),
        }
    }

    pub fn state(&self) -> HistoryState {
        self.state
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.pointer).map(|entry| &entry.snapshot)
    }

    /// Commit hook for a discrete mutation.
    pub fn record(&mut self, graph: &Graph) -> RecordOutcome {
        if self.state == HistoryState::Restoring {
            debug!("history: restore in progress, commit not recorded");
            return RecordOutcome::Skipped;
        }
        self.push(Entry::capture(graph, None));
        RecordOutcome::Appended
    }

    /// Commit hook for one step of a continuous edit.
    ///
    /// Consecutive steps with the same key replace the top entry instead of appending,
    /// as long as nothing was undone in between and the gesture was not sealed.
    pub fn record_coalesced(&mut self, graph: &Graph, key: CoalesceKey) -> RecordOutcome {
        if self.state == HistoryState::Restoring {
            debug!("history: restore in progress, commit not recorded");
            return RecordOutcome::Skipped;
        }

        let at_top = self.pointer + 1 == self.entries.len();
        if at_top && self.pointer > 0 {
            if let Some(top) = self.entries.back_mut() {
                if top.coalesce_key.as_ref() == Some(&key) {
                    top.snapshot = Snapshot::capture(graph);
                    return RecordOutcome::Coalesced;
                }
            }
        }

        self.push(Entry::capture(graph, Some(key)));
        RecordOutcome::Appended
    }

    /// Ends the current continuous gesture; the next continuous step appends.
    pub fn seal(&mut self) {
        if let Some(top) = self.entries.back_mut() {
            top.coalesce_key = None;
        }
    }

    /// Steps the pointer back and enters `Restoring`. Returns the snapshot to restore,
    /// or `None` at the start of the timeline.
    pub fn begin_undo(&mut self) -> Option<Snapshot> {
        if self.pointer == 0 {
            return None;
        }
        self.state = HistoryState::Restoring;
        self.pointer -= 1;
        self.seal_all();
        Some(self.entries[self.pointer].snapshot.clone())
    }

    /// Steps the pointer forward and enters `Restoring`. Returns the snapshot to restore,
    /// or `None` at the end of the timeline.
    pub fn begin_redo(&mut self) -> Option<Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.state = HistoryState::Restoring;
        self.pointer += 1;
        self.seal_all();
        Some(self.entries[self.pointer].snapshot.clone())
    }

    pub fn end_restore(&mut self) {
        self.state = HistoryState::Recording;
    }

    fn push(&mut self, entry: Entry) {
        self.entries.truncate(self.pointer + 1);
        self.entries.push_back(entry);
        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                self.entries.pop_front();
            }
        }
        self.pointer = self.entries.len() - 1;
    }

    // A restored entry must never be overwritten by a later continuous step.
    fn seal_all(&mut self) {
        for entry in &mut self.entries {
            entry.coalesce_key = None;
        }
    }
}

#[cfg(test)]
mod tests;
