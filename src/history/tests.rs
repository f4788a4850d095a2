// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;

use crate::model::{ElementRef, Graph, Node, NodeId, NodeKind, Position};
use crate::ops::{apply_op, Op};

use super::{CoalesceKey, HistoryManager, HistoryState, RecordOutcome};

fn graph_with(ids: &[&str]) -> Graph {
    let mut graph = Graph::default();
    for id in ids {
        let node = Node::with_defaults(
            NodeId::new(*id).expect("node id"),
            NodeKind::Rectangle,
            Position::default(),
            (*id).to_owned(),
        );
        apply_op(&mut graph, &Op::AddNode { node }).expect("add node");
    }
    graph
}

fn key(id: &str, field: &'static str) -> CoalesceKey {
    CoalesceKey {
        element: ElementRef::Node(NodeId::new(id).expect("node id")),
        field,
    }
}

fn assert_pointer_invariant(history: &HistoryManager) {
    assert!(
        history.pointer() < history.len(),
        "pointer {} len {}",
        history.pointer(),
        history.len()
    );
}

fn current_graph(history: &HistoryManager) -> Option<Graph> {
    history.current().map(|s| s.graph().clone())
}

fn coalesce(history: &mut HistoryManager, ids: &[&str], field: &'static str) -> RecordOutcome {
    history.record_coalesced(&graph_with(ids), key("a", field))
}

#[test]
fn starts_with_initial_snapshot_and_nothing_to_undo() {
    let mut history = HistoryManager::new(&Graph::default(), None);
    assert_eq!(history.len(), 1);
    assert_eq!(history.pointer(), 0);
    assert!(history.begin_undo().is_none());
    assert!(history.begin_redo().is_none());
    assert_eq!(history.state(), HistoryState::Recording);
    assert_pointer_invariant(&history);
}

#[test]
fn undo_and_redo_walk_the_timeline() {
    let mut history = HistoryManager::new(&Graph::default(), None);
    history.record(&graph_with(&["a"]));
    history.record(&graph_with(&["a", "b"]));

    let back = history.begin_undo().expect("undo");
    assert_eq!(history.state(), HistoryState::Restoring);
    history.end_restore();
    assert_eq!(back.graph(), &graph_with(&["a"]));
    assert_eq!(history.pointer(), 1);

    let forward = history.begin_redo().expect("redo");
    history.end_restore();
    assert_eq!(forward.graph(), &graph_with(&["a", "b"]));
    assert!(history.begin_redo().is_none());
    assert_pointer_invariant(&history);
}

#[test]
fn record_is_skipped_while_restoring() {
    let mut history = HistoryManager::new(&Graph::default(), None);
    history.record(&graph_with(&["a"]));

    let snapshot = history.begin_undo().expect("undo");
    assert_eq!(history.record(snapshot.graph()), RecordOutcome::Skipped);
    assert_eq!(
        history.record_coalesced(snapshot.graph(), key("a", "width")),
        RecordOutcome::Skipped
    );
    history.end_restore();

    assert_eq!(history.len(), 2);
    assert_eq!(history.pointer(), 0);
    assert!(history.can_redo());
}

#[test]
fn recording_after_undo_discards_the_redo_branch() {
    let mut history = HistoryManager::new(&Graph::default(), None);
    history.record(&graph_with(&["a"]));
    history.record(&graph_with(&["a", "b"]));
    history.begin_undo();
    history.end_restore();

    history.record(&graph_with(&["a", "c"]));

    assert!(!history.can_redo());
    assert_eq!(history.len(), 3);
    assert_eq!(current_graph(&history), Some(graph_with(&["a", "c"])));
}

#[test]
fn continuous_steps_with_same_key_coalesce_until_sealed() {
    let mut history = HistoryManager::new(&Graph::default(), None);
    history.record(&graph_with(&["a"]));

    assert_eq!(
        coalesce(&mut history, &["a", "x"], "width"),
        RecordOutcome::Appended
    );
    assert_eq!(
        coalesce(&mut history, &["a", "y"], "width"),
        RecordOutcome::Coalesced
    );
    assert_eq!(history.len(), 3);
    assert_eq!(current_graph(&history), Some(graph_with(&["a", "y"])));

    assert_eq!(
        coalesce(&mut history, &["a", "z"], "height"),
        RecordOutcome::Appended
    );
    history.seal();
    assert_eq!(
        coalesce(&mut history, &["a", "w"], "height"),
        RecordOutcome::Appended
    );
    assert_eq!(history.len(), 5);
}

#[test]
fn continuous_step_after_undo_does_not_overwrite_restored_entry() {
    let mut history = HistoryManager::new(&Graph::default(), None);
    history.record_coalesced(&graph_with(&["a"]), key("a", "width"));
    history.record(&graph_with(&["a", "b"]));
    history.begin_undo();
    history.end_restore();

    let outcome = coalesce(&mut history, &["a", "q"], "width");

    assert_eq!(outcome, RecordOutcome::Appended);
    assert_eq!(history.len(), 3);
    assert!(history
        .begin_undo()
        .is_some_and(|s| s.graph() == &graph_with(&["a"])));
}

#[rstest]
#[case(Some(1), 1)]
#[case(Some(3), 3)]
#[case(None, 11)]
fn limit_evicts_oldest_and_keeps_pointer_in_range(
    #[case] limit: Option<usize>,
    #[case] expected_len: usize,
) {
    let mut history = HistoryManager::new(&Graph::default(), limit);
    let ids = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];
    for end in 1..=ids.len() {
        history.record(&graph_with(&ids[..end]));
        assert_pointer_invariant(&history);
    }

    assert_eq!(history.len(), expected_len);
    assert_eq!(history.pointer(), expected_len - 1);
    while history.begin_undo().is_some() {
        history.end_restore();
        assert_pointer_invariant(&history);
    }
    assert_eq!(history.pointer(), 0);
}
