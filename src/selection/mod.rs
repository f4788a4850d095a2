// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Single-element selection and property-edit routing.
//!
//! The property panel never names an element itself: every edit goes to whatever is
//! selected at the moment it is applied. Switching selection mid-edit just redirects the
//! next edit.

use tracing::debug;

use crate::history::CoalesceKey;
use crate::model::{ArrowHead, ElementRef, Graph, Position};
use crate::ops::{EdgePatch, NodePatch, Op};

/// One change coming from the property panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyEdit {
    Label(String),
    FillColor(String),
    TextColor(String),
    FontWeight(String),
    Width(f64),
    Height(f64),
    FontSize(f64),
    TextOffset(Position),
    Rotation(f64),
    ArrowHead(ArrowHead),
    ArrowHeadColor(String),
    EdgeLabel(Option<String>),
    EdgeAnimated(bool),
    MarkerColor(String),
}

impl PropertyEdit {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Label(_) => "label",
            Self::FillColor(_) => "fillColor",
            Self::TextColor(_) => "textColor",
            Self::FontWeight(_) => "fontWeight",
            Self::Width(_) => "width",
            Self::Height(_) => "height",
            Self::FontSize(_) => "fontSize",
            Self::TextOffset(_) => "textOffset",
            Self::Rotation(_) => "rotation",
            Self::ArrowHead(_) => "arrowHead",
            Self::ArrowHeadColor(_) => "arrowHeadColor",
            Self::EdgeLabel(_) => "edgeLabel",
            Self::EdgeAnimated(_) => "animated",
            Self::MarkerColor(_) => "markerColor",
        }
    }

    /// Edits produced per keystroke or per slider/picker tick.
    pub fn is_continuous(&self) -> bool {
        !matches!(self, Self::FontWeight(_) | Self::ArrowHead(_) | Self::EdgeAnimated(_))
    }

    fn is_edge_edit(&self) -> bool {
        matches!(self, Self::EdgeLabel(_) | Self::EdgeAnimated(_) | Self::MarkerColor(_))
    }

    fn is_arrow_edit(&self) -> bool {
        matches!(self, Self::Rotation(_) | Self::ArrowHead(_) | Self::ArrowHeadColor(_))
    }

    fn into_node_patch(self) -> NodePatch {
        let mut patch = NodePatch::default();
        match self {
            Self::Label(v) => patch.label = Some(v),
            Self::FillColor(v) => patch.fill_color = Some(v),
            Self::TextColor(v) => patch.text_color = Some(v),
            Self::FontWeight(v) => patch.font_weight = Some(v),
            Self::Width(v) => patch.width = Some(v),
            Self::Height(v) => patch.height = Some(v),
            Self::FontSize(v) => patch.font_size = Some(v),
            Self::TextOffset(v) => patch.text_offset = Some(v),
            Self::Rotation(v) => patch.rotation = Some(v),
            Self::ArrowHead(v) => patch.arrow_head = Some(v),
            Self::ArrowHeadColor(v) => patch.arrow_head_color = Some(v),
            Self::EdgeLabel(_) | Self::EdgeAnimated(_) | Self::MarkerColor(_) => {}
        }
        patch
    }

    fn into_edge_patch(self) -> EdgePatch {
        let mut patch = EdgePatch::default();
        match self {
            Self::EdgeLabel(v) => patch.label = Some(v),
            Self::EdgeAnimated(v) => patch.animated = Some(v),
            Self::MarkerColor(v) => patch.marker_color = Some(v),
            _ => {}
        }
        patch
    }
}

/// A property edit resolved against the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdit {
    pub op: Op,
    pub key: CoalesceKey,
    pub continuous: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionController {
    selected: Option<ElementRef>,
    pending_delete: Option<ElementRef>,
}

impl SelectionController {
    pub fn selected(&self) -> Option<&ElementRef> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, element: &ElementRef) -> bool {
        self.selected.as_ref() == Some(element)
    }

    /// Replaces the selection; there is never more than one selected element.
    pub fn select(&mut self, element: ElementRef) {
        self.selected = Some(element);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Parks a context-menu delete until the user confirms it.
    pub fn request_delete(&mut self, element: ElementRef) {
        self.pending_delete = Some(element);
    }

    pub fn pending_delete(&self) -> Option<&ElementRef> {
        self.pending_delete.as_ref()
    }

    pub fn take_pending_delete(&mut self) -> Option<ElementRef> {
        self.pending_delete.take()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Drops references to elements that no longer exist in `graph`.
    pub fn retain_existing(&mut self, graph: &Graph) {
        if self.selected.as_ref().is_some_and(|element| !graph.contains(element)) {
            self.selected = None;
        }
        if self.pending_delete.as_ref().is_some_and(|element| !graph.contains(element)) {
            self.pending_delete = None;
        }
    }

    /// Turns `edit` into an op against the selected element.
    ///
    /// Returns `None` when nothing is selected, when the edit does not apply to the
    /// selected kind of element, or when an arrow-only edit targets a non-arrow node.
    pub fn route(&self, graph: &Graph, edit: PropertyEdit) -> Option<RoutedEdit> {
        let selected = self.selected.as_ref()?;
        let key = CoalesceKey {
            element: selected.clone(),
            field: edit.field(),
        };
        let continuous = edit.is_continuous();

        let op = match selected {
            ElementRef::Node(node_id) => {
                let is_arrow = graph.node(node_id)?.data().arrow.is_some();
                if edit.is_edge_edit() || (edit.is_arrow_edit() && !is_arrow) {
                    debug!(element = %selected, field = key.field, "edit skipped for selection");
                    return None;
                }
                Op::UpdateNode {
                    node_id: node_id.clone(),
                    patch: edit.into_node_patch(),
                }
            }
            ElementRef::Edge(edge_id) => {
                graph.edge(edge_id)?;
                if !edit.is_edge_edit() {
                    debug!(element = %selected, field = key.field, "edit skipped for selection");
                    return None;
                }
                Op::UpdateEdge {
                    edge_id: edge_id.clone(),
                    patch: edit.into_edge_patch(),
                }
            }
        };

        Some(RoutedEdit {
            op,
            key,
            continuous,
        })
    }
}
