// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Boundary with the interactive render surface.
//!
//! The surface reads the graph through a [`RenderView`] and reports user gestures as
//! [`SurfaceEvent`]s; it never mutates the graph itself. In the other direction the
//! engine only gets the narrow [`RenderSurface`] capability (fit, layout, capture).

mod export;
mod view;

pub use export::{export_diagram, export_file_name, ExportError, ImageExport};
pub use view::{RenderNode, RenderView};

use crate::model::{NodeId, Position};

/// What the engine may ask of the render surface.
pub trait RenderSurface {
    /// Zoom and pan so every node is visible.
    fn fit_view(&mut self);

    /// Rasterize the current view.
    fn export_image(&mut self, title: &str) -> Result<Vec<u8>, ExportError>;

    /// Run the surface's automatic layout over the current nodes.
    fn apply_layout(&mut self);
}

/// Gestures reported by the render surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Connect { source: String, target: String },
    NodeClick(String),
    EdgeClick(String),
    PaneClick,
    ElementContextMenu(String),
    NodeMoved { node_id: NodeId, position: Position },
}

/// A surface that draws nothing; handy for headless imports and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessSurface {
    pub fit_requests: usize,
    pub layout_requests: usize,
}

impl RenderSurface for HeadlessSurface {
    fn fit_view(&mut self) {
        self.fit_requests += 1;
    }

    fn export_image(&mut self, _title: &str) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::Unsupported)
    }

    fn apply_layout(&mut self) {
        self.layout_requests += 1;
    }
}
