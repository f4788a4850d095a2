// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;

use crate::model::{Edge, Graph, Node};

/// A node as handed to the render surface, tagged with the shape renderer to draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode<'a> {
    pub renderer: &'static str,
    #[serde(flatten)]
    pub node: &'a Node,
}

/// Read-only picture of the graph in the order the surface paints it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderView<'a> {
    /// Back to front.
    pub nodes: Vec<RenderNode<'a>>,
    pub edges: Vec<&'a Edge>,
}

impl<'a> RenderView<'a> {
    pub fn of(graph: &'a Graph) -> Self {
        let nodes = graph
            .render_order()
            .into_iter()
            .map(|node| RenderNode {
                renderer: node.kind().renderer_key(),
                node,
            })
            .collect();
        Self {
            nodes,
            edges: graph.edges().values().collect(),
        }
    }
}
