// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: typed ids, nodes, edges and the graph that holds them.

pub mod defaults;
pub mod edge;
pub mod graph;
pub mod ids;
pub mod node;

pub use edge::{Edge, Marker, MarkerKind};
pub use graph::{Graph, GraphError};
pub use ids::{EdgeId, ElementRef, Id, IdError, NodeId};
pub use node::{ArrowHead, ArrowStyle, Node, NodeData, NodeKind, ParseNodeKindError, Position};
