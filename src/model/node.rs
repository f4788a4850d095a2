// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::defaults;
use super::ids::NodeId;

/// The four shapes the render surface knows how to draw.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Rectangle,
    Circle,
    Diamond,
    Arrow,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [Self::Rectangle, Self::Circle, Self::Diamond, Self::Arrow];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Diamond => "diamond",
            Self::Arrow => "arrow",
        }
    }

    /// Key used by the render surface to pick the shape renderer.
    pub fn renderer_key(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangleNode",
            Self::Circle => "circleNode",
            Self::Diamond => "diamondNode",
            Self::Arrow => "arrowNode",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node type '{0}' (expected rectangle, circle, diamond or arrow)")]
pub struct ParseNodeKindError(pub String);

impl FromStr for NodeKind {
    type Err = ParseNodeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseNodeKindError(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ArrowHead {
    #[default]
    Closed,
    Open,
    None,
}

/// Arrow-only part of the visual payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowStyle {
    /// Degrees, clockwise.
    pub rotation: f64,
    pub head: ArrowHead,
    pub head_color: String,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            head: ArrowHead::Closed,
            head_color: defaults::INK_COLOR.to_owned(),
        }
    }
}

/// Visual payload of a node. Values are stored as given; the store does not clamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    pub fill_color: String,
    pub text_color: String,
    pub font_weight: String,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub text_offset: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow: Option<ArrowStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    id: NodeId,
    #[serde(rename = "type")]
    kind: NodeKind,
    position: Position,
    z_index: i64,
    data: NodeData,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, position: Position, data: NodeData) -> Self {
        Self {
            id,
            kind,
            position,
            z_index: defaults::Z_INDEX,
            data,
        }
    }

    /// A node with every visual field taken from the per-kind defaults.
    pub fn with_defaults(id: NodeId, kind: NodeKind, position: Position, label: String) -> Self {
        let data = defaults::node_data(kind, label, defaults::palette_color(0));
        Self::new(id, kind, position, data)
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn z_index(&self) -> i64 {
        self.z_index
    }

    pub fn set_z_index(&mut self, z_index: i64) {
        self.z_index = z_index;
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        &mut self.data
    }
}
