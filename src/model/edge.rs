// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::defaults;
use super::ids::{EdgeId, NodeId};

/// Serialized the way the renderer names its markers (`arrowclosed`, `arrow`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    #[default]
    ArrowClosed,
    Arrow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub color: String,
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            kind: MarkerKind::ArrowClosed,
            color: defaults::INK_COLOR.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    marker_end: Marker,
}

impl Edge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            animated: true,
            label: None,
            marker_end: Marker::default(),
        }
    }

    pub fn new_with(
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        animated: bool,
        label: Option<String>,
        marker_end: Marker,
    ) -> Self {
        Self {
            id,
            source,
            target,
            animated,
            label,
            marker_end,
        }
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source == node_id || &self.target == node_id
    }

    pub fn animated(&self) -> bool {
        self.animated
    }

    pub fn set_animated(&mut self, animated: bool) {
        self.animated = animated;
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label<T: Into<String>>(&mut self, label: Option<T>) {
        self.label = label.map(Into::into);
    }

    pub fn marker_end(&self) -> &Marker {
        &self.marker_end
    }

    pub fn marker_end_mut(&mut self) -> &mut Marker {
        &mut self.marker_end
    }
}
