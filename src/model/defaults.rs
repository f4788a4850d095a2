// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Per-kind defaults shared by `add_node` and the import fill-in.

use super::node::{ArrowStyle, NodeData, NodeKind, Position};

pub const Z_INDEX: i64 = 10;
/// Imported z-indices must lie within `-Z_INDEX_LIMIT..=Z_INDEX_LIMIT`.
pub const Z_INDEX_LIMIT: i64 = i32::MAX as i64;
pub const INK_COLOR: &str = "#1f2937";
pub const FONT_WEIGHT: &str = "normal";
pub const FONT_SIZE: f64 = 14.0;

pub const PALETTE: [&str; 8] = [
    "#fde68a", "#bfdbfe", "#bbf7d0", "#fecaca", "#ddd6fe", "#fbcfe8", "#c7d2fe", "#fed7aa",
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// `(width, height)` for a freshly created node.
pub fn size(kind: NodeKind) -> (f64, f64) {
    match kind {
        NodeKind::Rectangle => (160.0, 90.0),
        NodeKind::Circle => (110.0, 110.0),
        NodeKind::Diamond => (130.0, 130.0),
        NodeKind::Arrow => (150.0, 50.0),
    }
}

/// Auto label for the `ordinal`-th node of a kind; arrows carry no text.
pub fn label(kind: NodeKind, ordinal: usize) -> String {
    match kind {
        NodeKind::Rectangle => format!("Rectangle {ordinal}"),
        NodeKind::Circle => format!("Circle {ordinal}"),
        NodeKind::Diamond => format!("Diamond {ordinal}"),
        NodeKind::Arrow => String::new(),
    }
}

/// Cascading placement so consecutive new nodes do not stack exactly.
pub fn position(sequence: usize) -> Position {
    let step = (sequence % 10) as f64 * 40.0;
    Position::new(80.0 + step, 80.0 + step)
}

pub fn node_data(kind: NodeKind, label: String, fill_color: &str) -> NodeData {
    let (width, height) = size(kind);
    NodeData {
        label,
        fill_color: fill_color.to_owned(),
        text_color: INK_COLOR.to_owned(),
        font_weight: FONT_WEIGHT.to_owned(),
        width,
        height,
        font_size: FONT_SIZE,
        text_offset: Position::default(),
        arrow: (kind == NodeKind::Arrow).then(ArrowStyle::default),
    }
}
