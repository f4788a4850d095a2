// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Validation and atomic import of generated diagrams.
//!
//! Payloads come from an external generation service and are untrusted. The whole payload
//! is checked before anything is built; every problem found is reported at once as a
//! [`SchemaError`]. Only a fully valid payload is turned into a [`Graph`], and that graph
//! replaces the live one in a single swap.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::model::{
    defaults, ArrowHead, ArrowStyle, Edge, EdgeId, Graph, IdError, Marker, MarkerKind, Node,
    NodeData, NodeId, NodeKind, Position,
};
use crate::ops::{apply_ops, Op};
use crate::store::GraphStore;
use crate::surface::RenderSurface;

/// The payload contract handed to the generation service.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramPayload {
    pub nodes: Vec<PayloadNode>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Option<Vec<PayloadEdge>>")]
    pub edges: Vec<PayloadEdge>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(items.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayloadNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
    #[serde(default)]
    pub z_index: Option<i32>,
    #[serde(default)]
    pub data: Option<PayloadNodeData>,
}

/// Optional visual fields; anything omitted takes the per-type default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayloadNodeData {
    pub label: Option<String>,
    #[serde(alias = "color")]
    pub fill_color: Option<String>,
    pub text_color: Option<String>,
    pub font_weight: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub font_size: Option<f64>,
    pub text_offset: Option<Position>,
    pub rotation: Option<f64>,
    pub arrow_head: Option<ArrowHead>,
    pub arrow_head_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayloadEdge {
    /// Generated from the endpoints when omitted.
    #[serde(default)]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub animated: Option<bool>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub marker_end: Option<PayloadMarker>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PayloadMarker {
    #[serde(rename = "type", default)]
    pub kind: Option<MarkerKind>,
    #[serde(default)]
    pub color: Option<String>,
}

/// JSON Schema for [`DiagramPayload`].
pub fn payload_schema() -> schemars::Schema {
    schemars::schema_for!(DiagramPayload)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// JSON path of the offending value, e.g. `edges[1].target`.
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A generated payload failed validation. Nothing was imported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid diagram schema ({})", join_issues(.issues))]
pub struct SchemaError {
    pub issues: Vec<SchemaIssue>,
}

impl SchemaError {
    fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![issue(path, message)],
        }
    }
}

fn join_issues(issues: &[SchemaIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Parses raw service output and validates it.
pub fn parse_payload(raw: &str) -> Result<Graph, SchemaError> {
    let value: Value = serde_json::from_str(raw).map_err(|err| {
        let message = format!("not valid JSON: {err}");
        SchemaError::single("$", message)
    })?;
    validate_payload(&value)
}

/// Validates an untrusted payload and builds the graph it describes, with defaults filled.
pub fn validate_payload(value: &Value) -> Result<Graph, SchemaError> {
    let mut issues = Vec::new();

    let Some(root) = value.as_object() else {
        return Err(SchemaError::single(
            "$",
            "expected an object with `nodes` and `edges`",
        ));
    };

    let raw_nodes = match root.get("nodes") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => {
            issues.push(issue("nodes", "expected an array"));
            &[]
        }
        None => {
            issues.push(issue("nodes", "missing"));
            &[]
        }
    };
    let raw_edges = match root.get("edges") {
        Some(Value::Array(items)) => items.as_slice(),
        None | Some(Value::Null) => &[],
        Some(_) => {
            issues.push(issue("edges", "expected an array"));
            &[]
        }
    };

    let mut taken = BTreeSet::new();
    let mut nodes = Vec::with_capacity(raw_nodes.len());
    let mut ordinals: BTreeMap<NodeKind, usize> = BTreeMap::new();
    for (index, raw) in raw_nodes.iter().enumerate() {
        let path = format!("nodes[{index}]");
        if let Some(node) = check_node(&path, raw, index, &mut ordinals, &mut taken, &mut issues) {
            nodes.push(node);
        }
    }

    let node_ids = nodes
        .iter()
        .map(|node| node.id().as_str().to_owned())
        .collect::<BTreeSet<_>>();
    let mut pending_edges = Vec::with_capacity(raw_edges.len());
    for (index, raw) in raw_edges.iter().enumerate() {
        let path = format!("edges[{index}]");
        if let Some(edge) = check_edge(&path, raw, &node_ids, &mut taken, &mut issues) {
            pending_edges.push(edge);
        }
    }

    if !issues.is_empty() {
        return Err(SchemaError { issues });
    }

    // Explicit ids are all claimed by now, so generated ones cannot steal them.
    let edges = pending_edges
        .into_iter()
        .map(|pending| pending.finish(&mut taken))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| SchemaError::single("edges", err.to_string()))?;

    let ops = nodes
        .into_iter()
        .map(|node| Op::AddNode { node })
        .chain(edges.into_iter().map(|edge| Op::AddEdge { edge }))
        .collect::<Vec<_>>();
    let mut graph = Graph::default();
    apply_ops(&mut graph, &ops).map_err(|err| SchemaError::single("$", err.to_string()))?;
    Ok(graph)
}

/// Validates `payload` and, only if it is fully valid, swaps it into `store` and asks the
/// surface to fit the new diagram into view.
pub fn import_into(
    store: &mut GraphStore,
    surface: &mut dyn RenderSurface,
    payload: &Value,
) -> Result<ImportSummary, SchemaError> {
    let graph = match validate_payload(payload) {
        Ok(graph) => graph,
        Err(err) => {
            warn!(issues = err.issues.len(), "rejected generated diagram: {err}");
            return Err(err);
        }
    };

    let summary = ImportSummary {
        nodes: graph.nodes().len(),
        edges: graph.edges().len(),
    };
    store
        .replace_graph(graph)
        .map_err(|err| SchemaError::single("$", err.to_string()))?;
    surface.fit_view();
    info!(nodes = summary.nodes, edges = summary.edges, "imported generated diagram");
    Ok(summary)
}

fn issue(path: impl Into<String>, message: impl Into<String>) -> SchemaIssue {
    SchemaIssue {
        path: path.into(),
        message: message.into(),
    }
}

fn check_node(
    path: &str,
    raw: &Value,
    index: usize,
    ordinals: &mut BTreeMap<NodeKind, usize>,
    taken: &mut BTreeSet<String>,
    issues: &mut Vec<SchemaIssue>,
) -> Option<Node> {
    let Some(object) = raw.as_object() else {
        issues.push(issue(path, "expected an object"));
        return None;
    };
    let before = issues.len();

    let id = check_id(&format!("{path}.id"), object.get("id"), taken, issues);

    let kind = match object.get("type") {
        Some(Value::String(raw)) => match raw.parse::<NodeKind>() {
            Ok(kind) => Some(kind),
            Err(err) => {
                issues.push(issue(format!("{path}.type"), err.to_string()));
                None
            }
        },
        Some(_) => {
            issues.push(issue(format!("{path}.type"), "expected a string"));
            None
        }
        None => {
            issues.push(issue(format!("{path}.type"), "missing"));
            None
        }
    };

    let position = check_position(&format!("{path}.position"), object.get("position"), issues);

    let z_index = match object.get("zIndex") {
        None | Some(Value::Null) => defaults::Z_INDEX,
        Some(value) => match value.as_i64() {
            Some(z_index) if z_index_in_range(z_index) => z_index,
            _ => {
                issues.push(issue(
                    format!("{path}.zIndex"),
                    format!("expected an integer within ±{}", defaults::Z_INDEX_LIMIT),
                ));
                defaults::Z_INDEX
            }
        },
    };

    let data = match object.get("data") {
        None | Some(Value::Null) => PayloadNodeData::default(),
        Some(value) => {
            serde_json::from_value::<PayloadNodeData>(value.clone()).unwrap_or_else(|err| {
                issues.push(issue(format!("{path}.data"), err.to_string()));
                PayloadNodeData::default()
            })
        }
    };

    if issues.len() != before {
        return None;
    }
    let (id, kind, position) = (id?, kind?, position?);

    let ordinal = ordinals.entry(kind).or_default();
    *ordinal += 1;
    let data = fill_node_data(kind, data, *ordinal, index);
    let mut node = Node::new(id, kind, position, data);
    node.set_z_index(z_index);
    Some(node)
}

fn check_id(
    path: &str,
    raw: Option<&Value>,
    taken: &mut BTreeSet<String>,
    issues: &mut Vec<SchemaIssue>,
) -> Option<NodeId> {
    let raw = match raw {
        Some(Value::String(raw)) => raw,
        Some(_) => {
            issues.push(issue(path, "expected a string"));
            return None;
        }
        None => {
            issues.push(issue(path, "missing"));
            return None;
        }
    };
    match NodeId::new(raw.as_str()) {
        Ok(id) if taken.insert(raw.clone()) => Some(id),
        Ok(_) => {
            issues.push(issue(path, format!("duplicate id '{raw}'")));
            None
        }
        Err(err) => {
            issues.push(issue(path, err.to_string()));
            None
        }
    }
}

fn check_position(
    path: &str,
    raw: Option<&Value>,
    issues: &mut Vec<SchemaIssue>,
) -> Option<Position> {
    let Some(object) = raw.and_then(Value::as_object) else {
        issues.push(issue(path, "expected an object with numeric `x` and `y`"));
        return None;
    };
    let mut coordinate = |axis: &str| match object.get(axis).and_then(Value::as_f64) {
        Some(value) if value.is_finite() => Some(value),
        _ => {
            issues.push(issue(format!("{path}.{axis}"), "expected a finite number"));
            None
        }
    };
    let x = coordinate("x");
    let y = coordinate("y");
    Some(Position::new(x?, y?))
}

fn z_index_in_range(z_index: i64) -> bool {
    (-defaults::Z_INDEX_LIMIT..=defaults::Z_INDEX_LIMIT).contains(&z_index)
}

fn fill_node_data(kind: NodeKind, data: PayloadNodeData, ordinal: usize, index: usize) -> NodeData {
    let label = data.label.unwrap_or_else(|| defaults::label(kind, ordinal));
    let fill_color = data
        .fill_color
        .as_deref()
        .unwrap_or(defaults::palette_color(index));
    let base = defaults::node_data(kind, label, fill_color);
    NodeData {
        text_color: data.text_color.unwrap_or(base.text_color),
        font_weight: data.font_weight.unwrap_or(base.font_weight),
        width: data.width.unwrap_or(base.width),
        height: data.height.unwrap_or(base.height),
        font_size: data.font_size.unwrap_or(base.font_size),
        text_offset: data.text_offset.unwrap_or(base.text_offset),
        arrow: base.arrow.map(|arrow| ArrowStyle {
            rotation: data.rotation.unwrap_or(arrow.rotation),
            head: data.arrow_head.unwrap_or(arrow.head),
            head_color: data.arrow_head_color.unwrap_or(arrow.head_color),
        }),
        label: base.label,
        fill_color: base.fill_color,
    }
}

/// An edge that passed validation but may still need a generated id.
struct PendingEdge {
    id: Option<EdgeId>,
    source: NodeId,
    target: NodeId,
    animated: bool,
    label: Option<String>,
    marker: Marker,
}

impl PendingEdge {
    fn finish(self, taken: &mut BTreeSet<String>) -> Result<Edge, IdError> {
        let id = match self.id {
            Some(id) => id,
            None => generated_edge_id(&self.source, &self.target, taken)?,
        };
        Ok(Edge::new_with(
            id,
            self.source,
            self.target,
            self.animated,
            self.label,
            self.marker,
        ))
    }
}

fn generated_edge_id(
    source: &NodeId,
    target: &NodeId,
    taken: &mut BTreeSet<String>,
) -> Result<EdgeId, IdError> {
    let base = format!("edge-{source}-{target}");
    let mut candidate = base.clone();
    let mut suffix = 2usize;
    while taken.contains(&candidate) {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
    taken.insert(candidate.clone());
    EdgeId::new(candidate)
}

fn check_edge(
    path: &str,
    raw: &Value,
    node_ids: &BTreeSet<String>,
    taken: &mut BTreeSet<String>,
    issues: &mut Vec<SchemaIssue>,
) -> Option<PendingEdge> {
    let Some(object) = raw.as_object() else {
        issues.push(issue(path, "expected an object"));
        return None;
    };
    let before = issues.len();

    let id: Option<EdgeId> = match object.get("id") {
        None | Some(Value::Null) => None,
        Some(value) => {
            check_id(&format!("{path}.id"), Some(value), taken, issues).map(|id| id.retag())
        }
    };
    let source_path = format!("{path}.source");
    let source = check_endpoint(&source_path, object.get("source"), node_ids, issues);
    let target_path = format!("{path}.target");
    let target = check_endpoint(&target_path, object.get("target"), node_ids, issues);

    let animated = optional_field(path, object, "animated", issues, Value::as_bool);
    let label = optional_field(path, object, "label", issues, |v| {
        v.as_str().map(ToOwned::to_owned)
    });
    let marker = match object.get("markerEnd") {
        None | Some(Value::Null) => PayloadMarker::default(),
        Some(value) => {
            serde_json::from_value::<PayloadMarker>(value.clone()).unwrap_or_else(|err| {
                issues.push(issue(format!("{path}.markerEnd"), err.to_string()));
                PayloadMarker::default()
            })
        }
    };

    if issues.len() != before {
        return None;
    }
    let default_marker = Marker::default();
    Some(PendingEdge {
        id,
        source: source?,
        target: target?,
        animated: animated.unwrap_or(true),
        label,
        marker: Marker {
            kind: marker.kind.unwrap_or(default_marker.kind),
            color: marker.color.unwrap_or(default_marker.color),
        },
    })
}

fn check_endpoint(
    path: &str,
    raw: Option<&Value>,
    node_ids: &BTreeSet<String>,
    issues: &mut Vec<SchemaIssue>,
) -> Option<NodeId> {
    let Some(raw) = raw.and_then(Value::as_str) else {
        issues.push(issue(path, "expected a node id string"));
        return None;
    };
    if !node_ids.contains(raw) {
        issues.push(issue(path, format!("references unknown node '{raw}'")));
        return None;
    }
    NodeId::new(raw).ok()
}

/// Reads `object[key]`; a present value of the wrong type is reported at `path.key`.
fn optional_field<T>(
    path: &str,
    object: &Map<String, Value>,
    key: &str,
    issues: &mut Vec<SchemaIssue>,
    read: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    match object.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let parsed = read(value);
            if parsed.is_none() {
                issues.push(issue(format!("{path}.{key}"), "unexpected value type"));
            }
            parsed
        }
    }
}

#[cfg(test)]
mod tests;
