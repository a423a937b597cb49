// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Typed, lenient view over a JSON Canvas body.
//!
//! Entries that do not deserialize (missing `id`, wrong field types) are skipped rather than
//! failing the whole document; a body without `nodes`/`edges` arrays is an empty graph.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasGraph {
    nodes: Vec<CanvasNode>,
    edges: Vec<CanvasEdge>,
}

impl CanvasGraph {
    pub fn from_json(json: &Value) -> Self {
        let nodes = entries(json, "nodes")
            .filter_map(|raw| RawNode::deserialize(raw).ok())
            .map(CanvasNode::from)
            .collect();
        let edges = entries(json, "edges")
            .filter_map(|raw| RawEdge::deserialize(raw).ok())
            .map(CanvasEdge::from)
            .collect();
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[CanvasEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

fn entries<'a>(json: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    json.get(key).and_then(Value::as_array).into_iter().flatten()
}

#[derive(Debug, Clone, PartialEq)]
pub enum CanvasNodeKind {
    Text { text: String },
    File { file: String, subpath: Option<String> },
    Link { url: String },
    Group { label: Option<String> },
    Other { kind: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasNode {
    id: String,
    kind: CanvasNodeKind,
    rect: Rect,
    color: Option<String>,
}

impl CanvasNode {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &CanvasNodeKind {
        &self.kind
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, CanvasNodeKind::Group { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    None,
    Arrow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasEdge {
    id: String,
    from_node: String,
    to_node: String,
    from_end: EdgeEnd,
    to_end: EdgeEnd,
    label: Option<String>,
    color: Option<String>,
}

impl CanvasEdge {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn from_node(&self) -> &str {
        &self.from_node
    }

    pub fn to_node(&self) -> &str {
        &self.to_node
    }

    pub fn from_end(&self) -> EdgeEnd {
        self.from_end
    }

    pub fn to_end(&self) -> EdgeEnd {
        self.to_end
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    subpath: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

impl From<RawNode> for CanvasNode {
    fn from(raw: RawNode) -> Self {
        let kind = match raw.kind.as_str() {
            "text" => CanvasNodeKind::Text { text: raw.text.unwrap_or_default() },
            "file" => {
                CanvasNodeKind::File { file: raw.file.unwrap_or_default(), subpath: raw.subpath }
            }
            "link" => CanvasNodeKind::Link { url: raw.url.unwrap_or_default() },
            "group" => CanvasNodeKind::Group { label: raw.label },
            other => CanvasNodeKind::Other { kind: other.to_owned() },
        };
        Self {
            id: raw.id,
            kind,
            rect: Rect { x: raw.x, y: raw.y, width: raw.width, height: raw.height },
            color: raw.color,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEdge {
    id: String,
    from_node: String,
    to_node: String,
    #[serde(default)]
    from_end: Option<String>,
    #[serde(default)]
    to_end: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

impl From<RawEdge> for CanvasEdge {
    fn from(raw: RawEdge) -> Self {
        let end = |value: Option<&str>, default: EdgeEnd| match value {
            Some("arrow") => EdgeEnd::Arrow,
            Some("none") => EdgeEnd::None,
            _ => default,
        };
        Self {
            from_end: end(raw.from_end.as_deref(), EdgeEnd::None),
            to_end: end(raw.to_end.as_deref(), EdgeEnd::Arrow),
            id: raw.id,
            from_node: raw.from_node,
            to_node: raw.to_node,
            label: raw.label,
            color: raw.color,
        }
    }
}
