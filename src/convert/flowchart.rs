// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use thiserror::Error;

use super::ident::{escape_label, IdentAllocator};
use super::{ConversionEngine, ConversionError};
use crate::model::{
    CanvasDocument, CanvasGraph, CanvasNode, CanvasNodeKind, ColorGroupId, ColorPalette,
    DiagramSource, EdgeEnd, HexColor,
};

const INDENT: &str = "    ";
const MAX_INDENT_LEVELS: usize = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    TopBottom,
    LeftRight,
    RightLeft,
    BottomTop,
}

impl Direction {
    pub fn as_mermaid(self) -> &'static str {
        match self {
            Self::TopBottom => "TB",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
            Self::BottomTop => "BT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mermaid())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" | "TD" => Ok(Self::TopBottom),
            "LR" => Ok(Self::LeftRight),
            "RL" => Ok(Self::RightLeft),
            "BT" => Ok(Self::BottomTop),
            _ => Err(ParseDirectionError { value: s.to_owned() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid flowchart direction {value:?} (expected TB/TD/LR/RL/BT)")]
pub struct ParseDirectionError {
    pub value: String,
}

/// Built-in JSON Canvas → Mermaid flowchart converter.
///
/// Groups become subgraphs (membership by geometric containment, innermost group wins),
/// preset colors `"1"`..`"6"` resolve through the palette and hex colors pass through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowchartEngine {
    direction: Direction,
}

impl FlowchartEngine {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl ConversionEngine for FlowchartEngine {
    fn generate(
        &self,
        document: &CanvasDocument,
        palette: &ColorPalette,
    ) -> Result<DiagramSource, ConversionError> {
        let graph = CanvasGraph::from_json(document.json());
        let text = export_canvas_flowchart(&graph, palette, self.direction)
            .map_err(|err| ConversionError::new(err.to_string()))?;
        Ok(DiagramSource::new(text))
    }
}

/// Renders `graph` as Mermaid flowchart text.
pub fn export_canvas_flowchart(
    graph: &CanvasGraph,
    palette: &ColorPalette,
    direction: Direction,
) -> Result<String, fmt::Error> {
    // The first node with a given canvas id wins; later duplicates are dropped.
    let mut idents = IdentAllocator::default();
    let mut nodes = Vec::<&CanvasNode>::with_capacity(graph.nodes().len());
    for node in graph.nodes() {
        if idents.get(node.id()).is_some() {
            tracing::debug!(node_id = node.id(), "skipping node with duplicate id");
            continue;
        }
        idents.assign(node.id());
        nodes.push(node);
    }

    let parents = group_parents(&nodes);

    let mut out = String::new();
    writeln!(out, "flowchart {direction}")?;
    write_nodes(&mut out, &nodes, &parents, &idents)?;

    let mut link_styles = Vec::<(usize, HexColor)>::new();
    let mut link_idx = 0usize;
    for edge in graph.edges() {
        let (Some(from), Some(to)) = (idents.get(edge.from_node()), idents.get(edge.to_node()))
        else {
            tracing::debug!(edge_id = edge.id(), "skipping edge with unknown endpoint");
            continue;
        };

        let (from, op, to) = match (edge.from_end(), edge.to_end()) {
            (EdgeEnd::None, EdgeEnd::Arrow) => (from, "-->", to),
            (EdgeEnd::Arrow, EdgeEnd::Arrow) => (from, "<-->", to),
            (EdgeEnd::Arrow, EdgeEnd::None) => (to, "-->", from),
            (EdgeEnd::None, EdgeEnd::None) => (from, "---", to),
        };

        out.push_str(INDENT);
        write!(out, "{from} {op}")?;
        if let Some(label) = edge.label().map(escape_label).filter(|label| !label.is_empty()) {
            write!(out, "|{label}|")?;
        }
        writeln!(out, " {to}")?;

        if let Some(color) = edge.color().and_then(|raw| resolve_color(raw, palette)) {
            link_styles.push((link_idx, color));
        }
        link_idx += 1;
    }

    for node in &nodes {
        let Some(color) = node.color().and_then(|raw| resolve_color(raw, palette)) else {
            continue;
        };
        let Some(ident) = idents.get(node.id()) else {
            continue;
        };
        writeln!(out, "{INDENT}style {ident} fill:{color},stroke:{color}")?;
    }
    for (idx, color) in link_styles {
        writeln!(out, "{INDENT}linkStyle {idx} stroke:{color}")?;
    }

    Ok(out)
}

enum Step {
    Open { idx: usize, depth: usize },
    Close { depth: usize },
}

/// Writes nodes in document order with groups as nested subgraphs.
///
/// Uses an explicit stack: canvas nesting depth is unbounded input.
fn write_nodes(
    out: &mut String,
    nodes: &[&CanvasNode],
    parents: &[Option<usize>],
    idents: &IdentAllocator,
) -> fmt::Result {
    let mut roots = Vec::new();
    let mut children = vec![Vec::new(); nodes.len()];
    for (idx, parent) in parents.iter().enumerate() {
        match parent {
            Some(parent) => children[*parent].push(idx),
            None => roots.push(idx),
        }
    }

    let mut stack: Vec<Step> =
        roots.iter().rev().map(|&idx| Step::Open { idx, depth: 1 }).collect();
    while let Some(step) = stack.pop() {
        match step {
            Step::Open { idx, depth } => {
                let node = nodes[idx];
                let ident = idents.get(node.id()).unwrap_or(node.id());
                let indent = indent_for(depth);
                if let CanvasNodeKind::Group { label } = node.kind() {
                    match label.as_deref().map(escape_label).filter(|label| !label.is_empty()) {
                        Some(label) => writeln!(out, "{indent}subgraph {ident}[\"{label}\"]")?,
                        None => writeln!(out, "{indent}subgraph {ident}")?,
                    }
                    stack.push(Step::Close { depth });
                    stack.extend(
                        children[idx].iter().rev().map(|&idx| Step::Open { idx, depth: depth + 1 }),
                    );
                } else {
                    write_leaf(out, node, ident, &indent)?;
                }
            }
            Step::Close { depth } => writeln!(out, "{}end", indent_for(depth))?,
        }
    }
    Ok(())
}

/// Indentation is cosmetic; it stops growing past a few levels so output stays linear in size.
fn indent_for(depth: usize) -> String {
    INDENT.repeat(depth.min(MAX_INDENT_LEVELS))
}

fn write_leaf(out: &mut String, node: &CanvasNode, ident: &str, indent: &str) -> fmt::Result {
    match node.kind() {
        CanvasNodeKind::Text { text } => {
            let label = non_empty_label(escape_label(text), node.id());
            writeln!(out, "{indent}{ident}[\"{label}\"]")
        }
        CanvasNodeKind::File { file, subpath } => {
            let name = file.rsplit('/').next().unwrap_or(file);
            let raw = match subpath {
                Some(subpath) => format!("{name}{subpath}"),
                None => name.to_owned(),
            };
            let label = non_empty_label(escape_label(&raw), node.id());
            writeln!(out, "{indent}{ident}[[\"{label}\"]]")
        }
        CanvasNodeKind::Link { url } => {
            let label = non_empty_label(escape_label(url), node.id());
            writeln!(out, "{indent}{ident}([\"{label}\"])")
        }
        CanvasNodeKind::Group { .. } | CanvasNodeKind::Other { .. } => {
            let label = escape_label(node.id());
            writeln!(out, "{indent}{ident}[\"{label}\"]")
        }
    }
}

fn non_empty_label(label: String, fallback: &str) -> String {
    if label.is_empty() {
        escape_label(fallback)
    } else {
        label
    }
}

/// For every node, the index of the innermost group whose rectangle contains it.
///
/// A group may only be nested in a strictly larger group (or an equal-sized one that appears
/// earlier), which keeps the parent relation acyclic.
fn group_parents(nodes: &[&CanvasNode]) -> Vec<Option<usize>> {
    nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| {
            let rect = node.rect();
            nodes
                .iter()
                .enumerate()
                .filter(|(group_idx, group)| *group_idx != idx && group.is_group())
                .filter(|(group_idx, group)| {
                    let group_rect = group.rect();
                    if !group_rect.contains(&rect) {
                        return false;
                    }
                    if !node.is_group() {
                        return true;
                    }
                    group_rect.area() > rect.area()
                        || (group_rect.area() == rect.area() && *group_idx < idx)
                })
                .min_by(|(a_idx, a), (b_idx, b)| {
                    a.rect()
                        .area()
                        .total_cmp(&b.rect().area())
                        .then_with(|| b_idx.cmp(a_idx))
                })
                .map(|(group_idx, _)| group_idx)
        })
        .collect()
}

/// Resolves a canvas color: presets go through the palette, hex values pass through.
fn resolve_color(raw: &str, palette: &ColorPalette) -> Option<HexColor> {
    if let Ok(group) = raw.parse::<ColorGroupId>() {
        return Some(palette.committed(group).clone());
    }
    HexColor::parse(raw).ok()
}

#[cfg(test)]
mod tests;
