// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};

use canvasmaid::ingest::parse_canvas;
use canvasmaid::model::CanvasDocument;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut path = std::env::temp_dir();
        path.push(format!("canvasmaid_bench_{prefix}_{pid}_{nanos}_{counter}"));
        std::fs::create_dir_all(&path).expect("create temp dir");

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    MediumGrouped,
    LargeColored,
}

#[derive(Debug, Clone, Copy)]
pub struct CanvasParams {
    pub groups: usize,
    pub nodes_per_group: usize,
    pub loose_nodes: usize,
    pub edges_per_node: usize,
    pub label_len: usize,
}

impl CanvasParams {
    pub const fn new(
        groups: usize,
        nodes_per_group: usize,
        loose_nodes: usize,
        edges_per_node: usize,
        label_len: usize,
    ) -> Self {
        Self { groups, nodes_per_group, loose_nodes, edges_per_node, label_len }
    }
}

pub fn params(case: Case) -> CanvasParams {
    match case {
        Case::Small => CanvasParams::new(1, 4, 4, 1, 8),
        Case::MediumGrouped => CanvasParams::new(8, 12, 20, 2, 16),
        Case::LargeColored => CanvasParams::new(24, 30, 120, 3, 48),
    }
}

fn ascii_repeat_to_len(prefix: &str, fill: char, target_len: usize) -> String {
    if prefix.len() >= target_len {
        return prefix[..target_len].to_owned();
    }

    let mut out = String::with_capacity(target_len);
    out.push_str(prefix);
    while out.len() < target_len {
        out.push(fill);
    }
    out
}

/// Node colors cycle through presets, one raw hex value and "no color".
fn color_for(idx: usize) -> Option<String> {
    match idx % 8 {
        0..=5 => Some(((idx % 6) + 1).to_string()),
        6 => Some("#3366ff".to_owned()),
        _ => None,
    }
}

fn node_json(id: &str, idx: usize, x: i64, y: i64, label_len: usize) -> Value {
    let mut node = match idx % 4 {
        0 | 1 => json!({
            "id": id,
            "type": "text",
            "text": ascii_repeat_to_len(&format!("Node {idx} \"q\"\n"), 'x', label_len),
        }),
        2 => json!({ "id": id, "type": "file", "file": format!("notes/{id}.md") }),
        _ => json!({ "id": id, "type": "link", "url": format!("https://example.com/{id}") }),
    };
    node["x"] = json!(x);
    node["y"] = json!(y);
    node["width"] = json!(200);
    node["height"] = json!(60);
    if let Some(color) = color_for(idx) {
        node["color"] = json!(color);
    }
    node
}

pub fn canvas_json(params: CanvasParams) -> Value {
    let mut nodes = Vec::new();
    let mut ids = Vec::new();

    for group in 0..params.groups {
        let gx = (group as i64) * 1_000;
        let height = (params.nodes_per_group as i64) * 100 + 100;
        nodes.push(json!({
            "id": format!("group-{group}"),
            "type": "group",
            "label": format!("Group {group}"),
            "x": gx,
            "y": 0,
            "width": 800,
            "height": height,
            "color": ((group % 6) + 1).to_string(),
        }));
        for member in 0..params.nodes_per_group {
            let id = format!("g{group}-n{member}");
            let idx = ids.len();
            nodes.push(node_json(&id, idx, gx + 50, (member as i64) * 100 + 50, params.label_len));
            ids.push(id);
        }
    }

    for loose in 0..params.loose_nodes {
        let id = format!("loose-{loose}");
        let idx = ids.len();
        nodes.push(node_json(&id, idx, (loose as i64) * 300, -10_000, params.label_len));
        ids.push(id);
    }

    let mut edges = Vec::new();
    for (idx, from) in ids.iter().enumerate() {
        for hop in 1..=params.edges_per_node {
            let to = &ids[(idx + hop * 7) % ids.len()];
            let mut edge = json!({ "id": format!("e{idx}-{hop}"), "fromNode": from, "toNode": to });
            if hop % 2 == 0 {
                edge["label"] = json!(format!("hop {hop}"));
            }
            if idx % 5 == 0 {
                edge["toEnd"] = json!("none");
                edge["color"] = json!("4");
            }
            edges.push(edge);
        }
    }

    json!({ "nodes": nodes, "edges": edges })
}

pub fn canvas_text(case: Case) -> String {
    serde_json::to_string_pretty(&canvas_json(params(case))).expect("serialize canvas fixture")
}

pub fn document(case: Case) -> CanvasDocument {
    parse_canvas("bench.canvas", &canvas_text(case)).expect("parse canvas fixture")
}
