// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;
use serde_json::{json, Value};

use super::{Direction, FlowchartEngine};
use crate::convert::ConversionEngine;
use crate::model::{CanvasDocument, ColorGroupId, ColorPalette};

fn generate(engine: FlowchartEngine, body: Value, palette: &ColorPalette) -> String {
    let document = CanvasDocument::new("test.canvas", body);
    engine.generate(&document, palette).expect("generate").as_str().to_owned()
}

fn node(id: &str, text: &str, rect: [f64; 4]) -> Value {
    json!({
        "id": id, "type": "text", "text": text,
        "x": rect[0], "y": rect[1], "width": rect[2], "height": rect[3]
    })
}

fn group(id: &str, label: &str, rect: [f64; 4]) -> Value {
    json!({
        "id": id, "type": "group", "label": label,
        "x": rect[0], "y": rect[1], "width": rect[2], "height": rect[3]
    })
}

#[test]
fn empty_canvas_yields_header_only() {
    let out = generate(
        FlowchartEngine::default(),
        json!({ "nodes": [], "edges": [] }),
        &ColorPalette::default(),
    );
    assert_eq!(out, "flowchart TB\n");
}

#[test]
fn non_canvas_json_converts_as_empty_graph() {
    let out = generate(FlowchartEngine::default(), json!([1, 2, 3]), &ColorPalette::default());
    assert_eq!(out, "flowchart TB\n");
}

#[test]
fn text_nodes_edges_and_colors() {
    let out = generate(
        FlowchartEngine::new(Direction::LeftRight),
        json!({
            "nodes": [
                { "id": "a", "type": "text", "text": "Start", "color": "1" },
                { "id": "b", "type": "text", "text": "End", "color": "#00FF00" }
            ],
            "edges": [
                { "id": "e1", "fromNode": "a", "toNode": "b", "label": "go", "color": "2" }
            ]
        }),
        &ColorPalette::default(),
    );

    assert_eq!(
        out,
        r#"flowchart LR
    n_a["Start"]
    n_b["End"]
    n_a -->|go| n_b
    style n_a fill:#fb464c,stroke:#fb464c
    style n_b fill:#00ff00,stroke:#00ff00
    linkStyle 0 stroke:#e9973f
"#
    );
}

#[test]
fn groups_nest_by_innermost_containment() {
    let out = generate(
        FlowchartEngine::default(),
        json!({
            "nodes": [
                node("a", "A", [150.0, 150.0, 50.0, 50.0]),
                group("g1", "Outer", [0.0, 0.0, 1000.0, 1000.0]),
                node("b", "B", [500.0, 500.0, 50.0, 50.0]),
                group("g2", "Inner", [100.0, 100.0, 300.0, 300.0]),
                node("c", "C", [2000.0, 0.0, 10.0, 10.0])
            ],
            "edges": []
        }),
        &ColorPalette::default(),
    );

    assert_eq!(
        out,
        r#"flowchart TB
    subgraph n_g1["Outer"]
        n_b["B"]
        subgraph n_g2["Inner"]
            n_a["A"]
        end
    end
    n_c["C"]
"#
    );
}

#[test]
fn equal_sized_groups_do_not_form_a_cycle() {
    let out = generate(
        FlowchartEngine::default(),
        json!({
            "nodes": [
                group("g1", "One", [0.0, 0.0, 100.0, 100.0]),
                group("g2", "Two", [0.0, 0.0, 100.0, 100.0]),
                node("a", "A", [10.0, 10.0, 10.0, 10.0])
            ]
        }),
        &ColorPalette::default(),
    );

    assert_eq!(
        out,
        r#"flowchart TB
    subgraph n_g1["One"]
        subgraph n_g2["Two"]
            n_a["A"]
        end
    end
"#
    );
}

#[test]
fn edge_ends_map_to_connectors_and_unknown_endpoints_are_skipped() {
    let out = generate(
        FlowchartEngine::default(),
        json!({
            "nodes": [
                { "id": "a", "type": "text", "text": "A" },
                { "id": "b", "type": "text", "text": "B" }
            ],
            "edges": [
                { "id": "e1", "fromNode": "a", "toNode": "b", "fromEnd": "arrow", "toEnd": "arrow" },
                { "id": "e2", "fromNode": "a", "toNode": "missing" },
                { "id": "e3", "fromNode": "a", "toNode": "b", "toEnd": "none", "color": "#abc" },
                { "id": "e4", "fromNode": "a", "toNode": "b", "fromEnd": "arrow", "toEnd": "none" }
            ]
        }),
        &ColorPalette::default(),
    );

    assert_eq!(
        out,
        r#"flowchart TB
    n_a["A"]
    n_b["B"]
    n_a <--> n_b
    n_a --- n_b
    n_b --> n_a
    linkStyle 1 stroke:#abc
"#
    );
}

#[test]
fn file_link_and_unknown_nodes_use_their_own_labels() {
    let out = generate(
        FlowchartEngine::default(),
        json!({
            "nodes": [
                { "id": "f", "type": "file", "file": "notes/Plan.md", "subpath": "#Goals" },
                { "id": "l", "type": "link", "url": "https://example.com" },
                { "id": "w", "type": "widget" },
                { "id": "t", "type": "text", "text": "Say \"hi\"\nthen leave" },
                { "id": "e", "type": "text", "text": "" }
            ]
        }),
        &ColorPalette::default(),
    );

    assert_eq!(
        out,
        r#"flowchart TB
    n_f[["Plan.md#Goals"]]
    n_l(["https://example.com"])
    n_w["w"]
    n_t["Say #quot;hi#quot;<br>then leave"]
    n_e["e"]
"#
    );
}

#[test]
fn colliding_canvas_ids_get_distinct_mermaid_ids() {
    let out = generate(
        FlowchartEngine::default(),
        json!({
            "nodes": [
                { "id": "a-b", "type": "text", "text": "first" },
                { "id": "a.b", "type": "text", "text": "second" }
            ],
            "edges": [{ "id": "e", "fromNode": "a.b", "toNode": "a-b" }]
        }),
        &ColorPalette::default(),
    );

    assert!(out.contains("    n_a_b[\"first\"]\n"));
    assert!(out.contains("    n_a_b_2[\"second\"]\n"));
    assert!(out.contains("    n_a_b_2 --> n_a_b\n"));
}

#[test]
fn palette_overrides_change_preset_colors_only() {
    let body = json!({
        "nodes": [
            { "id": "a", "type": "text", "text": "A", "color": "1" },
            { "id": "b", "type": "text", "text": "B", "color": "#111111" }
        ]
    });
    let mut palette = ColorPalette::default();
    palette.commit_color(ColorGroupId::new(1).expect("group"), "#123abc");

    let out = generate(FlowchartEngine::default(), body, &palette);

    assert!(out.contains("style n_a fill:#123abc,stroke:#123abc"));
    assert!(out.contains("style n_b fill:#111111,stroke:#111111"));
}

#[test]
fn drafts_never_reach_the_output() {
    let body = json!({ "nodes": [{ "id": "a", "type": "text", "text": "A", "color": "3" }] });
    let mut palette = ColorPalette::default();
    palette.set_color(ColorGroupId::new(3).expect("group"), "#000000");

    let out = generate(FlowchartEngine::default(), body, &palette);
    assert!(out.contains("fill:#e0de71"));
}

#[test]
fn unresolvable_colors_are_ignored() {
    let out = generate(
        FlowchartEngine::default(),
        json!({ "nodes": [{ "id": "a", "type": "text", "text": "A", "color": "9" }] }),
        &ColorPalette::default(),
    );
    assert!(!out.contains("style"));
}

#[test]
fn generation_is_deterministic() {
    let body = json!({
        "nodes": [
            group("g", "G", [0.0, 0.0, 100.0, 100.0]),
            node("a", "A", [1.0, 1.0, 1.0, 1.0]),
            node("b", "B", [200.0, 1.0, 1.0, 1.0])
        ],
        "edges": [{ "id": "e", "fromNode": "a", "toNode": "b", "color": "4" }]
    });
    let document = CanvasDocument::new("d.canvas", body);
    let palette = ColorPalette::default();
    let engine = FlowchartEngine::default();

    let first = engine.generate(&document, &palette).expect("first");
    let second = engine.generate(&document, &palette).expect("second");
    assert_eq!(first, second);
}

#[test]
fn duplicate_node_ids_keep_the_first_node() {
    let out = generate(
        FlowchartEngine::default(),
        json!({
            "nodes": [
                { "id": "a", "type": "text", "text": "one", "color": "1" },
                { "id": "a", "type": "text", "text": "two", "color": "2" },
                { "id": "b", "type": "text", "text": "three" }
            ],
            "edges": [{ "id": "e", "fromNode": "a", "toNode": "b" }]
        }),
        &ColorPalette::default(),
    );

    assert_eq!(
        out,
        r#"flowchart TB
    n_a["one"]
    n_b["three"]
    n_a --> n_b
    style n_a fill:#fb464c,stroke:#fb464c
"#
    );
}

#[test]
fn deeply_nested_groups_do_not_exhaust_the_stack() {
    const DEPTH: usize = 5_000;

    let mut nodes: Vec<Value> = (0..DEPTH)
        .map(|i| {
            let offset = i as f64;
            let side = ((DEPTH - i) * 10) as f64;
            group(&format!("g{i}"), &format!("G{i}"), [offset, offset, side, side])
        })
        .collect();
    nodes.push(node("leaf", "Leaf", [DEPTH as f64, DEPTH as f64, 1.0, 1.0]));
    let document = CanvasDocument::new("deep.canvas", json!({ "nodes": nodes, "edges": [] }));

    // A small stack makes any per-level recursion fail loudly.
    let out = std::thread::Builder::new()
        .stack_size(512 * 1024)
        .spawn(move || {
            FlowchartEngine::default()
                .generate(&document, &ColorPalette::default())
                .expect("generate")
                .as_str()
                .to_owned()
        })
        .expect("spawn")
        .join()
        .expect("generation thread");

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2 * DEPTH + 2);
    assert_eq!(lines[1], "    subgraph n_g0[\"G0\"]");
    assert_eq!(lines.iter().filter(|line| line.trim_start().starts_with("subgraph ")).count(), DEPTH);
    assert_eq!(lines.iter().filter(|line| line.trim() == "end").count(), DEPTH);
    assert_eq!(lines[DEPTH + 1].trim(), "n_leaf[\"Leaf\"]");
    assert_eq!(lines[DEPTH + 1].len() - lines[DEPTH + 1].trim_start().len(), 16 * 4);
    assert_eq!(lines.last().copied(), Some("    end"));
}

#[rstest]
#[case("TB", Direction::TopBottom)]
#[case("td", Direction::TopBottom)]
#[case("LR", Direction::LeftRight)]
#[case(" rl ", Direction::RightLeft)]
#[case("BT", Direction::BottomTop)]
fn direction_parses_mermaid_names(#[case] raw: &str, #[case] expected: Direction) {
    assert_eq!(raw.parse::<Direction>().expect("direction"), expected);
}

#[test]
fn direction_rejects_unknown_values() {
    assert!("up".parse::<Direction>().is_err());
}
