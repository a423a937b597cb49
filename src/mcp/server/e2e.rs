// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::*;

use crate::tui::testing::HeadlessTui;
use crossterm::event::KeyCode;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

const CANVAS: &str = r#"{
  "nodes": [
    { "id": "g", "type": "group", "label": "Team", "x": 0, "y": 0, "width": 400, "height": 300 },
    { "id": "a", "type": "text", "text": "Alpha", "x": 20, "y": 20, "width": 100, "height": 50, "color": "1" },
    { "id": "b", "type": "text", "text": "Beta", "x": 600, "y": 20, "width": 100, "height": 50 }
  ],
  "edges": [{ "id": "e", "fromNode": "a", "toNode": "b", "label": "calls" }]
}"#;

fn new_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread().enable_all().build().expect("tokio runtime")
}

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = std::env::temp_dir();
        path.push(format!("canvasmaid-e2e-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct CollabHarness {
    _tmp: TempDir,
    canvas_path: PathBuf,
    runtime: tokio::runtime::Runtime,
    server: CanvasmaidMcp,
}

impl CollabHarness {
    fn new(prefix: &str) -> Self {
        let tmp = TempDir::new(prefix);
        let canvas_path = tmp.path().join("team.canvas");
        std::fs::write(&canvas_path, CANVAS).expect("write canvas");
        let server = CanvasmaidMcp::new(RegenerationController::new(FlowchartEngine::default()));
        Self { _tmp: tmp, canvas_path, runtime: new_runtime(), server }
    }

    fn tui(&self) -> HeadlessTui {
        HeadlessTui::new(self.server.controller(), self.runtime.handle().clone())
    }

    fn diagram(&self) -> DiagramReadResponse {
        let Json(read) = self.runtime.block_on(self.server.diagram_read()).expect("diagram.read");
        read
    }
}

#[test]
fn file_opened_in_tui_is_visible_to_agent() {
    let harness = CollabHarness::new("tui-open");
    let mut tui = harness.tui();

    tui.open(&harness.canvas_path);
    tui.wait_for_ingest();

    let read = harness.diagram();
    assert_eq!(read.status.file_name.as_deref(), Some("team.canvas"));
    assert_eq!(read.status.state, "generated");
    let mermaid = read.mermaid.expect("mermaid");
    assert!(mermaid.contains("subgraph n_g[\"Team\"]"), "{mermaid}");
    assert!(mermaid.contains("n_a -->|calls| n_b"), "{mermaid}");
    assert!(read.live_editor_url.is_some());
}

#[test]
fn agent_commit_marks_tui_output_stale_until_regenerated() {
    let harness = CollabHarness::new("agent-commit");
    let mut tui = harness.tui();
    tui.open(&harness.canvas_path);
    tui.wait_for_ingest();

    let Json(committed) = harness
        .runtime
        .block_on(harness.server.palette_commit(Parameters(PaletteCommitParams {
            group: 1,
            color: Some("#112233".to_owned()),
        })))
        .expect("palette.commit");
    assert_eq!(committed.status.state, "stale");

    let screen = tui.render(120, 30);
    assert!(screen.contains("Palette changed. Press r to regenerate."), "{screen}");
    assert!(screen.contains("#112233"), "{screen}");

    tui.press(KeyCode::Char('r'));
    assert_eq!(tui.toast(), Some("Regenerated"));

    let read = harness.diagram();
    assert_eq!(read.status.state, "generated");
    assert!(read.mermaid.expect("mermaid").contains("style n_a fill:#112233,stroke:#112233"));
}

#[test]
fn tui_palette_edit_is_draft_for_agent_until_enter() {
    let harness = CollabHarness::new("tui-edit");
    let mut tui = harness.tui();
    tui.open(&harness.canvas_path);
    tui.wait_for_ingest();

    tui.press(KeyCode::Char('e'));
    for _ in 0..7 {
        tui.press(KeyCode::Backspace);
    }
    tui.type_text("#00ff00");

    let Json(palette) =
        harness.runtime.block_on(harness.server.palette_read()).expect("palette.read");
    assert_eq!(palette.groups[0].draft.as_deref(), Some("#00ff00"));
    assert_eq!(palette.groups[0].committed, "#fb464c");
    assert_eq!(palette.status.state, "generated");

    tui.press(KeyCode::Enter);
    let Json(palette) =
        harness.runtime.block_on(harness.server.palette_read()).expect("palette.read");
    assert_eq!(palette.groups[0].draft, None);
    assert_eq!(palette.groups[0].committed, "#00ff00");
    assert_eq!(palette.status.state, "stale");
}

#[test]
fn agent_remove_clears_tui_output() {
    let harness = CollabHarness::new("agent-remove");
    let mut tui = harness.tui();
    tui.open(&harness.canvas_path);
    tui.wait_for_ingest();

    let Json(removed) =
        harness.runtime.block_on(harness.server.canvas_remove()).expect("canvas.remove");
    assert_eq!(removed.removed_file_name.as_deref(), Some("team.canvas"));

    let screen = tui.render(120, 30);
    assert!(screen.contains("Open a JSON Canvas file"), "{screen}");
    assert!(screen.contains("No file, press o"), "{screen}");
}

#[test]
fn agent_ingest_supersedes_pending_tui_read() {
    let harness = CollabHarness::new("supersede");
    let mut tui = harness.tui();

    // The TUI read is spawned but not yet applied when the agent ingests inline content.
    tui.open(&harness.canvas_path);
    let Json(ingested) = harness
        .runtime
        .block_on(harness.server.canvas_ingest(Parameters(CanvasIngestParams {
            path: None,
            name: Some("agent.canvas".to_owned()),
            content: Some(r#"{"nodes":[],"edges":[]}"#.to_owned()),
        })))
        .expect("canvas.ingest");
    assert!(ingested.applied);

    tui.wait_for_ingest();
    let read = harness.diagram();
    assert_eq!(read.status.file_name.as_deref(), Some("agent.canvas"));
    assert_eq!(read.mermaid.as_deref(), Some("flowchart TB\n"));
}
