// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};

use crate::convert::FlowchartEngine;
use crate::ingest::{has_canvas_extension, ingest, CanvasFile, IngestError, MemoryFile, PathFile};
use crate::model::{ColorGroupId, ColorPalette, CommitResult};
use crate::session::{
    shared, GenerationState, IngestOutcome, RegenerationController, SessionError,
    SharedController,
};
use crate::share::live_editor_url;

use super::types::*;

#[derive(Clone)]
pub struct CanvasmaidMcp {
    controller: SharedController,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl CanvasmaidMcp {
    pub fn new(controller: RegenerationController<FlowchartEngine>) -> Self {
        Self::with_shared(shared(controller))
    }

    /// Serves a controller that another surface (the TUI) also drives.
    pub fn with_shared(controller: SharedController) -> Self {
        Self { controller, tool_router: Self::tool_router() }
    }

    pub fn controller(&self) -> SharedController {
        self.controller.clone()
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    async fn ingest_file<F: CanvasFile>(&self, file: F) -> Result<CanvasIngestResponse, ErrorData> {
        if !has_canvas_extension(file.name()) {
            let err = IngestError::InvalidExtension { file_name: file.name().to_owned() };
            let err = self.controller.lock().await.reject_ingest(err);
            return Err(session_error(err));
        }

        // The read happens without holding the lock; the ticket decides whether it still applies.
        let ticket = self.controller.lock().await.begin_ingest();
        let result = ingest(&file).await;

        let mut controller = self.controller.lock().await;
        let outcome = controller.finish_ingest(ticket, result).map_err(session_error)?;
        Ok(CanvasIngestResponse {
            applied: outcome == IngestOutcome::Applied,
            status: session_status(&controller),
        })
    }

    /// Load a JSON Canvas file (by `path`, or inline via `name` + `content`) and generate its
    /// Mermaid flowchart; replaces any previously loaded canvas.
    #[tool(name = "canvas.ingest")]
    async fn canvas_ingest(
        &self,
        params: Parameters<CanvasIngestParams>,
    ) -> Result<Json<CanvasIngestResponse>, ErrorData> {
        let response = match params.0 {
            CanvasIngestParams { path: Some(path), name: None, content: None } => {
                self.ingest_file(PathFile::new(path)).await?
            }
            CanvasIngestParams { path: None, name: Some(name), content: Some(content) } => {
                self.ingest_file(MemoryFile::new(name, content)).await?
            }
            _ => {
                return Err(ErrorData::invalid_params(
                    "provide either `path` or both `name` and `content`",
                    None,
                ));
            }
        };
        Ok(Json(response))
    }

    /// Drop the loaded canvas and its diagram; the palette is kept.
    #[tool(name = "canvas.remove")]
    async fn canvas_remove(&self) -> Result<Json<CanvasRemoveResponse>, ErrorData> {
        let mut controller = self.controller.lock().await;
        let removed_file_name = controller.file_name().map(str::to_owned);
        controller.remove_document();
        Ok(Json(CanvasRemoveResponse { removed_file_name, status: session_status(&controller) }))
    }

    /// Read the six color groups (committed value plus any draft).
    #[tool(name = "palette.read")]
    async fn palette_read(&self) -> Result<Json<PaletteReadResponse>, ErrorData> {
        let controller = self.controller.lock().await;
        let groups =
            ColorGroupId::all().map(|group| palette_group(controller.palette(), group)).collect();
        Ok(Json(PaletteReadResponse { groups, status: session_status(&controller) }))
    }

    /// Set a group's live-preview draft; nothing is validated or regenerated until
    /// `palette.commit`.
    #[tool(name = "palette.set")]
    async fn palette_set(
        &self,
        params: Parameters<PaletteSetParams>,
    ) -> Result<Json<PaletteSetResponse>, ErrorData> {
        let PaletteSetParams { group, color } = params.0;
        let group = parse_group(group)?;

        let mut controller = self.controller.lock().await;
        controller.set_color(group, color);
        Ok(Json(PaletteSetResponse { group: palette_group(controller.palette(), group) }))
    }

    /// Commit a hex color (`#rgb`/`#rrggbb`) for a group, or its draft when `color` is omitted.
    /// Invalid values are rejected and the group keeps its last committed color. A changed color
    /// marks the diagram stale; call `diagram.regenerate` to apply it.
    #[tool(name = "palette.commit")]
    async fn palette_commit(
        &self,
        params: Parameters<PaletteCommitParams>,
    ) -> Result<Json<PaletteCommitResponse>, ErrorData> {
        let PaletteCommitParams { group, color } = params.0;
        let group = parse_group(group)?;

        let mut controller = self.controller.lock().await;
        let result = match color {
            Some(color) => controller.commit_color(group, &color),
            None => controller.commit_draft(group).ok_or_else(|| {
                ErrorData::invalid_params(
                    "no draft to commit; pass `color` or call `palette.set` first",
                    Some(serde_json::json!({ "group": group.get() })),
                )
            })?,
        };

        let (accepted, changed) = match result {
            CommitResult::Accepted { changed } => (true, changed),
            CommitResult::Rejected => (false, false),
        };
        Ok(Json(PaletteCommitResponse {
            accepted,
            changed,
            group: palette_group(controller.palette(), group),
            status: session_status(&controller),
        }))
    }

    /// Read the current Mermaid source and generation state.
    #[tool(name = "diagram.read")]
    async fn diagram_read(&self) -> Result<Json<DiagramReadResponse>, ErrorData> {
        let controller = self.controller.lock().await;
        Ok(Json(diagram_response(&controller)))
    }

    /// Regenerate the diagram from the loaded canvas and the committed palette.
    #[tool(name = "diagram.regenerate")]
    async fn diagram_regenerate(&self) -> Result<Json<DiagramReadResponse>, ErrorData> {
        let mut controller = self.controller.lock().await;
        controller.regenerate().map_err(session_error)?;
        Ok(Json(diagram_response(&controller)))
    }
}

#[tool_handler]
impl ServerHandler for CanvasmaidMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Canvasmaid JSON Canvas to Mermaid converter (tools: canvas.ingest, canvas.remove, palette.read, palette.set, palette.commit, diagram.read, diagram.regenerate)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn parse_group(group: u8) -> Result<ColorGroupId, ErrorData> {
    ColorGroupId::new(group).map_err(|err| {
        ErrorData::invalid_params(err.to_string(), Some(serde_json::json!({ "group": group })))
    })
}

fn palette_group(palette: &ColorPalette, group: ColorGroupId) -> PaletteGroup {
    PaletteGroup {
        group: group.get(),
        committed: palette.committed(group).as_str().to_owned(),
        draft: palette.draft(group).map(str::to_owned),
    }
}

fn session_status(controller: &RegenerationController<FlowchartEngine>) -> SessionStatus {
    SessionStatus {
        state: controller.state().as_str().to_owned(),
        file_name: controller.file_name().map(str::to_owned),
        last_error: controller.last_error().map(ToString::to_string),
    }
}

fn diagram_response(controller: &RegenerationController<FlowchartEngine>) -> DiagramReadResponse {
    let mermaid = controller.diagram().map(|diagram| diagram.as_str().to_owned());
    let live_editor_url = match controller.state() {
        GenerationState::Generated => mermaid.as_deref().map(live_editor_url),
        GenerationState::Empty | GenerationState::Stale => None,
    };
    DiagramReadResponse { status: session_status(controller), mermaid, live_editor_url }
}

fn session_error(err: SessionError) -> ErrorData {
    match &err {
        SessionError::Ingest(ingest) => {
            let kind = match ingest {
                IngestError::InvalidExtension { .. } => "invalid_extension",
                IngestError::Read { .. } => "read",
                IngestError::MalformedJson { .. } => "malformed_json",
            };
            ErrorData::invalid_params(err.to_string(), Some(serde_json::json!({ "kind": kind })))
        }
        SessionError::NoDocument => ErrorData::invalid_params(
            err.to_string(),
            Some(serde_json::json!({ "kind": "no_document" })),
        ),
        SessionError::ConversionFailed(_) => ErrorData::internal_error(
            err.to_string(),
            Some(serde_json::json!({ "kind": "conversion_failed" })),
        ),
    }
}

#[cfg(test)]
mod e2e;
