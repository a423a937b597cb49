// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionStatus {
    /// `empty`, `generated` or `stale`.
    pub state: String,
    pub file_name: Option<String>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CanvasIngestParams {
    /// Path of a `.canvas` file readable by the server.
    pub path: Option<String>,
    /// File name for inline content (must end with `.canvas`).
    pub name: Option<String>,
    /// Inline JSON Canvas text; requires `name`.
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CanvasIngestResponse {
    /// False when a newer ingestion or removal superseded this one.
    pub applied: bool,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CanvasRemoveResponse {
    pub removed_file_name: Option<String>,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PaletteGroup {
    pub group: u8,
    pub committed: String,
    pub draft: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PaletteReadResponse {
    pub groups: Vec<PaletteGroup>,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PaletteSetParams {
    /// Color group 1..6.
    pub group: u8,
    /// Unvalidated preview value.
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PaletteSetResponse {
    pub group: PaletteGroup,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PaletteCommitParams {
    /// Color group 1..6.
    pub group: u8,
    /// Candidate hex color; when omitted the group's draft is committed.
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PaletteCommitResponse {
    pub accepted: bool,
    pub changed: bool,
    pub group: PaletteGroup,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramReadResponse {
    pub status: SessionStatus,
    /// Last generated Mermaid source; kept (outdated) while stale.
    pub mermaid: Option<String>,
    /// Mermaid Live Editor link, only while the diagram is up to date.
    pub live_editor_url: Option<String>,
}
