// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canvasmaid: JSON Canvas → Mermaid flowchart converter (TUI + MCP + print mode).
//!
//! A [`session::RegenerationController`] owns the loaded canvas, the six-group color palette
//! and the generated diagram; the TUI and the MCP server are two surfaces over the same
//! controller.

pub mod clipboard;
pub mod config;
pub mod convert;
pub mod ingest;
pub mod mcp;
pub mod model;
pub mod session;
pub mod share;
pub mod tui;
