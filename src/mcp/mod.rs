// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model Context Protocol (MCP) server surface.
//!
//! Exposes canvas ingestion, palette edits and diagram regeneration as tools over one shared
//! [`crate::session::RegenerationController`].

mod server;
mod types;

pub use server::CanvasmaidMcp;
