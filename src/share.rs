// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mermaid Live Editor links.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::json;

pub const LIVE_EDITOR_BASE: &str = "https://mermaid.live/edit#base64:";

/// Link that opens `diagram` in the Mermaid Live Editor with the default theme.
pub fn live_editor_url(diagram: &str) -> String {
    let state = json!({
        "code": diagram,
        "mermaid": json!({ "theme": "default" }).to_string(),
    });
    format!("{LIVE_EDITOR_BASE}{}", STANDARD.encode(state.to_string()))
}
