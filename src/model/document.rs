// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A parsed `.canvas` file. The JSON body is kept as-is; only the conversion engine interprets it.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasDocument {
    file_name: String,
    json: Arc<Value>,
}

impl CanvasDocument {
    pub fn new(file_name: impl Into<String>, json: Value) -> Self {
        Self { file_name: file_name.into(), json: Arc::new(json) }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn json(&self) -> &Value {
        &self.json
    }
}

/// Mermaid text produced by a conversion engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagramSource(Arc<str>);

impl DiagramSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Arc::from(text.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DiagramSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DiagramSource {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
