// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canvas → Mermaid conversion boundary.
//!
//! The session only talks to [`ConversionEngine`]; [`FlowchartEngine`] is the built-in
//! implementation used by the CLI, TUI and MCP surfaces.

pub mod flowchart;
mod ident;

use thiserror::Error;

use crate::model::{CanvasDocument, ColorPalette, DiagramSource};

pub use flowchart::{Direction, FlowchartEngine, ParseDirectionError};

/// Pure `(document, palette) -> diagram` transformation.
///
/// Implementations must be deterministic: the same document and committed palette always yield
/// the same text.
pub trait ConversionEngine: Send + Sync {
    fn generate(
        &self,
        document: &CanvasDocument,
        palette: &ColorPalette,
    ) -> Result<DiagramSource, ConversionError>;
}

impl<E: ConversionEngine + ?Sized> ConversionEngine for Box<E> {
    fn generate(
        &self,
        document: &CanvasDocument,
        palette: &ColorPalette,
    ) -> Result<DiagramSource, ConversionError> {
        (**self).generate(document, palette)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("conversion failed: {message}")]
pub struct ConversionError {
    pub message: String,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
