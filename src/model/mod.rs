// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Ingested canvas documents, the generated diagram text, and the color-group palette.

pub mod canvas;
pub mod document;
pub mod palette;

pub use canvas::{CanvasEdge, CanvasGraph, CanvasNode, CanvasNodeKind, EdgeEnd, Rect};
pub use document::{CanvasDocument, DiagramSource};
pub use palette::{
    ColorGroupId, ColorGroupIdError, ColorPalette, CommitResult, HexColor, InvalidColor,
    COLOR_GROUP_COUNT,
};
