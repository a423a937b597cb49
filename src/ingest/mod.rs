// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canvas file ingestion.
//!
//! Checks the `.canvas` suffix before touching the file, reads the text and parses it as JSON.
//! Nothing here mutates session state; callers decide what to do with the result.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::CanvasDocument;

pub const CANVAS_EXTENSION: &str = ".canvas";

/// A file-like input: a name plus a way to read its full text.
pub trait CanvasFile: Send + Sync {
    fn name(&self) -> &str;

    fn read_text(&self) -> impl Future<Output = io::Result<String>> + Send;
}

/// A file on disk, read with `tokio::fs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFile {
    path: PathBuf,
    name: String,
}

impl PathFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CanvasFile for PathFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&self) -> impl Future<Output = io::Result<String>> + Send {
        tokio::fs::read_to_string(self.path.clone())
    }
}

/// Already-loaded content, e.g. a pasted or uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFile {
    name: String,
    text: String,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: text.into() }
    }
}

impl CanvasFile for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&self) -> impl Future<Output = io::Result<String>> + Send {
        std::future::ready(Ok(self.text.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("please select a .canvas file (got {file_name:?})")]
    InvalidExtension { file_name: String },
    #[error("cannot read {file_name}: {message}")]
    Read { file_name: String, kind: io::ErrorKind, message: String },
    #[error("{file_name} is not valid JSON: {message} (line {line}, column {column})")]
    MalformedJson { file_name: String, message: String, line: usize, column: usize },
}

pub fn has_canvas_extension(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(CANVAS_EXTENSION)
}

/// Reads and parses `file`. The content is never read when the name lacks `.canvas`.
pub async fn ingest<F: CanvasFile>(file: &F) -> Result<CanvasDocument, IngestError> {
    let file_name = file.name();
    if !has_canvas_extension(file_name) {
        return Err(IngestError::InvalidExtension { file_name: file_name.to_owned() });
    }

    let text = file.read_text().await.map_err(|err| IngestError::Read {
        file_name: file_name.to_owned(),
        kind: err.kind(),
        message: err.to_string(),
    })?;

    parse_canvas(file_name, &text)
}

/// Synchronous variant of [`ingest`] for text that is already in memory.
pub fn parse_canvas(file_name: &str, text: &str) -> Result<CanvasDocument, IngestError> {
    if !has_canvas_extension(file_name) {
        return Err(IngestError::InvalidExtension { file_name: file_name.to_owned() });
    }

    let json = serde_json::from_str(text).map_err(|err| IngestError::MalformedJson {
        file_name: file_name.to_owned(),
        message: err.to_string(),
        line: err.line(),
        column: err.column(),
    })?;

    tracing::info!(file_name, bytes = text.len(), "canvas ingested");
    Ok(CanvasDocument::new(file_name, json))
}
