// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Regeneration state machine.
//!
//! [`RegenerationController`] owns the active canvas document, the palette and the last generated
//! diagram, and decides when a diagram has to be recomputed:
//!
//! - ingesting a document always generates (`Empty`/`Generated`/`Stale` → `Generated`);
//! - committing a palette change never regenerates, it only marks the diagram `Stale`;
//! - `regenerate` recomputes from the current document and committed palette;
//! - removing the document drops everything (`Empty`).
//!
//! Failed ingestions and failed conversions leave the state untouched.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::convert::{ConversionEngine, ConversionError, FlowchartEngine};
use crate::ingest::IngestError;
use crate::model::{CanvasDocument, ColorGroupId, ColorPalette, CommitResult, DiagramSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    /// No document ingested.
    Empty,
    /// The diagram matches the active document and committed palette.
    Generated,
    /// The palette changed after generation; the old diagram is kept but outdated.
    Stale,
}

impl GenerationState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Generated => "generated",
            Self::Stale => "stale",
        }
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle for one in-flight ingestion; only the most recently issued ticket may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IngestTicket(u64);

impl IngestTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The document replaced the previous one and a diagram was generated.
    Applied,
    /// A newer ingestion (or a removal) happened since the ticket was issued; nothing changed.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    ConversionFailed(#[from] ConversionError),
    #[error("no canvas document loaded")]
    NoDocument,
}

/// One controller shared by the TUI and the MCP server.
pub type SharedController = Arc<Mutex<RegenerationController<FlowchartEngine>>>;

pub fn shared(controller: RegenerationController<FlowchartEngine>) -> SharedController {
    Arc::new(Mutex::new(controller))
}

#[derive(Debug, Clone)]
struct Generation {
    diagram: DiagramSource,
    palette: ColorPalette,
}

#[derive(Debug)]
pub struct RegenerationController<E> {
    engine: E,
    palette: ColorPalette,
    document: Option<CanvasDocument>,
    generation: Option<Generation>,
    state: GenerationState,
    issued_ticket: u64,
    last_error: Option<SessionError>,
}

impl<E: ConversionEngine> RegenerationController<E> {
    pub fn new(engine: E) -> Self {
        Self::with_palette(engine, ColorPalette::default())
    }

    pub fn with_palette(engine: E, palette: ColorPalette) -> Self {
        Self {
            engine,
            palette,
            document: None,
            generation: None,
            state: GenerationState::Empty,
            issued_ticket: 0,
            last_error: None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn document(&self) -> Option<&CanvasDocument> {
        self.document.as_ref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.document.as_ref().map(CanvasDocument::file_name)
    }

    /// The last generated diagram; still available (but outdated) while `Stale`.
    pub fn diagram(&self) -> Option<&DiagramSource> {
        self.generation.as_ref().map(|generation| &generation.diagram)
    }

    /// Last ingestion/conversion error, cleared by the next successful ingestion or removal.
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Issues a ticket for an ingestion whose read is about to start.
    pub fn begin_ingest(&mut self) -> IngestTicket {
        self.issued_ticket += 1;
        IngestTicket(self.issued_ticket)
    }

    /// Applies the result of the ingestion started with `ticket`.
    ///
    /// Results for tickets that are no longer the latest are dropped without touching state.
    pub fn finish_ingest(
        &mut self,
        ticket: IngestTicket,
        result: Result<CanvasDocument, IngestError>,
    ) -> Result<IngestOutcome, SessionError> {
        if ticket.0 != self.issued_ticket {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued_ticket,
                "dropping superseded ingestion"
            );
            return Ok(IngestOutcome::Superseded);
        }

        let document = result.map_err(|err| self.record_error(SessionError::from(err)))?;
        self.load_document(document)?;
        Ok(IngestOutcome::Applied)
    }

    /// Replaces the active document and generates its diagram.
    ///
    /// Also invalidates any outstanding ingestion ticket.
    pub fn load_document(&mut self, document: CanvasDocument) -> Result<(), SessionError> {
        self.issued_ticket += 1;

        let diagram = self
            .run_engine(&document)
            .map_err(|err| self.record_error(SessionError::from(err)))?;
        self.document = Some(document);
        self.generation = Some(Generation { diagram, palette: self.palette.committed_snapshot() });
        self.last_error = None;
        self.transition(GenerationState::Generated);
        Ok(())
    }

    /// Records a failed ingestion that never got as far as a ticket (e.g. a rejected name).
    pub fn reject_ingest(&mut self, err: IngestError) -> SessionError {
        self.record_error(SessionError::from(err))
    }

    /// Recomputes the diagram from the active document and the committed palette.
    pub fn regenerate(&mut self) -> Result<&DiagramSource, SessionError> {
        let Some(document) = self.document.as_ref() else {
            return Err(SessionError::NoDocument);
        };

        let result = self.run_engine(document);
        let diagram = result.map_err(|err| self.record_error(SessionError::from(err)))?;
        let palette = self.palette.committed_snapshot();
        self.transition(GenerationState::Generated);
        let generation = self.generation.insert(Generation { diagram, palette });
        Ok(&generation.diagram)
    }

    /// Drops the document and its diagram; also cancels any in-flight ingestion.
    pub fn remove_document(&mut self) {
        self.issued_ticket += 1;
        self.document = None;
        self.generation = None;
        self.last_error = None;
        self.transition(GenerationState::Empty);
    }

    /// Live-preview edit; never changes the committed palette or the generation state.
    pub fn set_color(&mut self, group: ColorGroupId, candidate: impl Into<String>) {
        self.palette.set_color(group, candidate);
    }

    pub fn commit_color(&mut self, group: ColorGroupId, candidate: &str) -> CommitResult {
        let result = self.palette.commit_color(group, candidate);
        if let CommitResult::Accepted { changed: true } = result {
            self.refresh_staleness();
        }
        result
    }

    /// Commits the group's draft; `None` when there is no draft.
    pub fn commit_draft(&mut self, group: ColorGroupId) -> Option<CommitResult> {
        let result = self.palette.commit_draft(group)?;
        if let CommitResult::Accepted { changed: true } = result {
            self.refresh_staleness();
        }
        Some(result)
    }

    pub fn revert_draft(&mut self, group: ColorGroupId) {
        self.palette.revert_draft(group);
    }

    fn refresh_staleness(&mut self) {
        let Some(generation) = self.generation.as_ref() else {
            return;
        };
        let next = if generation.palette == self.palette {
            GenerationState::Generated
        } else {
            GenerationState::Stale
        };
        self.transition(next);
    }

    fn run_engine(&self, document: &CanvasDocument) -> Result<DiagramSource, ConversionError> {
        let palette = self.palette.committed_snapshot();
        self.engine.generate(document, &palette).inspect_err(|err| {
            tracing::warn!(file_name = document.file_name(), %err, "conversion failed");
        })
    }

    fn record_error(&mut self, err: SessionError) -> SessionError {
        self.last_error = Some(err.clone());
        err
    }

    fn transition(&mut self, next: GenerationState) {
        if self.state != next {
            tracing::debug!(from = %self.state, to = %next, "generation state changed");
            self.state = next;
        }
    }
}
