// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Clipboard export with a short-lived "copied" acknowledgment.

use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crossterm::{execute, style::Print};
use thiserror::Error;
use tokio::task::JoinHandle;

/// How long the acknowledgment stays raised after a successful copy.
pub const ACK_WINDOW: Duration = Duration::from_secs(2);

pub trait Clipboard: Send + Sync {
    /// Short backend label for status messages.
    fn backend(&self) -> &'static str;

    fn write_text(&self, text: &str) -> impl Future<Output = io::Result<()>> + Send;
}

/// Writes an OSC 52 escape sequence to stdout; the terminal places the payload on the system
/// clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn backend(&self) -> &'static str {
        "osc52"
    }

    fn write_text(&self, text: &str) -> impl Future<Output = io::Result<()>> + Send {
        let mut stdout = io::stdout();
        std::future::ready(execute!(stdout, Print(osc52_sequence(text))))
    }
}

pub fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

/// In-process clipboard, used by headless surfaces and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn write_text(&self, text: &str) -> impl Future<Output = io::Result<()>> + Send {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_owned());
        std::future::ready(Ok(()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("nothing to copy")]
    Empty,
    #[error("clipboard write failed: {message}")]
    Write { message: String },
}

/// Copies text through a [`Clipboard`] and keeps a resettable acknowledgment flag.
///
/// Each successful copy raises the flag and restarts the clear timer; a copy inside the window
/// aborts the pending timer instead of stacking a second clear.
#[derive(Debug)]
pub struct ClipboardExporter<C> {
    clipboard: C,
    window: Duration,
    acknowledged: Arc<AtomicBool>,
    clear_timer: Mutex<Option<JoinHandle<()>>>,
}

impl<C: Clipboard> ClipboardExporter<C> {
    pub fn new(clipboard: C) -> Self {
        Self::with_window(clipboard, ACK_WINDOW)
    }

    pub fn with_window(clipboard: C, window: Duration) -> Self {
        Self {
            clipboard,
            window,
            acknowledged: Arc::new(AtomicBool::new(false)),
            clear_timer: Mutex::new(None),
        }
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged.load(Ordering::SeqCst)
    }

    /// Must run inside a tokio runtime: the clear timer is a spawned task.
    pub async fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        if text.trim().is_empty() {
            return Err(ClipboardError::Empty);
        }

        self.clipboard.write_text(text).await.map_err(|err| {
            tracing::warn!(backend = self.clipboard.backend(), %err, "clipboard write failed");
            ClipboardError::Write { message: err.to_string() }
        })?;

        tracing::debug!(backend = self.clipboard.backend(), bytes = text.len(), "copied");
        self.arm_ack();
        Ok(())
    }

    fn arm_ack(&self) {
        let mut timer = self.clear_timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = timer.take() {
            previous.abort();
        }

        self.acknowledged.store(true, Ordering::SeqCst);
        let acknowledged = Arc::clone(&self.acknowledged);
        let window = self.window;
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            acknowledged.store(false, Ordering::SeqCst);
        }));
    }
}

impl<C> Drop for ClipboardExporter<C> {
    fn drop(&mut self) {
        let timer = self.clear_timer.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}
