// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

/// Maps canvas ids to unique Mermaid identifiers.
///
/// Canvas ids are arbitrary strings; Mermaid ids must be `[A-Za-z0-9_]` and must not collide
/// with keywords such as `end`, hence the `n_` prefix.
#[derive(Debug, Default)]
pub(super) struct IdentAllocator {
    by_canvas_id: BTreeMap<String, String>,
    used: BTreeSet<String>,
}

impl IdentAllocator {
    pub(super) fn assign(&mut self, canvas_id: &str) -> &str {
        if !self.by_canvas_id.contains_key(canvas_id) {
            let base = sanitize_ident(canvas_id);
            let mut ident = base.clone();
            let mut suffix = 2usize;
            while self.used.contains(&ident) {
                ident = format!("{base}_{suffix}");
                suffix += 1;
            }
            self.used.insert(ident.clone());
            self.by_canvas_id.insert(canvas_id.to_owned(), ident);
        }
        &self.by_canvas_id[canvas_id]
    }

    pub(super) fn get(&self, canvas_id: &str) -> Option<&str> {
        self.by_canvas_id.get(canvas_id).map(String::as_str)
    }
}

fn sanitize_ident(canvas_id: &str) -> String {
    let mut ident = String::with_capacity(canvas_id.len() + 2);
    ident.push_str("n_");
    ident.extend(
        canvas_id.chars().map(|ch| if ch.is_ascii_alphanumeric() || ch == '_' { ch } else { '_' }),
    );
    ident
}

/// Escapes text for a quoted Mermaid label (`id["..."]`).
pub(super) fn escape_label(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut lines = text.trim().lines().peekable();
    while let Some(line) = lines.next() {
        for ch in line.chars() {
            match ch {
                '"' => out.push_str("#quot;"),
                '|' => out.push_str("#124;"),
                _ => out.push(ch),
            }
        }
        if lines.peek().is_some() {
            out.push_str("<br>");
        }
    }
    out
}
