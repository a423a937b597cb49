// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Number of color groups a palette carries (JSON Canvas presets `"1"`..`"6"`).
pub const COLOR_GROUP_COUNT: u8 = 6;

const DEFAULT_COLORS: [&str; COLOR_GROUP_COUNT as usize] =
    ["#fb464c", "#e9973f", "#e0de71", "#44cf6e", "#53dfdd", "#a882ff"];

/// Identifies one of the fixed color groups (1-based, like the canvas presets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorGroupId(u8);

impl ColorGroupId {
    pub const FIRST: Self = Self(1);

    pub fn new(value: u8) -> Result<Self, ColorGroupIdError> {
        if (1..=COLOR_GROUP_COUNT).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ColorGroupIdError::OutOfRange { value: value.to_string() })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All group ids in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=COLOR_GROUP_COUNT).map(Self)
    }
}

impl fmt::Display for ColorGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ColorGroupId {
    type Err = ColorGroupIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = trimmed
            .parse::<u8>()
            .map_err(|_| ColorGroupIdError::OutOfRange { value: trimmed.to_owned() })?;
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorGroupIdError {
    #[error("color group must be between 1 and {COLOR_GROUP_COUNT}, got {value:?}")]
    OutOfRange { value: String },
}

/// A committed color: always matches `#rgb` or `#rrggbb`, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexColor(String);

impl HexColor {
    /// Accepts exactly `#rgb` or `#rrggbb`; surrounding whitespace is rejected, not trimmed.
    pub fn parse(candidate: &str) -> Result<Self, InvalidColor> {
        if !hex_color_regex().is_match(candidate) {
            return Err(InvalidColor { candidate: candidate.to_owned() });
        }
        Ok(Self(candidate.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expands the color to its `(r, g, b)` channels.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let digits = &self.0[1..];
        let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);
        if digits.len() == 3 {
            let expand = |idx: usize| {
                let d = &digits[idx..=idx];
                channel(&format!("{d}{d}"))
            };
            (expand(0), expand(1), expand(2))
        } else {
            (channel(&digits[0..2]), channel(&digits[2..4]), channel(&digits[4..6]))
        }
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(format!("#{r:02x}{g:02x}{b:02x}"))
    }

    /// Mixes the color toward white (`amount > 0`) or black (`amount < 0`); `amount` is clamped
    /// to `-1.0..=1.0`.
    pub fn shade(&self, amount: f32) -> Self {
        let amount = amount.clamp(-1.0, 1.0);
        let mix = |channel: u8| {
            let channel = f32::from(channel);
            let target = if amount >= 0.0 { 255.0 } else { 0.0 };
            (channel + (target - channel) * amount.abs()).round().clamp(0.0, 255.0) as u8
        };
        let (r, g, b) = self.rgb();
        Self::from_rgb(mix(r), mix(g), mix(b))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color {candidate:?} (expected #rgb or #rrggbb)")]
pub struct InvalidColor {
    pub candidate: String,
}

fn hex_color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^#([0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$").expect("valid hex color regex")
    })
}

/// Outcome of [`ColorPalette::commit_color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitResult {
    /// The candidate was valid and is now the committed value.
    Accepted { changed: bool },
    /// The candidate was invalid; the group kept its last committed value.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PaletteEntry {
    committed: HexColor,
    draft: Option<String>,
}

/// Color override per group. Every group always carries a committed color.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    entries: BTreeMap<ColorGroupId, PaletteEntry>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        let entries = ColorGroupId::all()
            .zip(DEFAULT_COLORS)
            .map(|(group, color)| {
                (group, PaletteEntry { committed: HexColor(color.to_owned()), draft: None })
            })
            .collect();
        Self { entries }
    }
}

/// Palettes compare by committed colors only; drafts are preview state.
impl PartialEq for ColorPalette {
    fn eq(&self, other: &Self) -> bool {
        self.entries
            .iter()
            .zip(other.entries.iter())
            .all(|((ga, a), (gb, b))| ga == gb && a.committed == b.committed)
    }
}

impl Eq for ColorPalette {}

impl ColorPalette {
    /// Builds a palette from committed colors, falling back to defaults for missing groups.
    pub fn with_colors(colors: impl IntoIterator<Item = (ColorGroupId, HexColor)>) -> Self {
        let mut palette = Self::default();
        for (group, color) in colors {
            palette.entry_mut(group).committed = color;
        }
        palette
    }

    pub fn committed(&self, group: ColorGroupId) -> &HexColor {
        &self.entry(group).committed
    }

    /// The value to show for `group`: the draft while one is being edited.
    pub fn display_color(&self, group: ColorGroupId) -> &str {
        let entry = self.entry(group);
        entry.draft.as_deref().unwrap_or(entry.committed.as_str())
    }

    pub fn draft(&self, group: ColorGroupId) -> Option<&str> {
        self.entry(group).draft.as_deref()
    }

    pub fn has_drafts(&self) -> bool {
        self.entries.values().any(|entry| entry.draft.is_some())
    }

    /// Stores `candidate` as a live-preview draft without validating it.
    pub fn set_color(&mut self, group: ColorGroupId, candidate: impl Into<String>) {
        self.entry_mut(group).draft = Some(candidate.into());
    }

    pub fn commit_color(&mut self, group: ColorGroupId, candidate: &str) -> CommitResult {
        let entry = self.entry_mut(group);
        entry.draft = None;
        match HexColor::parse(candidate) {
            Ok(color) => {
                let changed = entry.committed != color;
                entry.committed = color;
                CommitResult::Accepted { changed }
            }
            Err(err) => {
                tracing::debug!(group = group.get(), %err, "color commit rejected");
                CommitResult::Rejected
            }
        }
    }

    /// Commits the group's current draft, if any.
    pub fn commit_draft(&mut self, group: ColorGroupId) -> Option<CommitResult> {
        let draft = self.entry(group).draft.clone()?;
        Some(self.commit_color(group, &draft))
    }

    pub fn revert_draft(&mut self, group: ColorGroupId) {
        self.entry_mut(group).draft = None;
    }

    /// Committed colors in group order, as passed to the conversion engine.
    pub fn iter(&self) -> impl Iterator<Item = (ColorGroupId, &HexColor)> {
        self.entries.iter().map(|(group, entry)| (*group, &entry.committed))
    }

    /// Copy of the palette with drafts dropped.
    pub fn committed_snapshot(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(group, entry)| {
                (*group, PaletteEntry { committed: entry.committed.clone(), draft: None })
            })
            .collect();
        Self { entries }
    }

    fn entry(&self, group: ColorGroupId) -> &PaletteEntry {
        match self.entries.get(&group) {
            Some(entry) => entry,
            None => unreachable!("palette is seeded with every color group"),
        }
    }

    fn entry_mut(&mut self, group: ColorGroupId) -> &mut PaletteEntry {
        match self.entries.get_mut(&group) {
            Some(entry) => entry,
            None => unreachable!("palette is seeded with every color group"),
        }
    }
}
