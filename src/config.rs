// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Startup configuration: palette seed from the environment plus `--color` overrides.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::model::{ColorGroupId, ColorPalette, HexColor, COLOR_GROUP_COUNT};

/// Six comma-separated hex colors seeding groups 1..6.
pub const PALETTE_ENV: &str = "CANVASMAID_PALETTE";
/// `tracing-subscriber` filter directives for headless modes.
pub const LOG_ENV: &str = "CANVASMAID_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid env {name}={value}")]
    InvalidEnv { name: String, value: String },
}

/// A `N=#hex` command-line override for one color group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorOverride {
    pub group: ColorGroupId,
    pub color: HexColor,
}

impl FromStr for ColorOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (group, color) =
            s.split_once('=').ok_or_else(|| format!("expected N=#hex, got {s:?}"))?;
        let group = group.parse::<ColorGroupId>().map_err(|err| err.to_string())?;
        let color = HexColor::parse(color.trim()).map_err(|err| err.to_string())?;
        Ok(Self { group, color })
    }
}

/// Builds the startup palette from [`PALETTE_ENV`] with `overrides` applied on top.
pub fn palette_from_env(overrides: &[ColorOverride]) -> Result<ColorPalette, ConfigError> {
    let seed = match env::var(PALETTE_ENV) {
        Ok(value) => Some(value),
        Err(env::VarError::NotPresent) => None,
        Err(env::VarError::NotUnicode(_)) => {
            return Err(ConfigError::InvalidEnv {
                name: PALETTE_ENV.to_owned(),
                value: "<non-unicode>".to_owned(),
            });
        }
    };
    build_palette(seed.as_deref(), overrides)
}

pub fn build_palette(
    seed: Option<&str>,
    overrides: &[ColorOverride],
) -> Result<ColorPalette, ConfigError> {
    let seeded = match seed.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_palette_csv(value).map_err(|error| ConfigError::InvalidEnv {
            name: PALETTE_ENV.to_owned(),
            value: format!("{value} ({error})"),
        })?,
        None => Vec::new(),
    };

    let colors = ColorGroupId::all()
        .zip(seeded)
        .chain(overrides.iter().map(|entry| (entry.group, entry.color.clone())));
    Ok(ColorPalette::with_colors(colors))
}

fn parse_palette_csv(value: &str) -> Result<Vec<HexColor>, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != usize::from(COLOR_GROUP_COUNT) {
        return Err(format!(
            "expected {COLOR_GROUP_COUNT} comma-separated hex colors (groups 1..{COLOR_GROUP_COUNT}), got {}",
            parts.len()
        ));
    }
    parts.into_iter().map(|part| HexColor::parse(part).map_err(|err| err.to_string())).collect()
}
