// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Focus point value and configuration serialization.
//!
//! The form value is a JSON array of focus point records. Configuration
//! files are read as YAML or JSON depending on their extension.

use crate::models::{config::WizardConfig, focuspoint::Focuspoint};
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Parse a stored form value. Empty, blank or `null` values hold no points.
pub fn parse_focuspoints(value: &str) -> serde_json::Result<Vec<Focuspoint>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Vec::new());
    }
    let points: Option<Vec<Focuspoint>> = serde_json::from_str(value)?;
    Ok(points.unwrap_or_default())
}

/// Serialize focus points into the stored form value.
pub fn serialize_focuspoints(points: &[Focuspoint]) -> serde_json::Result<String> {
    serde_json::to_string(points)
}

/// Import editor configuration from YAML format.
pub fn import_config_yaml(path: &Path) -> Result<WizardConfig> {
    let yaml = std::fs::read_to_string(path)?;
    let config = serde_yaml::from_str(&yaml)?;
    Ok(config)
}

/// Import editor configuration from JSON format.
pub fn import_config_json(path: &Path) -> Result<WizardConfig> {
    let json = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&json)?;
    Ok(config)
}

/// Import editor configuration, picking the format from the extension.
pub fn load_config(path: &Path) -> Result<WizardConfig> {
    let extension = path.extension().and_then(|s| s.to_str());
    let config = match extension {
        Some("yaml") | Some("yml") => import_config_yaml(path),
        Some("json") => import_config_json(path),
        _ => bail!("Unsupported configuration extension: {:?}", extension),
    };
    config.with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Read a stored form value from a file, checking that it parses.
pub fn import_value(path: &Path) -> Result<String> {
    let value = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_focuspoints(&value)
        .with_context(|| format!("Invalid focus point value in {}", path.display()))?;
    Ok(value.trim().to_string())
}

/// Write the stored form value to a file.
pub fn export_value(value: &str, path: &Path) -> Result<()> {
    std::fs::write(path, value)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
