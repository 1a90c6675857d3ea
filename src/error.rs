// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for focus point editing.

use crate::models::focuspoint::FocuspointId;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by the focus point editor.
#[derive(Error, Debug)]
pub enum WizardError {
    /// No editor session is open
    #[error("No focus point editor is open")]
    NoSession,

    /// An editor session is already open
    #[error("A focus point editor is already open")]
    SessionActive,

    /// The session is still waiting for its image
    #[error("The focus point editor is still loading its image")]
    NotReady,

    /// Focus point id not part of the current session
    #[error("Unknown focus point: {0}")]
    UnknownFocuspoint(FocuspointId),

    /// Field not offered by the focus point panel
    #[error("Unknown field: {field}")]
    UnknownField {
        /// Name of the field
        field: String,
    },

    /// Geometric field set to something that is not a number
    #[error("Invalid number for '{field}': {value:?}")]
    InvalidNumber {
        /// Name of the field
        field: String,
        /// Text that failed to parse
        value: String,
    },

    /// Image did not become measurable in time
    #[error("Image did not finish loading within {waited:?}")]
    ImageLoadTimeout {
        /// How long the editor waited
        waited: Duration,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
