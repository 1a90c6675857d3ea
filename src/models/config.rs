// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.
//!
//! Describes how new focus points are sized, whether boxes can be resized,
//! and which extra fields each focus point panel offers.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum box edge length in pixels while resizing.
pub const DEFAULT_MIN_BOX_SIZE: f64 = 20.0;

/// How a panel field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single line text input
    #[default]
    Text,
    /// Multi line text input
    Textarea,
    /// Choice from a fixed list of options
    Select,
    /// Link target (page or record reference, URL)
    Link,
    /// Numeric input; used for the geometric fields
    Number,
}

/// One entry of a select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    /// Shown to the editor; falls back to the value
    #[serde(default)]
    pub label: String,
}

impl SelectOption {
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.value
        } else {
            &self.label
        }
    }
}

/// Describes one editable attribute of a focus point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Attribute name in the stored record
    pub name: String,
    /// Caption shown next to the input
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "type")]
    pub kind: FieldKind,
    /// Options for select fields
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, title: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            kind,
            options: Vec::new(),
        }
    }

    /// Numeric descriptor for one of the geometric attributes.
    pub fn geometry(name: &str) -> Self {
        let title = match name {
            "x" => "Left",
            "y" => "Top",
            "width" => "Width",
            "height" => "Height",
            other => other,
        };
        Self::new(name, title, FieldKind::Number)
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    /// Caption, falling back to the attribute name.
    pub fn caption(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }
}

/// Editor configuration loaded from YAML or JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Heading of each focus point panel
    #[serde(default = "default_point_title")]
    pub point_title: String,

    /// Allow resizing boxes, not only moving them
    #[serde(default = "default_resizable")]
    pub resizable: bool,

    /// Default width of new focus points (normalized)
    #[serde(default)]
    pub default_width: Option<f64>,

    /// Default height of new focus points (normalized)
    #[serde(default)]
    pub default_height: Option<f64>,

    /// Minimum box size in pixels while resizing
    #[serde(default = "default_min_box_size")]
    pub min_box_size: f64,

    /// Give up waiting for the image after this many milliseconds.
    /// Unset means wait until it loads.
    #[serde(default)]
    pub image_load_timeout_ms: Option<u64>,

    /// Extra fields per focus point
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

fn default_point_title() -> String {
    "Focus point".to_string()
}

fn default_resizable() -> bool {
    true
}

fn default_min_box_size() -> f64 {
    DEFAULT_MIN_BOX_SIZE
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            point_title: default_point_title(),
            resizable: default_resizable(),
            default_width: None,
            default_height: None,
            min_box_size: default_min_box_size(),
            image_load_timeout_ms: None,
            fields: Vec::new(),
        }
    }
}

impl WizardConfig {
    pub fn image_load_timeout(&self) -> Option<Duration> {
        self.image_load_timeout_ms.map(Duration::from_millis)
    }
}
