// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Focus point data structures.
//!
//! A focus point is a rectangle in normalized image units plus any number of
//! editor-defined attributes. Geometry is written with at most three decimal
//! digits; extra attributes are stored next to it in the same record.

use crate::error::WizardError;
use crate::util::geometry::round_to_thousandths;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Size and position used when no default is configured.
pub const FALLBACK_SIZE: f64 = 0.3;

/// Names of the four geometric attributes, in serialization order.
pub const GEOMETRY_FIELDS: [&str; 4] = ["x", "y", "width", "height"];

/// Stable runtime identity of a focus point within one editor session.
///
/// Never serialized: the stored value identifies points by position only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FocuspointId(u64);

impl FocuspointId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FocuspointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The geometric part of a focus point, in normalized units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A focus area on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Focuspoint {
    #[serde(default, serialize_with = "serialize_rounded", deserialize_with = "deserialize_lenient")]
    pub x: f64,
    #[serde(default, serialize_with = "serialize_rounded", deserialize_with = "deserialize_lenient")]
    pub y: f64,
    #[serde(default, serialize_with = "serialize_rounded", deserialize_with = "deserialize_lenient")]
    pub width: f64,
    #[serde(default, serialize_with = "serialize_rounded", deserialize_with = "deserialize_lenient")]
    pub height: f64,
    /// Editor-defined attributes (link, title, category, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Focuspoint {
    /// Create a focus point with the given geometry and no attributes.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            attributes: Map::new(),
        }
    }

    /// Create the focus point appended by the "new" button.
    ///
    /// The size is the larger of the configured defaults (0.3 when neither is
    /// set). A box of exactly 0.3 sits at (0.3, 0.3); any other size is
    /// centered on the image. Existing configurations depend on this.
    pub fn with_default_geometry(default_width: Option<f64>, default_height: Option<f64>) -> Self {
        let size = match (default_width, default_height) {
            (Some(w), Some(h)) => {
                if w > h {
                    w
                } else {
                    h
                }
            }
            (Some(w), None) => w,
            (None, Some(h)) => h,
            (None, None) => FALLBACK_SIZE,
        };

        let position = if size != FALLBACK_SIZE {
            (1.0 - size) / 2.0
        } else {
            FALLBACK_SIZE
        };

        Self::new(position, position, size, size)
    }

    pub fn geometry(&self) -> Geometry {
        Geometry {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.x = geometry.x;
        self.y = geometry.y;
        self.width = geometry.width;
        self.height = geometry.height;
    }

    /// Check whether `name` is one of the four geometric attributes.
    pub fn is_geometry_field(name: &str) -> bool {
        GEOMETRY_FIELDS.contains(&name)
    }

    /// Text shown in an input bound to `name`, if the attribute is set.
    pub fn field_text(&self, name: &str) -> Option<String> {
        match name {
            "x" => Some(format_fraction(self.x)),
            "y" => Some(format_fraction(self.y)),
            "width" => Some(format_fraction(self.width)),
            "height" => Some(format_fraction(self.height)),
            _ => match self.attributes.get(name)? {
                Value::Null => None,
                Value::String(text) => Some(text.clone()),
                other => Some(other.to_string()),
            },
        }
    }

    /// Write raw input text into the attribute `name`.
    ///
    /// Geometric attributes must parse as numbers; everything else is stored
    /// as given.
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<(), WizardError> {
        let slot = match name {
            "x" => &mut self.x,
            "y" => &mut self.y,
            "width" => &mut self.width,
            "height" => &mut self.height,
            _ => {
                self.attributes
                    .insert(name.to_string(), Value::String(raw.to_string()));
                return Ok(());
            }
        };

        *slot = parse_number(raw).ok_or_else(|| WizardError::InvalidNumber {
            field: name.to_string(),
            value: raw.to_string(),
        })?;
        Ok(())
    }
}

fn format_fraction(value: f64) -> String {
    round_to_thousandths(value).to_string()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn serialize_rounded<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to_thousandths(*value))
}

/// Stored values written by older editors may carry numbers as strings.
///
/// Those editors also stored whatever was left in a cleared input, so blank
/// or unreadable text (and `null`) reads as 0 instead of failing the list.
fn deserialize_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(value)) => Ok(value),
        Some(NumberOrText::Text(text)) => Ok(parse_number(&text).unwrap_or_else(|| {
            if !text.trim().is_empty() {
                log::warn!("Reading unparsable geometry {:?} as 0", text);
            }
            0.0
        })),
        None => Ok(0.0),
    }
}
