// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! This module decodes image files into RGBA pixels suitable for display
//! as an egui texture.

use anyhow::{Context, Result};
use std::path::Path;

/// Decoded image ready for upload.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row major
    pub pixels: Vec<u8>,
}

/// Decode an image file.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok(LoadedImage {
        width,
        height,
        pixels: image.into_raw(),
    })
}
