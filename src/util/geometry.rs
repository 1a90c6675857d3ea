// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the coordinate transform between normalized units
//! (fractions of the displayed image) and absolute pixel units. Every
//! conversion queries the image extent again; nothing is cached, since the
//! displayed image may be resized between two calls.

use crate::models::focuspoint::Geometry;

/// Image axis a value is measured along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Anything with a rendered width and height in pixels.
pub trait ImageExtent {
    /// Current rendered extent along `axis`, in pixels.
    fn extent(&self, axis: Axis) -> f64;
}

/// A fixed pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl ImageExtent for Size {
    fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// Axis-aligned rectangle in pixels, relative to the image's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Check if a pixel position lies inside the rectangle (edges included).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    /// Move the rectangle so it stays inside `0..container` on both axes.
    /// The size is left untouched unless it exceeds the container.
    pub fn clamp_within(&mut self, container: Size) {
        self.width = self.width.min(container.width).max(0.0);
        self.height = self.height.min(container.height).max(0.0);
        self.left = self.left.min(container.width - self.width).max(0.0);
        self.top = self.top.min(container.height - self.height).max(0.0);
    }
}

/// Round to three decimal digits (half away from zero).
pub fn round_to_thousandths(value: f64) -> f64 {
    (value * 1e3).round() / 1e3
}

/// Convert an absolute pixel value to a fraction of the image extent.
pub fn to_relative<I: ImageExtent + ?Sized>(image: &I, axis: Axis, absolute: f64) -> f64 {
    let extent = image.extent(axis);
    if extent <= 0.0 {
        return 0.0;
    }
    round_to_thousandths(absolute / extent)
}

/// Convert a fraction of the image extent to absolute pixels.
pub fn to_absolute<I: ImageExtent + ?Sized>(image: &I, axis: Axis, fraction: f64) -> f64 {
    round_to_thousandths(fraction * image.extent(axis))
}

/// Place normalized geometry on the image.
pub fn denormalize_rect<I: ImageExtent + ?Sized>(geometry: &Geometry, image: &I) -> PixelRect {
    PixelRect {
        left: to_absolute(image, Axis::Horizontal, geometry.x),
        top: to_absolute(image, Axis::Vertical, geometry.y),
        width: to_absolute(image, Axis::Horizontal, geometry.width),
        height: to_absolute(image, Axis::Vertical, geometry.height),
    }
}

/// Measure a pixel rectangle in normalized units of the image.
pub fn normalize_rect<I: ImageExtent + ?Sized>(rect: &PixelRect, image: &I) -> Geometry {
    Geometry {
        x: to_relative(image, Axis::Horizontal, rect.left),
        y: to_relative(image, Axis::Vertical, rect.top),
        width: to_relative(image, Axis::Horizontal, rect.width),
        height: to_relative(image, Axis::Vertical, rect.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_absolute_roundtrip() {
        for extent in [1.0, 37.0, 480.0, 1000.0, 1920.0, 3333.0] {
            let image = Size::new(extent, extent);
            for step in 0..=1000 {
                let fraction = step as f64 / 1000.0;
                let px = to_absolute(&image, Axis::Horizontal, fraction);
                let back = to_relative(&image, Axis::Horizontal, px);
                // One pixel on a tiny image is coarser than a thousandth
                let tolerance = (1.0 / extent).max(0.001) + 1e-9;
                assert!(
                    (back - fraction).abs() <= tolerance,
                    "extent {extent}: {fraction} -> {px} -> {back}"
                );
            }
        }
    }

    #[test]
    fn test_rounding_to_three_decimals() {
        let image = Size::new(300.0, 300.0);
        assert_eq!(to_relative(&image, Axis::Horizontal, 100.0), 0.333);
        assert_eq!(to_relative(&image, Axis::Vertical, 200.0), 0.667);
        assert_eq!(to_absolute(&image, Axis::Horizontal, 0.3333), 99.99);
    }

    #[test]
    fn test_axes_scale_independently() {
        let image = Size::new(1000.0, 500.0);
        let geometry = Geometry {
            x: 0.5,
            y: 0.5,
            width: 0.1,
            height: 0.1,
        };
        let rect = denormalize_rect(&geometry, &image);
        assert_eq!(rect, PixelRect::new(500.0, 250.0, 100.0, 50.0));

        let wider = Size::new(2000.0, 500.0);
        let rect = denormalize_rect(&geometry, &wider);
        assert_eq!(rect, PixelRect::new(1000.0, 250.0, 200.0, 50.0));
        assert_eq!(normalize_rect(&rect, &wider), geometry);
    }

    #[test]
    fn test_unmeasured_image_yields_zero() {
        let image = Size::default();
        assert_eq!(to_relative(&image, Axis::Horizontal, 42.0), 0.0);
        assert_eq!(to_absolute(&image, Axis::Vertical, 0.5), 0.0);
    }

    #[test]
    fn test_clamp_within_container() {
        let container = Size::new(100.0, 50.0);

        let mut rect = PixelRect::new(90.0, -5.0, 20.0, 10.0);
        rect.clamp_within(container);
        assert_eq!(rect, PixelRect::new(80.0, 0.0, 20.0, 10.0));

        let mut oversized = PixelRect::new(10.0, 10.0, 200.0, 80.0);
        oversized.clamp_within(container);
        assert_eq!(oversized, PixelRect::new(0.0, 0.0, 100.0, 50.0));
    }
}
