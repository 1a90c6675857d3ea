// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image canvas with the focus point overlay.
//!
//! This module draws the image fitted into the dialog, the overlay boxes
//! on top of it, and turns pointer input into canvas actions expressed in
//! image pixels.

use crate::wizard::overlay::{Handle, OverlayBox, OverlayManager};

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    /// Pointer pressed and started dragging at (x, y)
    Press(f64, f64),
    /// Pointer moved while dragging
    Drag(f64, f64),
    /// Drag finished
    Release,
    /// Plain click at (x, y)
    Click(f64, f64),
}

/// What the canvas reports back each frame.
pub struct CanvasOutput {
    pub action: CanvasAction,
    /// Size the image was drawn at, once a texture is available
    pub rendered_size: Option<egui::Vec2>,
}

const HANDLE_SIZE: f32 = 7.0;

/// Display the image and overlay boxes and handle pointer interaction.
pub fn show(
    ui: &mut egui::Ui,
    image_texture: &Option<egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
    overlay: Option<&OverlayManager>,
) -> CanvasOutput {
    let mut output = CanvasOutput {
        action: CanvasAction::None,
        rendered_size: None,
    };

    let (Some(texture), Some((img_width, img_height))) = (image_texture, image_size) else {
        ui.centered_and_justified(|ui| {
            ui.vertical_centered(|ui| {
                ui.spinner();
                ui.label(
                    egui::RichText::new("Loading image...")
                        .color(egui::Color32::from_gray(200)),
                );
            });
        });
        return output;
    };

    // Fit the image into the available space, keeping its aspect ratio
    let available = ui.available_size();
    let img_aspect = img_width as f32 / img_height.max(1) as f32;
    let available_aspect = available.x / available.y.max(1.0);
    let (display_width, display_height) = if img_aspect > available_aspect {
        (available.x, available.x / img_aspect)
    } else {
        (available.y * img_aspect, available.y)
    };

    let (area, _) = ui.allocate_exact_size(available, egui::Sense::hover());
    let image_rect = egui::Rect::from_center_size(
        area.center(),
        egui::vec2(display_width, display_height),
    );
    let response = ui.interact(image_rect, ui.id().with("focuspoint_canvas"), egui::Sense::click_and_drag());
    output.rendered_size = Some(image_rect.size());

    let painter = ui.painter_at(area);
    painter.rect_filled(area, 0.0, egui::Color32::from_gray(40));
    painter.image(
        texture.id(),
        image_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    if let Some(overlay) = overlay {
        for overlay_box in overlay.boxes().iter().filter(|b| b.is_visible()) {
            draw_box(&painter, image_rect, overlay_box, overlay.is_resizable());
        }
    }

    let to_image = |pos: egui::Pos2| {
        (
            (pos.x - image_rect.min.x) as f64,
            (pos.y - image_rect.min.y) as f64,
        )
    };

    if response.drag_started() {
        let origin = ui.input(|i| i.pointer.press_origin());
        if let Some(pos) = origin.or(response.interact_pointer_pos()) {
            let (x, y) = to_image(pos);
            output.action = CanvasAction::Press(x, y);
        }
    } else if response.drag_stopped() {
        output.action = CanvasAction::Release;
    } else if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            let (x, y) = to_image(pos);
            output.action = CanvasAction::Drag(x, y);
        }
    } else if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let (x, y) = to_image(pos);
            output.action = CanvasAction::Click(x, y);
        }
    }

    output
}

/// Draw one overlay box relative to the image rectangle.
fn draw_box(
    painter: &egui::Painter,
    image_rect: egui::Rect,
    overlay_box: &OverlayBox,
    resizable: bool,
) {
    let rect = overlay_box.rect();
    let screen_rect = egui::Rect::from_min_size(
        image_rect.min + egui::vec2(rect.left as f32, rect.top as f32),
        egui::vec2(rect.width as f32, rect.height as f32),
    );

    let (fill, stroke_color) = if overlay_box.is_active() {
        (
            egui::Color32::from_rgba_unmultiplied(255, 200, 0, 50),
            egui::Color32::from_rgb(255, 200, 0),
        )
    } else {
        (
            egui::Color32::from_rgba_unmultiplied(255, 255, 255, 30),
            egui::Color32::WHITE,
        )
    };

    painter.rect_filled(screen_rect, 0.0, fill);
    painter.rect_stroke(screen_rect, 0.0, egui::Stroke::new(2.0, stroke_color));
    painter.text(
        screen_rect.min + egui::vec2(4.0, 2.0),
        egui::Align2::LEFT_TOP,
        overlay_box.label().to_string(),
        egui::FontId::proportional(14.0),
        stroke_color,
    );

    if resizable && overlay_box.is_active() {
        for handle in Handle::ALL {
            let (x, y) = handle.anchor(&rect);
            let center = image_rect.min + egui::vec2(x as f32, y as f32);
            let handle_rect = egui::Rect::from_center_size(center, egui::vec2(HANDLE_SIZE, HANDLE_SIZE));
            painter.rect_filled(handle_rect, 0.0, stroke_color);
            painter.rect_stroke(handle_rect, 0.0, egui::Stroke::new(1.0, egui::Color32::BLACK));
        }
    }
}
