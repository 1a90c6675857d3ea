// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Dialog button bar.
//!
//! This module provides the buttons at the bottom of the editor dialog:
//! adding a focus point, dismissing and saving.

use crate::wizard::host::{ButtonRole, DialogShell};

/// Display the dialog buttons. Returns the role of the clicked button.
pub fn show(ui: &mut egui::Ui, dialog: &DialogShell, ready: bool) -> Option<ButtonRole> {
    let mut pressed = None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let new_caption = format!("＋ {}", dialog.button_caption(ButtonRole::New));
        if ui.add_enabled(ready, egui::Button::new(new_caption)).clicked() {
            pressed = Some(ButtonRole::New);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let save = egui::Button::new(
                egui::RichText::new(dialog.button_caption(ButtonRole::Save)).strong(),
            );
            if ui.add_enabled(ready, save).clicked() {
                pressed = Some(ButtonRole::Save);
            }
            if ui.button(dialog.button_caption(ButtonRole::Dismiss)).clicked() {
                pressed = Some(ButtonRole::Dismiss);
            }

            if !ready {
                ui.label(egui::RichText::new("Waiting for the image...").italics().weak());
            }
        });
    });

    pressed
}
