// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Focus point panel list.
//!
//! One collapsible section per focus point with its inputs and a delete
//! button. Edits are reported back as actions; the panel text itself comes
//! from the editor on every frame.

use crate::models::config::FieldKind;
use crate::models::focuspoint::FocuspointId;
use crate::wizard::panel::{Panel, PanelField, PanelList};

/// Result of panel interaction.
pub enum PanelAction {
    None,
    /// Panel heading clicked
    Select(FocuspointId),
    /// Input changed
    Edit {
        id: FocuspointId,
        name: String,
        value: String,
    },
    /// Delete button clicked
    Delete(FocuspointId),
}

/// Display all panels.
pub fn show(ui: &mut egui::Ui, panels: &PanelList, point_title: &str) -> PanelAction {
    let mut action = PanelAction::None;

    if panels.is_empty() {
        ui.label(egui::RichText::new("No focus points yet").italics().weak());
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for panel in panels.panels().iter().filter(|p| p.is_visible()) {
            let panel_action = show_panel(ui, panel, point_title);
            if !matches!(panel_action, PanelAction::None) {
                action = panel_action;
            }
        }
    });

    action
}

fn show_panel(ui: &mut egui::Ui, panel: &Panel, point_title: &str) -> PanelAction {
    let mut action = PanelAction::None;
    let id = panel.id();

    let response = egui::CollapsingHeader::new(format!("{} {}", point_title, panel.label()))
        .id_source(("focuspoint_panel", id.raw()))
        .open(Some(panel.is_expanded()))
        .show(ui, |ui| {
            let mut body_action = PanelAction::None;
            egui::Grid::new(("focuspoint_fields", id.raw()))
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    for field in panel.fields() {
                        ui.label(field.caption());
                        if let Some(value) = show_input(ui, id, field) {
                            body_action = PanelAction::Edit {
                                id,
                                name: field.name().to_string(),
                                value,
                            };
                        }
                        ui.end_row();
                    }
                });

            ui.add_space(4.0);
            if ui.button("🗑 Delete").clicked() {
                body_action = PanelAction::Delete(id);
            }
            body_action
        });

    if response.header_response.clicked() {
        action = PanelAction::Select(id);
    }
    if let Some(body_action) = response.body_returned {
        if !matches!(body_action, PanelAction::None) {
            action = body_action;
        }
    }

    action
}

/// Draw the input for one field; returns the new text when it changed.
fn show_input(ui: &mut egui::Ui, id: FocuspointId, field: &PanelField) -> Option<String> {
    let mut value = field.value().to_string();

    let changed = match field.kind() {
        FieldKind::Text | FieldKind::Link => ui.text_edit_singleline(&mut value).changed(),
        FieldKind::Number => ui
            .add(egui::TextEdit::singleline(&mut value).desired_width(80.0))
            .changed(),
        FieldKind::Textarea => ui
            .add(egui::TextEdit::multiline(&mut value).desired_rows(3))
            .changed(),
        FieldKind::Select => {
            let mut changed = false;
            let selected_label = field
                .options()
                .iter()
                .find(|o| o.value == value)
                .map(|o| o.display_label().to_string())
                .unwrap_or_default();
            egui::ComboBox::from_id_source(("focuspoint_select", id.raw(), field.name()))
                .selected_text(selected_label)
                .show_ui(ui, |ui| {
                    for option in field.options() {
                        if ui
                            .selectable_label(option.value == value, option.display_label())
                            .clicked()
                        {
                            value = option.value.clone();
                            changed = true;
                        }
                    }
                });
            changed
        }
    };

    changed.then_some(value)
}
