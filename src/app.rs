// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The application plays the part of the hosting form: it owns the hidden
//! field with the stored focus points and the image, opens the editor dialog
//! on request and forwards UI events to the `FocuspointWizard`.

use crate::io::media::LoadedImage;
use crate::models::config::WizardConfig;
use crate::ui::{canvas, panels, toolbar};
use crate::wizard::host::{
    ButtonRole, Captions, DialogShell, DisplayedImage, HiddenField, OpenTrigger, WindowEvents,
};
use crate::wizard::{FocuspointWizard, WizardState};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::time::Instant;

/// Main application state.
pub struct FocuspointApp {
    /// The focus point editor
    wizard: FocuspointWizard,

    /// Window events shared with the editor
    events: WindowEvents,

    /// Hidden form field holding the stored value
    field: HiddenField,

    /// Image being edited
    image_path: Option<PathBuf>,

    /// Loaded image texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Image dimensions (width, height)
    image_size: Option<(u32, u32)>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImage, String>>>,

    /// Image element of the open dialog
    displayed_image: Option<DisplayedImage>,

    /// Size the image was last drawn at
    last_rendered: Option<egui::Vec2>,

    /// Dialog texts
    captions: Captions,

    /// Last error or notice shown under the form
    status: Option<String>,
}

impl FocuspointApp {
    /// Create the application with an optional image and stored value.
    pub fn new(config: WizardConfig, image_path: Option<PathBuf>, value: String) -> Self {
        let events = WindowEvents::new();
        let mut app = Self {
            wizard: FocuspointWizard::new(config, events.clone()),
            events,
            field: HiddenField::new("focuspoints", value),
            image_path: None,
            image_texture: None,
            image_size: None,
            image_loader: None,
            displayed_image: None,
            last_rendered: None,
            captions: Captions::default(),
            status: None,
        };
        if let Some(path) = image_path {
            app.load_image_file(path);
        }
        app
    }

    /// Load an image file in the background and remember it for the form.
    pub fn load_image_file(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.image_texture = None;
        self.image_size = None;
        self.image_path = Some(path.clone());

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let result = crate::io::media::load_image(&path)
                .map_err(|e| format!("Failed to load image: {:#}", e));
            if let Ok(ref loaded) = result {
                log::info!("Loaded image: {} ({}x{})", path.display(), loaded.width, loaded.height);
            }
            let _ = sender.send(result);
        });
    }

    /// Open the editor dialog for the current image.
    fn open_editor(&mut self) {
        let Some(path) = self.image_path.as_ref() else {
            self.status = Some("Open an image first".to_string());
            return;
        };

        let url = path.to_string_lossy().to_string();
        let displayed = DisplayedImage::new(url.clone());
        let trigger = OpenTrigger::new(url, self.field.clone()).with_captions(self.captions.clone());

        match self.wizard.open(trigger, DialogShell::new(displayed.clone())) {
            Ok(()) => {
                self.displayed_image = Some(displayed);
                self.last_rendered = None;
                self.status = None;
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn load_config_file(&mut self, path: PathBuf) {
        match crate::io::serialization::load_config(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                self.wizard.set_config(config);
            }
            Err(e) => {
                log::error!("{:#}", e);
                self.status = Some(format!("{:#}", e));
            }
        }
    }

    fn import_value_file(&mut self, path: PathBuf) {
        match crate::io::serialization::import_value(&path) {
            Ok(value) => {
                self.field.set_value(value);
                log::info!("Imported focus points from {}", path.display());
            }
            Err(e) => {
                log::error!("{:#}", e);
                self.status = Some(format!("{:#}", e));
            }
        }
    }

    fn export_value_file(&mut self, path: PathBuf) {
        match crate::io::serialization::export_value(&self.field.value(), &path) {
            Ok(()) => log::info!("Exported focus points to {}", path.display()),
            Err(e) => {
                log::error!("{:#}", e);
                self.status = Some(format!("{:#}", e));
            }
        }
    }

    /// Report the drawn image size to the editor; a change counts as a
    /// window resize.
    fn update_rendered_size(&mut self, size: egui::Vec2) {
        let Some(displayed) = self.displayed_image.as_ref() else {
            return;
        };
        if self.last_rendered == Some(size) {
            return;
        }
        displayed.set_rendered_size(size.x as f64, size.y as f64);
        if self.last_rendered.is_some() {
            self.events.emit_resize();
        }
        self.last_rendered = Some(size);
    }

    fn handle_canvas_action(&mut self, action: canvas::CanvasAction) {
        let result = match action {
            canvas::CanvasAction::None => Ok(()),
            canvas::CanvasAction::Press(x, y) => self.wizard.press(x, y).and_then(|hit| match hit {
                Some(id) => self.wizard.activate(id),
                None => Ok(()),
            }),
            canvas::CanvasAction::Drag(x, y) => self.wizard.drag_to(x, y),
            canvas::CanvasAction::Release => self.wizard.release().map(|_| ()),
            canvas::CanvasAction::Click(x, y) => {
                let hit = self
                    .wizard
                    .session()
                    .and_then(|s| s.overlay().grab_at(x, y))
                    .map(|(id, _)| id);
                match hit {
                    Some(id) => self.wizard.activate(id),
                    None => Ok(()),
                }
            }
        };
        if let Err(e) = result {
            log::warn!("Canvas action failed: {}", e);
        }
    }

    fn handle_panel_action(&mut self, action: panels::PanelAction) {
        let result = match action {
            panels::PanelAction::None => Ok(()),
            panels::PanelAction::Select(id) => self.wizard.select_panel(id),
            panels::PanelAction::Edit { id, name, value } => self.wizard.edit_field(id, &name, &value),
            panels::PanelAction::Delete(id) => self.wizard.delete(id),
        };
        match result {
            // Invalid numbers stay in the input until corrected
            Err(crate::error::WizardError::InvalidNumber { .. }) => {}
            Err(e) => log::warn!("Panel action failed: {}", e),
            Ok(()) => {}
        }
    }

    fn handle_button(&mut self, role: ButtonRole) {
        if let Err(e) = self.wizard.press_button(role) {
            log::error!("{} failed: {}", self.captions_for(role), e);
            self.status = Some(e.to_string());
        }
        if self.wizard.state() == WizardState::Closed {
            self.displayed_image = None;
            self.last_rendered = None;
        }
    }

    fn captions_for(&self, role: ButtonRole) -> &str {
        match role {
            ButtonRole::New => &self.captions.new_point,
            ButtonRole::Save => &self.captions.save,
            ButtonRole::Dismiss => &self.captions.dismiss,
        }
    }

    /// Draw the editor dialog and apply whatever the user did in it.
    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.wizard.dialog() else {
            return;
        };
        if !dialog.is_visible() {
            return;
        }

        let ready = self.wizard.state() == WizardState::Ready;
        let session = self.wizard.session();
        let point_title = self.wizard.config().point_title.clone();

        let mut button = None;
        let mut canvas_output = None;
        let mut panel_action = panels::PanelAction::None;

        egui::Window::new(dialog.captions().title.clone())
            .id(egui::Id::new("focuspoint_dialog"))
            .collapsible(false)
            .resizable(true)
            .default_size([1100.0, 700.0])
            .show(ctx, |ui| {
                egui::TopBottomPanel::bottom("focuspoint_dialog_buttons").show_inside(ui, |ui| {
                    ui.add_space(4.0);
                    button = toolbar::show(ui, dialog, ready);
                    ui.add_space(4.0);
                });

                egui::SidePanel::right("focuspoint_dialog_panels")
                    .default_width(280.0)
                    .show_inside(ui, |ui| {
                        if let Some(session) = session.filter(|_| ready) {
                            panel_action = panels::show(ui, session.panels(), &point_title);
                        }
                    });

                egui::CentralPanel::default().show_inside(ui, |ui| {
                    let overlay = session.filter(|_| ready).map(|s| s.overlay());
                    canvas_output = Some(canvas::show(ui, &self.image_texture, self.image_size, overlay));
                });
            });

        if let Some(output) = canvas_output {
            if let Some(size) = output.rendered_size {
                self.update_rendered_size(size);
            }
            self.handle_canvas_action(output.action);
        }
        self.handle_panel_action(panel_action);
        if let Some(role) = button {
            self.handle_button(role);
        }
    }
}

impl eframe::App for FocuspointApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed image loading
        if let Some(ref receiver) = self.image_loader {
            if let Ok(result) = receiver.try_recv() {
                self.image_loader = None;

                match result {
                    Ok(loaded) => {
                        // Create egui texture from the loaded image data
                        let size = [loaded.width as usize, loaded.height as usize];
                        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                        let texture = ctx.load_texture(
                            "focuspoint_image",
                            color_image,
                            egui::TextureOptions::LINEAR,
                        );
                        self.image_texture = Some(texture);
                        self.image_size = Some((loaded.width, loaded.height));
                    }
                    Err(e) => {
                        log::error!("{}", e);
                        self.status = Some(e);
                    }
                }
            }
        }

        if let Err(e) = self.wizard.poll(Instant::now()) {
            log::error!("{}", e);
            self.status = Some(e.to_string());
        }
        if self.wizard.state() == WizardState::Closed {
            self.displayed_image = None;
        }

        // Keep polling while something is pending
        if self.image_loader.is_some() || self.wizard.state() == WizardState::Loading {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let closed = self.wizard.state() == WizardState::Closed;
                    if ui.add_enabled(closed, egui::Button::new("Open Image...")).clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff", "tif"])
                            .pick_file()
                        {
                            self.load_image_file(path);
                        }
                        ui.close_menu();
                    }
                    if ui.add_enabled(closed, egui::Button::new("Load Configuration...")).clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Configuration", &["yaml", "yml", "json"])
                            .pick_file()
                        {
                            self.load_config_file(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.add_enabled(closed, egui::Button::new("Import Value...")).clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .pick_file()
                        {
                            self.import_value_file(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Export Value...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .set_file_name("focuspoints.json")
                            .save_file()
                        {
                            self.export_value_file(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // The hosting form
        let mut open_requested = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Image focus points");
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label("Image:");
                match &self.image_path {
                    Some(path) => ui.monospace(path.display().to_string()),
                    None => ui.label(egui::RichText::new("none").weak()),
                };
                if self.image_loader.is_some() {
                    ui.spinner();
                }
            });

            ui.add_space(8.0);
            ui.label(format!("Stored value ({}):", self.field.id()));
            let mut value = self.field.value();
            ui.add(
                egui::TextEdit::multiline(&mut value)
                    .code_editor()
                    .desired_rows(6)
                    .desired_width(f32::INFINITY)
                    .interactive(false),
            );

            ui.add_space(8.0);
            let can_open = self.image_path.is_some() && self.wizard.state() == WizardState::Closed;
            if ui
                .add_enabled(can_open, egui::Button::new("✏ Edit focus points"))
                .clicked()
            {
                open_requested = true;
            }

            if let Some(ref status) = self.status {
                ui.add_space(8.0);
                ui.label(egui::RichText::new(status).color(egui::Color32::from_rgb(230, 120, 80)));
            }
        });

        if open_requested {
            self.open_editor();
        }

        self.show_dialog(ctx);

        // Escape dismisses the dialog unless a text field is being edited
        if !ctx.wants_keyboard_input()
            && ctx.input(|i| i.key_pressed(egui::Key::Escape))
            && self.wizard.state() != WizardState::Closed
        {
            self.handle_button(ButtonRole::Dismiss);
        }
    }
}
