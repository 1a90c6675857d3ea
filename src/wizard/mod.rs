// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The focus point editor.
//!
//! `FocuspointWizard` drives one editor session at a time through
//! Closed -> Loading -> Ready -> Closed. The host forwards UI events to it
//! and calls [`FocuspointWizard::poll`] regularly so it can notice the
//! image finishing loading and window resizes.

pub mod host;
pub mod overlay;
pub mod panel;
pub mod session;

use crate::error::WizardError;
use crate::models::config::WizardConfig;
use crate::models::focuspoint::FocuspointId;
use host::{ButtonRole, DialogShell, OpenTrigger, WindowEvents};
use session::WizardSession;
use std::time::Instant;

/// Lifecycle of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    /// No dialog open
    Closed,
    /// Dialog open, waiting for the image to be measurable
    Loading,
    /// Editing
    Ready,
}

/// Focus point editor bound to one host page.
pub struct FocuspointWizard {
    config: WizardConfig,
    events: WindowEvents,
    state: WizardState,
    dialog: Option<DialogShell>,
    session: Option<WizardSession>,
    loading_since: Option<Instant>,
}

impl FocuspointWizard {
    pub fn new(config: WizardConfig, events: WindowEvents) -> Self {
        Self {
            config,
            events,
            state: WizardState::Closed,
            dialog: None,
            session: None,
            loading_since: None,
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    /// Replace the configuration used by the next session.
    pub fn set_config(&mut self, config: WizardConfig) {
        if self.state != WizardState::Closed {
            log::warn!("Configuration changed while the editor is open; applies from the next session");
        }
        self.config = config;
    }

    pub fn dialog(&self) -> Option<&DialogShell> {
        self.dialog.as_ref()
    }

    pub fn session(&self) -> Option<&WizardSession> {
        self.session.as_ref()
    }

    /// Open the editor for the image and field named by `trigger`.
    pub fn open(&mut self, trigger: OpenTrigger, mut dialog: DialogShell) -> Result<(), WizardError> {
        if self.state != WizardState::Closed {
            return Err(WizardError::SessionActive);
        }

        log::info!(
            "Opening focus point editor for {} (field '{}')",
            trigger.image_url,
            trigger.field.id()
        );
        dialog.show(trigger.captions.clone());
        let image = dialog.image().clone();
        self.session = Some(WizardSession::new(trigger, image, self.config.clone()));
        self.dialog = Some(dialog);
        self.state = WizardState::Loading;
        self.loading_since = Some(Instant::now());
        Ok(())
    }

    /// Advance the editor: finish loading once the image is measurable,
    /// give up after the configured timeout, and apply pending resizes.
    pub fn poll(&mut self, now: Instant) -> Result<(), WizardError> {
        match self.state {
            WizardState::Closed => Ok(()),
            WizardState::Loading => {
                let Some(session) = self.session.as_mut() else {
                    self.close();
                    return Err(WizardError::NoSession);
                };

                if session.image().is_measured() {
                    session.initialize(&self.events);
                    self.state = WizardState::Ready;
                    self.loading_since = None;
                    return Ok(());
                }

                if let (Some(timeout), Some(since)) = (self.config.image_load_timeout(), self.loading_since) {
                    let waited = now.saturating_duration_since(since);
                    if waited >= timeout {
                        log::warn!("Image did not load within {:?}, closing the editor", waited);
                        self.close();
                        return Err(WizardError::ImageLoadTimeout { waited });
                    }
                }
                Ok(())
            }
            WizardState::Ready => {
                if let Some(session) = self.session.as_mut() {
                    if session.poll_resize() {
                        log::debug!("Re-placed {} box(es) after resize", session.len());
                    }
                }
                Ok(())
            }
        }
    }

    /// Rebuild the views in place, e.g. after the dialog itself changed
    /// size. Unsaved edits are kept.
    pub fn reinitialize(&mut self) -> Result<(), WizardError> {
        let events = self.events.clone();
        self.ready_session()?.initialize(&events);
        Ok(())
    }

    fn ready_session(&mut self) -> Result<&mut WizardSession, WizardError> {
        match self.state {
            WizardState::Closed => Err(WizardError::NoSession),
            WizardState::Loading => Err(WizardError::NotReady),
            WizardState::Ready => self.session.as_mut().ok_or(WizardError::NoSession),
        }
    }

    /// Dispatch a dialog button.
    pub fn press_button(&mut self, role: ButtonRole) -> Result<(), WizardError> {
        match role {
            ButtonRole::New => self.add_new().map(|_| ()),
            ButtonRole::Save => self.save().map(|_| ()),
            ButtonRole::Dismiss => {
                self.cancel();
                Ok(())
            }
        }
    }

    /// Append a focus point and make it active.
    pub fn add_new(&mut self) -> Result<FocuspointId, WizardError> {
        let session = self.ready_session()?;
        let id = session.add_new();
        session.activate(id)?;
        Ok(id)
    }

    pub fn delete(&mut self, id: FocuspointId) -> Result<(), WizardError> {
        self.ready_session()?.delete(id)
    }

    pub fn activate(&mut self, id: FocuspointId) -> Result<(), WizardError> {
        self.ready_session()?.activate(id)
    }

    pub fn select_panel(&mut self, id: FocuspointId) -> Result<(), WizardError> {
        self.ready_session()?.select_panel(id)
    }

    pub fn edit_field(&mut self, id: FocuspointId, name: &str, value: &str) -> Result<(), WizardError> {
        self.ready_session()?.edit_field(id, name, value)
    }

    /// Pointer pressed on the image; returns the focus point grabbed.
    pub fn press(&mut self, x: f64, y: f64) -> Result<Option<FocuspointId>, WizardError> {
        self.ready_session()?.press(x, y)
    }

    pub fn drag_to(&mut self, x: f64, y: f64) -> Result<(), WizardError> {
        self.ready_session()?.drag_to(x, y);
        Ok(())
    }

    /// Pointer released; stores the geometry of the box that was dragged.
    pub fn release(&mut self) -> Result<Option<FocuspointId>, WizardError> {
        self.ready_session()?.release()
    }

    /// Re-place every box now, without waiting for the resize listener.
    pub fn window_resized(&mut self) -> Result<(), WizardError> {
        self.ready_session()?.relayout();
        Ok(())
    }

    /// Write the focus points into the hidden field and close.
    ///
    /// Returns `false` when no editor was open.
    pub fn save(&mut self) -> Result<bool, WizardError> {
        let session = match self.state {
            WizardState::Closed => {
                log::debug!("Save ignored: editor is closed");
                return Ok(false);
            }
            WizardState::Loading => return Err(WizardError::NotReady),
            WizardState::Ready => self.session.as_ref().ok_or(WizardError::NoSession)?,
        };

        let value = session.serialize()?;
        session.field().set_value(value);
        log::info!(
            "Saved {} focus point(s) to field '{}'",
            session.len(),
            session.field().id()
        );
        self.close();
        Ok(true)
    }

    /// Close without writing anything. Returns `false` when no editor was open.
    pub fn cancel(&mut self) -> bool {
        if self.state == WizardState::Closed {
            log::debug!("Cancel ignored: editor is closed");
            return false;
        }
        log::info!("Focus point editor dismissed, edits discarded");
        self.close();
        true
    }

    fn close(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.hide();
        }
        // Dropping the session unbinds its resize listener
        self.session = None;
        self.dialog = None;
        self.loading_since = None;
        self.state = WizardState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::host::{DisplayedImage, HiddenField};
    use super::*;
    use crate::io::serialization::parse_focuspoints;
    use crate::models::config::{FieldDescriptor, FieldKind};
    use crate::models::focuspoint::Focuspoint;
    use crate::util::geometry::PixelRect;
    use std::time::Duration;

    struct Page {
        wizard: FocuspointWizard,
        events: WindowEvents,
        field: HiddenField,
        image: DisplayedImage,
    }

    impl Page {
        fn new(seed: &str, config: WizardConfig) -> Self {
            let events = WindowEvents::new();
            Self {
                wizard: FocuspointWizard::new(config, events.clone()),
                events,
                field: HiddenField::new("focuspoints", seed),
                image: DisplayedImage::new("image.jpg"),
            }
        }

        fn open(&mut self) {
            let trigger = OpenTrigger::new("image.jpg", self.field.clone());
            let dialog = DialogShell::new(self.image.clone());
            self.wizard.open(trigger, dialog).unwrap();
        }

        fn open_loaded(&mut self, width: f64, height: f64) {
            self.open();
            self.image.set_rendered_size(width, height);
            self.wizard.poll(Instant::now()).unwrap();
            assert_eq!(self.wizard.state(), WizardState::Ready);
        }

        fn session(&self) -> &WizardSession {
            self.wizard.session().unwrap()
        }

        fn active_count(&self) -> usize {
            self.session().overlay().boxes().iter().filter(|b| b.is_active()).count()
        }
    }

    const SEED: &str = r#"[{"x":0.1,"y":0.1,"width":0.2,"height":0.2}]"#;

    #[test]
    fn test_waits_for_image() {
        let mut page = Page::new(SEED, WizardConfig::default());
        page.open();
        assert_eq!(page.wizard.state(), WizardState::Loading);
        assert!(page.wizard.dialog().unwrap().is_visible());

        page.wizard.poll(Instant::now() + Duration::from_secs(3600)).unwrap();
        assert_eq!(page.wizard.state(), WizardState::Loading);
        assert!(matches!(page.wizard.add_new(), Err(WizardError::NotReady)));

        page.image.set_rendered_size(800.0, 600.0);
        page.wizard.poll(Instant::now()).unwrap();
        assert_eq!(page.wizard.state(), WizardState::Ready);
    }

    #[test]
    fn test_load_timeout_closes_editor() {
        let config = WizardConfig {
            image_load_timeout_ms: Some(100),
            ..WizardConfig::default()
        };
        let mut page = Page::new(SEED, config);
        page.open();

        page.wizard.poll(Instant::now()).unwrap();
        let err = page
            .wizard
            .poll(Instant::now() + Duration::from_millis(500))
            .unwrap_err();
        assert!(matches!(err, WizardError::ImageLoadTimeout { .. }));
        assert_eq!(page.wizard.state(), WizardState::Closed);
        assert_eq!(page.field.value(), SEED);
    }

    #[test]
    fn test_open_twice_is_rejected() {
        let mut page = Page::new("", WizardConfig::default());
        page.open();
        let again = page
            .wizard
            .open(OpenTrigger::new("other.jpg", page.field.clone()), DialogShell::new(page.image.clone()));
        assert!(matches!(again, Err(WizardError::SessionActive)));
    }

    #[test]
    fn test_load_and_edit_then_save() {
        let mut page = Page::new(SEED, WizardConfig::default());
        page.open_loaded(1000.0, 500.0);

        let session = page.session();
        assert_eq!(session.overlay().len(), 1);
        assert_eq!(session.panels().len(), 1);
        let id = session.ids()[0];
        assert!(session.overlay().get(id).unwrap().is_active());

        page.wizard.edit_field(id, "width", "0.4").unwrap();
        let point = page.session().get(id).unwrap().clone();
        assert_eq!(point, Focuspoint::new(0.1, 0.1, 0.4, 0.2));

        assert!(page.wizard.save().unwrap());
        assert_eq!(page.field.value(), r#"[{"x":0.1,"y":0.1,"width":0.4,"height":0.2}]"#);
        assert_eq!(page.wizard.state(), WizardState::Closed);
        assert!(page.wizard.session().is_none());
        assert_eq!(page.events.listener_count(), 0);
    }

    #[test]
    fn test_cancel_discards_edits() {
        let mut page = Page::new(SEED, WizardConfig::default());
        page.open_loaded(1000.0, 500.0);
        let id = page.session().ids()[0];
        page.wizard.edit_field(id, "width", "0.4").unwrap();
        page.wizard.add_new().unwrap();

        page.wizard.press_button(ButtonRole::Dismiss).unwrap();
        assert_eq!(page.field.value(), SEED);
        assert_eq!(page.wizard.state(), WizardState::Closed);
        assert_eq!(page.events.listener_count(), 0);

        // The next session starts again from the stored value
        page.open_loaded(1000.0, 500.0);
        assert_eq!(page.session().len(), 1);
        assert_eq!(page.session().focuspoints()[0].width, 0.2);
    }

    #[test]
    fn test_reopen_after_save_reads_saved_value() {
        let mut page = Page::new("", WizardConfig::default());
        page.open_loaded(1000.0, 500.0);
        page.wizard.press_button(ButtonRole::New).unwrap();
        page.wizard.press_button(ButtonRole::Save).unwrap();

        page.open_loaded(1000.0, 500.0);
        assert_eq!(page.session().focuspoints(), vec![Focuspoint::new(0.3, 0.3, 0.3, 0.3)]);
        assert_eq!(page.events.listener_count(), 1);
    }

    #[test]
    fn test_save_and_cancel_when_closed_are_noops() {
        let mut page = Page::new(SEED, WizardConfig::default());
        assert!(!page.wizard.save().unwrap());
        assert!(!page.wizard.cancel());

        page.open_loaded(1000.0, 500.0);
        assert!(page.wizard.save().unwrap());
        assert!(!page.wizard.save().unwrap());
        assert!(!page.wizard.cancel());
        assert_eq!(page.field.value(), SEED);
    }

    #[test]
    fn test_default_new_point() {
        let mut page = Page::new("", WizardConfig::default());
        page.open_loaded(1000.0, 500.0);
        assert_eq!(page.active_count(), 0);

        let id = page.wizard.add_new().unwrap();
        assert_eq!(page.session().get(id), Some(&Focuspoint::new(0.3, 0.3, 0.3, 0.3)));
        assert_eq!(page.session().active(), Some(id));
    }

    #[test]
    fn test_single_active_through_event_sequence() {
        let mut page = Page::new("", WizardConfig::default());
        page.open_loaded(1000.0, 500.0);
        let ids: Vec<_> = (0..4).map(|_| page.wizard.add_new().unwrap()).collect();
        assert_eq!(page.active_count(), 1);

        for id in [ids[0], ids[3], ids[3], ids[1]] {
            page.wizard.activate(id).unwrap();
            assert_eq!(page.active_count(), 1);
        }
        page.wizard.select_panel(ids[2]).unwrap();
        assert_eq!(page.active_count(), 1);
        page.wizard.delete(ids[2]).unwrap();
        assert_eq!(page.active_count(), 1);
        page.wizard.delete(ids[0]).unwrap();
        assert_eq!(page.active_count(), 1);
    }

    #[test]
    fn test_delete_every_index_from_the_end() {
        let seed = r#"[{"x":0,"y":0,"width":0.1,"height":0.1},{"x":0.2,"y":0,"width":0.1,"height":0.1},{"x":0.4,"y":0,"width":0.1,"height":0.1}]"#;
        let mut page = Page::new(seed, WizardConfig::default());
        page.open_loaded(1000.0, 500.0);

        let n = page.session().len();
        for index in (0..n).rev() {
            let id = page.session().ids()[index];
            page.wizard.delete(id).unwrap();
            assert_eq!(page.session().len(), index);
            assert_eq!(page.session().overlay().len(), index);
            assert_eq!(page.session().panels().len(), index);
            let labels: Vec<_> = page.session().overlay().boxes().iter().map(|b| b.label()).collect();
            assert_eq!(labels, (1..=index).collect::<Vec<_>>());
        }
        assert!(page.session().is_empty());
        assert_eq!(page.active_count(), 0);

        page.wizard.save().unwrap();
        assert_eq!(page.field.value(), "[]");
    }

    #[test]
    fn test_deleting_middle_point_keeps_bindings() {
        let seed = r#"[{"x":0,"y":0,"width":0.1,"height":0.1},{"x":0.2,"y":0,"width":0.1,"height":0.1},{"x":0.4,"y":0,"width":0.1,"height":0.1}]"#;
        let config = WizardConfig {
            fields: vec![FieldDescriptor::new("title", "Title", FieldKind::Text)],
            ..WizardConfig::default()
        };
        let mut page = Page::new(seed, config);
        page.open_loaded(1000.0, 500.0);
        let ids = page.session().ids();

        page.wizard.delete(ids[1]).unwrap();
        page.wizard.edit_field(ids[2], "title", "last").unwrap();

        page.wizard.save().unwrap();
        let saved = parse_focuspoints(&page.field.value()).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].field_text("title"), None);
        assert_eq!(saved[1].x, 0.4);
        assert_eq!(saved[1].field_text("title").as_deref(), Some("last"));
    }

    #[test]
    fn test_resize_recompute() {
        let seed = r#"[{"x":0.5,"y":0.5,"width":0.1,"height":0.1}]"#;
        let mut page = Page::new(seed, WizardConfig::default());
        page.open_loaded(1000.0, 500.0);
        let id = page.session().ids()[0];
        assert_eq!(
            page.session().overlay().get(id).unwrap().rect(),
            PixelRect::new(500.0, 250.0, 100.0, 50.0)
        );

        page.image.set_rendered_size(2000.0, 500.0);
        page.events.emit_resize();
        page.wizard.poll(Instant::now()).unwrap();
        assert_eq!(
            page.session().overlay().get(id).unwrap().rect(),
            PixelRect::new(1000.0, 250.0, 200.0, 50.0)
        );
        assert_eq!(page.session().get(id).unwrap().width, 0.1);
    }

    #[test]
    fn test_resize_ignores_unsaved_panel_text() {
        let mut page = Page::new(SEED, WizardConfig::default());
        page.open_loaded(1000.0, 500.0);
        let id = page.session().ids()[0];
        assert!(page.wizard.edit_field(id, "x", "0.").is_ok());
        assert!(page.wizard.edit_field(id, "x", "").is_err());

        page.image.set_rendered_size(500.0, 500.0);
        page.wizard.window_resized().unwrap();
        assert_eq!(page.session().overlay().get(id).unwrap().rect().left, 0.0);
        assert_eq!(page.session().panels().get(id).unwrap().field("x").unwrap().value(), "");
    }

    #[test]
    fn test_drag_then_save() {
        let mut page = Page::new(SEED, WizardConfig::default());
        page.open_loaded(1000.0, 500.0);

        // Box spans 100..300 x 50..150
        let id = page.wizard.press(200.0, 100.0).unwrap().unwrap();
        page.wizard.drag_to(300.0, 150.0).unwrap();
        assert_eq!(page.wizard.release().unwrap(), Some(id));

        page.wizard.save().unwrap();
        assert_eq!(page.field.value(), r#"[{"x":0.2,"y":0.2,"width":0.2,"height":0.2}]"#);
    }

    #[test]
    fn test_reinitialize_keeps_unsaved_edits() {
        let mut page = Page::new(SEED, WizardConfig::default());
        page.open_loaded(1000.0, 500.0);
        page.wizard.add_new().unwrap();
        page.wizard.reinitialize().unwrap();
        assert_eq!(page.session().len(), 2);
        assert_eq!(page.active_count(), 1);
        assert_eq!(page.events.listener_count(), 1);
    }
}
