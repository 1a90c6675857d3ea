// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Surfaces provided by the hosting page.
//!
//! The editor never owns these. The host keeps its own clone of each handle
//! and observes what the editor wrote once the dialog closes.

use crate::util::geometry::{Axis, ImageExtent, Size};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// Hidden form field that holds the stored focus point value.
#[derive(Debug, Clone, Default)]
pub struct HiddenField {
    id: String,
    value: Rc<RefCell<String>>,
}

impl HiddenField {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: Rc::new(RefCell::new(value.into())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.borrow_mut() = value.into();
    }
}

/// The image element inside the dialog.
///
/// The host updates the rendered size whenever layout changes; `None`
/// means the image has not been decoded and measured yet.
#[derive(Debug, Clone, Default)]
pub struct DisplayedImage {
    url: String,
    size: Rc<Cell<Option<Size>>>,
}

impl DisplayedImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            size: Rc::new(Cell::new(None)),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_rendered_size(&self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.size.set(Some(Size::new(width, height)));
        } else {
            self.size.set(None);
        }
    }

    pub fn rendered_size(&self) -> Option<Size> {
        self.size.get()
    }

    pub fn is_measured(&self) -> bool {
        self.size.get().is_some()
    }
}

impl ImageExtent for DisplayedImage {
    fn extent(&self, axis: Axis) -> f64 {
        self.size.get().map(|size| size.extent(axis)).unwrap_or(0.0)
    }
}

#[derive(Debug, Default)]
struct Listeners {
    next_id: u64,
    /// Listener id -> resize seen since the listener last checked
    pending: BTreeMap<u64, bool>,
}

/// Window-level events shared by the host and the editor.
#[derive(Debug, Clone, Default)]
pub struct WindowEvents {
    listeners: Rc<RefCell<Listeners>>,
}

impl WindowEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for window resizes until the returned guard is dropped.
    pub fn subscribe_resize(&self) -> ResizeSubscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.pending.insert(id, false);
        log::debug!("Resize listener {} bound", id);

        ResizeSubscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Notify every bound listener that the window was resized.
    pub fn emit_resize(&self) {
        for pending in self.listeners.borrow_mut().pending.values_mut() {
            *pending = true;
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().pending.len()
    }
}

/// A bound resize listener. Dropping it unbinds the listener.
#[derive(Debug)]
pub struct ResizeSubscription {
    id: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl ResizeSubscription {
    /// Consume a pending resize notification.
    pub fn take_pending(&self) -> bool {
        let Some(listeners) = self.listeners.upgrade() else {
            return false;
        };
        let mut listeners = listeners.borrow_mut();
        listeners
            .pending
            .get_mut(&self.id)
            .map(std::mem::take)
            .unwrap_or(false)
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().pending.remove(&self.id);
            log::debug!("Resize listener {} unbound", self.id);
        }
    }
}

/// Localized texts carried by the open trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captions {
    pub title: String,
    pub save: String,
    pub dismiss: String,
    pub new_point: String,
}

impl Default for Captions {
    fn default() -> Self {
        Self {
            title: "Focus points".to_string(),
            save: "Save".to_string(),
            dismiss: "Cancel".to_string(),
            new_point: "New focus point".to_string(),
        }
    }
}

/// Everything the open event hands to the editor.
#[derive(Debug, Clone)]
pub struct OpenTrigger {
    pub image_url: String,
    pub field: HiddenField,
    pub captions: Captions,
}

impl OpenTrigger {
    pub fn new(image_url: impl Into<String>, field: HiddenField) -> Self {
        Self {
            image_url: image_url.into(),
            field,
            captions: Captions::default(),
        }
    }

    pub fn with_captions(mut self, captions: Captions) -> Self {
        self.captions = captions;
        self
    }
}

/// Role of a dialog button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    New,
    Save,
    Dismiss,
}

/// Modal dialog chrome supplied by the host.
#[derive(Debug, Clone)]
pub struct DialogShell {
    image: DisplayedImage,
    captions: Captions,
    visible: bool,
}

impl DialogShell {
    pub fn new(image: DisplayedImage) -> Self {
        Self {
            image,
            captions: Captions::default(),
            visible: false,
        }
    }

    pub fn image(&self) -> &DisplayedImage {
        &self.image
    }

    pub fn captions(&self) -> &Captions {
        &self.captions
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Caption of the button with the given role.
    pub fn button_caption(&self, role: ButtonRole) -> &str {
        match role {
            ButtonRole::New => &self.captions.new_point,
            ButtonRole::Save => &self.captions.save,
            ButtonRole::Dismiss => &self.captions.dismiss,
        }
    }

    pub(crate) fn show(&mut self, captions: Captions) {
        self.captions = captions;
        self.visible = true;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_field_is_shared() {
        let field = HiddenField::new("data-focuspoints", "[]");
        let host_copy = field.clone();
        field.set_value("[{}]");
        assert_eq!(host_copy.value(), "[{}]");
        assert_eq!(host_copy.id(), "data-focuspoints");
    }

    #[test]
    fn test_displayed_image_reads_latest_size() {
        let image = DisplayedImage::new("image.jpg");
        assert!(!image.is_measured());
        assert_eq!(image.extent(Axis::Horizontal), 0.0);

        let host_copy = image.clone();
        host_copy.set_rendered_size(800.0, 600.0);
        assert_eq!(image.extent(Axis::Horizontal), 800.0);
        host_copy.set_rendered_size(400.0, 600.0);
        assert_eq!(image.extent(Axis::Horizontal), 400.0);

        host_copy.set_rendered_size(0.0, 600.0);
        assert!(!image.is_measured());
    }

    #[test]
    fn test_resize_subscription_lifecycle() {
        let events = WindowEvents::new();
        let first = events.subscribe_resize();
        let second = events.subscribe_resize();
        assert_eq!(events.listener_count(), 2);

        assert!(!first.take_pending());
        events.emit_resize();
        assert!(first.take_pending());
        assert!(!first.take_pending());
        assert!(second.take_pending());

        drop(first);
        assert_eq!(events.listener_count(), 1);
        drop(second);
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_hub() {
        let events = WindowEvents::new();
        let subscription = events.subscribe_resize();
        drop(events);
        assert!(!subscription.take_pending());
    }

    #[test]
    fn test_dialog_captions() {
        let mut dialog = DialogShell::new(DisplayedImage::new("a.png"));
        assert!(!dialog.is_visible());
        dialog.show(Captions {
            title: "Fokuspunkte".to_string(),
            save: "Speichern".to_string(),
            dismiss: "Abbrechen".to_string(),
            new_point: "Neu".to_string(),
        });
        assert!(dialog.is_visible());
        assert_eq!(dialog.button_caption(ButtonRole::Save), "Speichern");
        dialog.hide();
        assert!(!dialog.is_visible());
    }
}
