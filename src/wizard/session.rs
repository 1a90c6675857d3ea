// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! State of one open editor.
//!
//! The focus point list is the only source of truth. Overlay boxes and
//! panels are views of it and are updated by the functions below, so every
//! public method leaves all three consistent before returning.

use crate::error::WizardError;
use crate::io::serialization::{parse_focuspoints, serialize_focuspoints};
use crate::models::config::WizardConfig;
use crate::models::focuspoint::{Focuspoint, FocuspointId, Geometry};
use crate::util::geometry::normalize_rect;
use crate::wizard::host::{DisplayedImage, HiddenField, OpenTrigger, ResizeSubscription, WindowEvents};
use crate::wizard::overlay::{Grab, OverlayManager};
use crate::wizard::panel::PanelList;

#[derive(Debug, Clone)]
struct Slot {
    id: FocuspointId,
    point: Focuspoint,
}

/// Transient state from opening the editor until save or cancel.
pub struct WizardSession {
    trigger: OpenTrigger,
    image: DisplayedImage,
    config: WizardConfig,
    /// `None` until the seed has been read
    slots: Option<Vec<Slot>>,
    overlay: OverlayManager,
    panels: PanelList,
    active: Option<FocuspointId>,
    next_id: u64,
    resize_listener: Option<ResizeSubscription>,
}

impl WizardSession {
    pub fn new(trigger: OpenTrigger, image: DisplayedImage, config: WizardConfig) -> Self {
        let overlay = OverlayManager::new(config.resizable, config.min_box_size);
        let panels = PanelList::new(&config.fields);
        Self {
            trigger,
            image,
            config,
            slots: None,
            overlay,
            panels,
            active: None,
            next_id: 0,
            resize_listener: None,
        }
    }

    /// Build the views once the image can be measured.
    ///
    /// The seed is read only the first time; calling this again rebuilds the
    /// views from the in-memory list and keeps unsaved edits.
    pub fn initialize(&mut self, events: &WindowEvents) {
        if self.slots.is_none() {
            let seed = self.trigger.field.value();
            let points = parse_focuspoints(&seed).unwrap_or_else(|e| {
                log::warn!(
                    "Ignoring unreadable focus points in field '{}': {}",
                    self.trigger.field.id(),
                    e
                );
                Vec::new()
            });
            let slots: Vec<Slot> = points
                .into_iter()
                .map(|point| Slot {
                    id: self.allocate_id(),
                    point,
                })
                .collect();
            self.slots = Some(slots);
        }

        self.overlay.clear();
        self.panels.clear();
        self.active = None;
        if let Some(slots) = self.slots.as_ref() {
            for (index, slot) in slots.iter().enumerate() {
                self.overlay.create(slot.id, index + 1, &slot.point.geometry(), &self.image);
                self.panels.create(slot.id, index + 1, &slot.point);
            }
        }

        if let Some(first) = self.slots().first().map(|s| s.id) {
            self.set_active(first);
        }

        // Replace rather than add, so re-initializing never stacks listeners
        self.resize_listener = None;
        self.resize_listener = Some(events.subscribe_resize());

        log::info!("Focus point editor ready with {} point(s)", self.len());
    }

    fn allocate_id(&mut self) -> FocuspointId {
        let id = FocuspointId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn slots(&self) -> &[Slot] {
        self.slots.as_deref().unwrap_or(&[])
    }

    fn slots_mut(&mut self) -> &mut Vec<Slot> {
        self.slots.get_or_insert_with(Vec::new)
    }

    fn slot_mut(&mut self, id: FocuspointId) -> Result<&mut Slot, WizardError> {
        self.slots_mut()
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(WizardError::UnknownFocuspoint(id))
    }

    fn order(&self) -> Vec<FocuspointId> {
        self.slots().iter().map(|s| s.id).collect()
    }

    pub fn trigger(&self) -> &OpenTrigger {
        &self.trigger
    }

    pub fn field(&self) -> &HiddenField {
        &self.trigger.field
    }

    pub fn image(&self) -> &DisplayedImage {
        &self.image
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn overlay(&self) -> &OverlayManager {
        &self.overlay
    }

    pub fn panels(&self) -> &PanelList {
        &self.panels
    }

    pub fn active(&self) -> Option<FocuspointId> {
        self.active
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    /// Ids in serialization order.
    pub fn ids(&self) -> Vec<FocuspointId> {
        self.order()
    }

    pub fn index_of(&self, id: FocuspointId) -> Option<usize> {
        self.slots().iter().position(|s| s.id == id)
    }

    pub fn get(&self, id: FocuspointId) -> Option<&Focuspoint> {
        self.slots().iter().find(|s| s.id == id).map(|s| &s.point)
    }

    /// Focus points in serialization order.
    pub fn focuspoints(&self) -> Vec<Focuspoint> {
        self.slots().iter().map(|s| s.point.clone()).collect()
    }

    pub fn is_listening_for_resize(&self) -> bool {
        self.resize_listener.is_some()
    }

    /// Append a focus point with the configured default geometry.
    pub fn add_new(&mut self) -> FocuspointId {
        let point = Focuspoint::with_default_geometry(self.config.default_width, self.config.default_height);
        let id = self.allocate_id();
        let label = self.len() + 1;

        self.overlay.create(id, label, &point.geometry(), &self.image);
        self.panels.create(id, label, &point);
        self.slots_mut().push(Slot { id, point });

        log::info!("Added focus point {}, total: {}", label, self.len());
        id
    }

    /// Remove a focus point with its box and panel, then renumber the rest.
    ///
    /// When the active point goes, the point now at its position (or the
    /// last one) becomes active.
    pub fn delete(&mut self, id: FocuspointId) -> Result<(), WizardError> {
        let index = self.index_of(id).ok_or(WizardError::UnknownFocuspoint(id))?;
        self.overlay.delete(id)?;
        self.panels.delete(id)?;
        self.slots_mut().remove(index);

        let order = self.order();
        self.overlay.renumber(&order);
        self.panels.renumber(&order);

        if self.active == Some(id) {
            self.active = None;
            if let Some(next) = order.get(index.min(order.len().saturating_sub(1))) {
                self.set_active(*next);
            }
        }

        log::info!("Deleted focus point {}, total: {}", index + 1, self.len());
        Ok(())
    }

    /// Make `id` the single active focus point and open its panel.
    pub fn activate(&mut self, id: FocuspointId) -> Result<(), WizardError> {
        if self.index_of(id).is_none() {
            return Err(WizardError::UnknownFocuspoint(id));
        }
        self.set_active(id);
        Ok(())
    }

    fn set_active(&mut self, id: FocuspointId) {
        // Both views hold `id`: they are built from the same slots
        if self.overlay.activate(id).is_ok() && self.panels.expand_only(id).is_ok() {
            self.active = Some(id);
        }
    }

    /// Panel heading clicked: activate it, or fold it when already active.
    pub fn select_panel(&mut self, id: FocuspointId) -> Result<(), WizardError> {
        if self.active == Some(id) {
            self.panels.toggle(id)
        } else {
            self.activate(id)
        }
    }

    /// Write new geometry into a focus point and re-render both views.
    pub fn set_geometry(&mut self, id: FocuspointId, geometry: Geometry) -> Result<(), WizardError> {
        let slot = self.slot_mut(id)?;
        slot.point.set_geometry(geometry);
        let point = slot.point.clone();
        self.overlay.place(id, &geometry, &self.image)?;
        self.panels.refresh_geometry(id, &point)?;
        Ok(())
    }

    /// Apply text typed into a panel input.
    ///
    /// The input keeps whatever was typed. The focus point only changes when
    /// the text is valid for the field; geometric edits move the box at once.
    pub fn edit_field(&mut self, id: FocuspointId, name: &str, value: &str) -> Result<(), WizardError> {
        self.panels.set_input(id, name, value)?;
        let slot = self.slot_mut(id)?;
        slot.point.set_field(name, value)?;

        if Focuspoint::is_geometry_field(name) {
            let geometry = slot.point.geometry();
            self.overlay.place(id, &geometry, &self.image)?;
        }
        Ok(())
    }

    /// Pointer pressed on the image at pixel position (x, y).
    ///
    /// Returns the focus point hit, after starting a gesture on it.
    pub fn press(&mut self, x: f64, y: f64) -> Result<Option<FocuspointId>, WizardError> {
        let Some((id, grab)) = self.overlay.grab_at(x, y) else {
            return Ok(None);
        };
        self.begin_gesture(id, grab, x, y)?;
        Ok(Some(id))
    }

    pub fn begin_gesture(&mut self, id: FocuspointId, grab: Grab, x: f64, y: f64) -> Result<(), WizardError> {
        if self.overlay.begin_gesture(id, grab, (x, y))? {
            log::debug!("Gesture {:?} started on {}", grab, id);
        }
        Ok(())
    }

    /// Pointer moved while a gesture runs.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        if let Some(container) = self.image.rendered_size() {
            self.overlay.update_gesture((x, y), container);
        }
    }

    /// Gesture stopped: store the box position and size in the focus point.
    pub fn release(&mut self) -> Result<Option<FocuspointId>, WizardError> {
        let Some((id, rect)) = self.overlay.end_gesture() else {
            return Ok(None);
        };
        let geometry = normalize_rect(&rect, &self.image);
        let slot = self.slot_mut(id)?;
        slot.point.set_geometry(geometry);
        let point = slot.point.clone();
        self.panels.refresh_geometry(id, &point)?;

        log::debug!(
            "Focus point {} now at ({:.3}, {:.3}) size {:.3}x{:.3}",
            id,
            geometry.x,
            geometry.y,
            geometry.width,
            geometry.height
        );
        Ok(Some(id))
    }

    /// Re-place every box from its focus point after the image changed size.
    pub fn relayout(&mut self) {
        if let Some(slots) = self.slots.as_ref() {
            for slot in slots {
                if let Err(e) = self.overlay.place(slot.id, &slot.point.geometry(), &self.image) {
                    log::warn!("Could not re-place {}: {}", slot.id, e);
                }
            }
        }
    }

    /// Handle a pending window resize, if one arrived.
    pub fn poll_resize(&mut self) -> bool {
        let pending = self
            .resize_listener
            .as_ref()
            .is_some_and(ResizeSubscription::take_pending);
        if pending {
            self.overlay.cancel_gesture();
            self.relayout();
        }
        pending
    }

    /// Serialized form value of the current list.
    pub fn serialize(&self) -> Result<String, WizardError> {
        Ok(serialize_focuspoints(&self.focuspoints())?)
    }
}
