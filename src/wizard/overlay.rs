// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay boxes drawn on top of the image.
//!
//! One box per focus point. Boxes can be moved and, when enabled, resized
//! through eight handles. Both gestures are contained by the image. While a
//! gesture runs only the box changes; the focus point is written once the
//! gesture stops.

use crate::error::WizardError;
use crate::models::focuspoint::{FocuspointId, Geometry};
use crate::util::geometry::{denormalize_rect, ImageExtent, PixelRect, Size};

/// Distance in pixels within which a pointer grabs an edge or corner.
pub const HANDLE_HIT: f64 = 6.0;

/// Resize handle of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    North,
    East,
    South,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::North,
        Handle::East,
        Handle::South,
        Handle::West,
        Handle::NorthEast,
        Handle::NorthWest,
        Handle::SouthEast,
        Handle::SouthWest,
    ];

    fn moves_left(self) -> bool {
        matches!(self, Handle::West | Handle::NorthWest | Handle::SouthWest)
    }

    fn moves_right(self) -> bool {
        matches!(self, Handle::East | Handle::NorthEast | Handle::SouthEast)
    }

    fn moves_top(self) -> bool {
        matches!(self, Handle::North | Handle::NorthEast | Handle::NorthWest)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Handle::South | Handle::SouthEast | Handle::SouthWest)
    }

    /// Pixel position of the handle on `rect`.
    pub fn anchor(self, rect: &PixelRect) -> (f64, f64) {
        let x = if self.moves_left() {
            rect.left
        } else if self.moves_right() {
            rect.right()
        } else {
            rect.left + rect.width / 2.0
        };
        let y = if self.moves_top() {
            rect.top
        } else if self.moves_bottom() {
            rect.bottom()
        } else {
            rect.top + rect.height / 2.0
        };
        (x, y)
    }

    /// Handle under the pointer, if any. Corners win over edges.
    ///
    /// The grab band shrinks on small boxes so their middle stays movable.
    fn hit(rect: &PixelRect, x: f64, y: f64) -> Option<Handle> {
        let reach = HANDLE_HIT.min(rect.width.min(rect.height) / 4.0);
        let within_y = y >= rect.top - reach && y <= rect.bottom() + reach;
        let within_x = x >= rect.left - reach && x <= rect.right() + reach;
        let left = within_y && (x - rect.left).abs() <= reach;
        let right = within_y && (x - rect.right()).abs() <= reach;
        let top = within_x && (y - rect.top).abs() <= reach;
        let bottom = within_x && (y - rect.bottom()).abs() <= reach;

        match (left, right, top, bottom) {
            (true, _, true, _) => Some(Handle::NorthWest),
            (_, true, true, _) => Some(Handle::NorthEast),
            (true, _, _, true) => Some(Handle::SouthWest),
            (_, true, _, true) => Some(Handle::SouthEast),
            (true, _, _, _) => Some(Handle::West),
            (_, true, _, _) => Some(Handle::East),
            (_, _, true, _) => Some(Handle::North),
            (_, _, _, true) => Some(Handle::South),
            _ => None,
        }
    }
}

/// What a pointer press grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grab {
    Move,
    Resize(Handle),
}

/// Box drawn over the image for one focus point.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBox {
    id: FocuspointId,
    label: usize,
    rect: PixelRect,
    active: bool,
    visible: bool,
}

impl OverlayBox {
    pub fn id(&self) -> FocuspointId {
        self.id
    }

    /// 1-based number shown inside the box.
    pub fn label(&self) -> usize {
        self.label
    }

    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    id: FocuspointId,
    grab: Grab,
    origin_pointer: (f64, f64),
    origin_rect: PixelRect,
}

/// Owns the overlay boxes of a session.
#[derive(Debug)]
pub struct OverlayManager {
    boxes: Vec<OverlayBox>,
    gesture: Option<Gesture>,
    resizable: bool,
    min_size: f64,
}

impl OverlayManager {
    pub fn new(resizable: bool, min_size: f64) -> Self {
        Self {
            boxes: Vec::new(),
            gesture: None,
            resizable,
            min_size,
        }
    }

    pub fn boxes(&self) -> &[OverlayBox] {
        &self.boxes
    }

    pub fn get(&self, id: FocuspointId) -> Option<&OverlayBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    fn get_mut(&mut self, id: FocuspointId) -> Result<&mut OverlayBox, WizardError> {
        self.boxes
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(WizardError::UnknownFocuspoint(id))
    }

    /// Add a box and place it from normalized geometry.
    ///
    /// The box stays hidden until it has its final position.
    pub fn create<I: ImageExtent + ?Sized>(
        &mut self,
        id: FocuspointId,
        label: usize,
        geometry: &Geometry,
        image: &I,
    ) {
        self.boxes.push(OverlayBox {
            id,
            label,
            rect: PixelRect::default(),
            active: false,
            visible: false,
        });
        let created = self.boxes.len() - 1;
        let overlay_box = &mut self.boxes[created];
        overlay_box.rect = denormalize_rect(geometry, image);
        overlay_box.visible = true;
    }

    /// Re-render one box from normalized geometry.
    pub fn place<I: ImageExtent + ?Sized>(
        &mut self,
        id: FocuspointId,
        geometry: &Geometry,
        image: &I,
    ) -> Result<(), WizardError> {
        self.get_mut(id)?.rect = denormalize_rect(geometry, image);
        Ok(())
    }

    /// Mark `id` as the only active box.
    pub fn activate(&mut self, id: FocuspointId) -> Result<(), WizardError> {
        if self.get(id).is_none() {
            return Err(WizardError::UnknownFocuspoint(id));
        }
        for overlay_box in &mut self.boxes {
            overlay_box.active = overlay_box.id == id;
        }
        Ok(())
    }

    /// Remove a box together with any gesture running on it.
    pub fn delete(&mut self, id: FocuspointId) -> Result<OverlayBox, WizardError> {
        let index = self
            .boxes
            .iter()
            .position(|b| b.id == id)
            .ok_or(WizardError::UnknownFocuspoint(id))?;
        if self.gesture.is_some_and(|g| g.id == id) {
            self.gesture = None;
        }
        Ok(self.boxes.remove(index))
    }

    /// Drop every box.
    pub fn clear(&mut self) {
        self.gesture = None;
        self.boxes.clear();
    }

    /// Relabel boxes 1..n following `order`.
    pub fn renumber(&mut self, order: &[FocuspointId]) {
        for overlay_box in &mut self.boxes {
            if let Some(index) = order.iter().position(|id| *id == overlay_box.id) {
                overlay_box.label = index + 1;
            }
        }
    }

    /// Box and grab under a pointer position (image pixels).
    ///
    /// Later boxes are drawn on top, so they are tested first. Only the
    /// active box shows handles, so only it can be resized.
    pub fn grab_at(&self, x: f64, y: f64) -> Option<(FocuspointId, Grab)> {
        self.boxes.iter().rev().filter(|b| b.visible).find_map(|b| {
            if self.resizable && b.active {
                if let Some(handle) = Handle::hit(&b.rect, x, y) {
                    return Some((b.id, Grab::Resize(handle)));
                }
            }
            b.rect.contains(x, y).then_some((b.id, Grab::Move))
        })
    }

    pub fn gesture_target(&self) -> Option<FocuspointId> {
        self.gesture.map(|g| g.id)
    }

    /// Start moving or resizing a box. Resizing non-resizable boxes is ignored.
    pub fn begin_gesture(
        &mut self,
        id: FocuspointId,
        grab: Grab,
        pointer: (f64, f64),
    ) -> Result<bool, WizardError> {
        let rect = self.get_mut(id)?.rect;
        if matches!(grab, Grab::Resize(_)) && !self.resizable {
            log::debug!("Ignoring resize of {}: boxes are not resizable", id);
            return Ok(false);
        }
        self.gesture = Some(Gesture {
            id,
            grab,
            origin_pointer: pointer,
            origin_rect: rect,
        });
        Ok(true)
    }

    /// Follow the pointer with the box under gesture, contained by `container`.
    pub fn update_gesture(&mut self, pointer: (f64, f64), container: Size) {
        let Some(gesture) = self.gesture else {
            return;
        };
        let dx = pointer.0 - gesture.origin_pointer.0;
        let dy = pointer.1 - gesture.origin_pointer.1;

        let rect = match gesture.grab {
            Grab::Move => {
                let mut rect = gesture.origin_rect;
                rect.left += dx;
                rect.top += dy;
                rect.clamp_within(container);
                rect
            }
            Grab::Resize(handle) => resize(gesture.origin_rect, handle, dx, dy, container, self.min_size),
        };

        if let Some(overlay_box) = self.boxes.iter_mut().find(|b| b.id == gesture.id) {
            overlay_box.rect = rect;
        }
    }

    /// Finish the running gesture, returning the box and its final rectangle.
    pub fn end_gesture(&mut self) -> Option<(FocuspointId, PixelRect)> {
        let gesture = self.gesture.take()?;
        self.get(gesture.id).map(|b| (b.id, b.rect))
    }

    /// Abort the running gesture and put the box back where it started.
    pub fn cancel_gesture(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            if let Some(overlay_box) = self.boxes.iter_mut().find(|b| b.id == gesture.id) {
                overlay_box.rect = gesture.origin_rect;
            }
        }
    }
}

/// Move the edges selected by `handle`. Edges never cross: the box keeps at
/// least `min_size` and the moved edges stay inside the container.
fn resize(origin: PixelRect, handle: Handle, dx: f64, dy: f64, container: Size, min_size: f64) -> PixelRect {
    let mut left = origin.left;
    let mut right = origin.right();
    let mut top = origin.top;
    let mut bottom = origin.bottom();

    if handle.moves_left() {
        left = (left + dx).min(right - min_size).max(0.0);
    }
    if handle.moves_right() {
        right = (right + dx).max(left + min_size).min(container.width);
    }
    if handle.moves_top() {
        top = (top + dy).min(bottom - min_size).max(0.0);
    }
    if handle.moves_bottom() {
        bottom = (bottom + dy).max(top + min_size).min(container.height);
    }

    PixelRect::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> FocuspointId {
        FocuspointId::new(raw)
    }

    fn manager_with_box(resizable: bool) -> OverlayManager {
        let mut overlay = OverlayManager::new(resizable, 20.0);
        let image = Size::new(1000.0, 500.0);
        let geometry = Geometry {
            x: 0.1,
            y: 0.2,
            width: 0.2,
            height: 0.4,
        };
        overlay.create(id(1), 1, &geometry, &image);
        overlay
    }

    #[test]
    fn test_create_places_and_reveals() {
        let overlay = manager_with_box(true);
        let created = overlay.get(id(1)).unwrap();
        assert!(created.is_visible());
        assert!(!created.is_active());
        assert_eq!(created.rect(), PixelRect::new(100.0, 100.0, 200.0, 200.0));
    }

    #[test]
    fn test_activate_is_exclusive() {
        let mut overlay = manager_with_box(true);
        let image = Size::new(100.0, 100.0);
        overlay.create(id(2), 2, &Geometry::default(), &image);
        overlay.create(id(3), 3, &Geometry::default(), &image);

        for target in [2, 1, 3, 3, 2] {
            overlay.activate(id(target)).unwrap();
            let active: Vec<_> = overlay.boxes().iter().filter(|b| b.is_active()).map(|b| b.id()).collect();
            assert_eq!(active, vec![id(target)]);
        }

        assert!(matches!(overlay.activate(id(9)), Err(WizardError::UnknownFocuspoint(_))));
    }

    #[test]
    fn test_grab_prefers_handles_on_resizable_boxes() {
        let mut overlay = manager_with_box(true);
        overlay.activate(id(1)).unwrap();
        assert_eq!(overlay.grab_at(150.0, 150.0), Some((id(1), Grab::Move)));
        assert_eq!(overlay.grab_at(100.0, 100.0), Some((id(1), Grab::Resize(Handle::NorthWest))));
        assert_eq!(overlay.grab_at(302.0, 299.0), Some((id(1), Grab::Resize(Handle::SouthEast))));
        assert_eq!(overlay.grab_at(200.0, 300.0), Some((id(1), Grab::Resize(Handle::South))));
        assert_eq!(overlay.grab_at(500.0, 400.0), None);

        let mut fixed = manager_with_box(false);
        fixed.activate(id(1)).unwrap();
        assert_eq!(fixed.grab_at(100.0, 100.0), Some((id(1), Grab::Move)));
    }

    #[test]
    fn test_inactive_boxes_only_move() {
        let mut overlay = manager_with_box(true);
        let image = Size::new(1000.0, 500.0);
        let geometry = Geometry {
            x: 0.5,
            y: 0.2,
            width: 0.2,
            height: 0.4,
        };
        overlay.create(id(2), 2, &geometry, &image);
        overlay.activate(id(1)).unwrap();

        assert_eq!(overlay.grab_at(500.0, 200.0), Some((id(2), Grab::Move)));
        assert_eq!(overlay.grab_at(100.0, 200.0), Some((id(1), Grab::Resize(Handle::West))));
    }

    #[test]
    fn test_small_box_center_moves() {
        let mut overlay = OverlayManager::new(true, 20.0);
        let image = Size::new(1000.0, 500.0);
        let geometry = Geometry {
            x: 0.5,
            y: 0.5,
            width: 0.01,
            height: 0.02,
        };
        overlay.create(id(1), 1, &geometry, &image);
        overlay.activate(id(1)).unwrap();
        assert_eq!(overlay.get(id(1)).unwrap().rect(), PixelRect::new(500.0, 250.0, 10.0, 10.0));

        assert_eq!(overlay.grab_at(505.0, 255.0), Some((id(1), Grab::Move)));
        assert_eq!(overlay.grab_at(500.0, 250.0), Some((id(1), Grab::Resize(Handle::NorthWest))));
    }

    #[test]
    fn test_move_is_contained() {
        let mut overlay = manager_with_box(true);
        let container = Size::new(1000.0, 500.0);
        assert!(overlay.begin_gesture(id(1), Grab::Move, (150.0, 150.0)).unwrap());

        overlay.update_gesture((1500.0, 50.0), container);
        assert_eq!(overlay.get(id(1)).unwrap().rect(), PixelRect::new(800.0, 0.0, 200.0, 200.0));

        let (moved, rect) = overlay.end_gesture().unwrap();
        assert_eq!(moved, id(1));
        assert_eq!(rect, PixelRect::new(800.0, 0.0, 200.0, 200.0));
        assert_eq!(overlay.end_gesture(), None);
    }

    #[test]
    fn test_resize_respects_minimum_and_container() {
        let mut overlay = manager_with_box(true);
        let container = Size::new(1000.0, 500.0);

        overlay.begin_gesture(id(1), Grab::Resize(Handle::SouthEast), (300.0, 300.0)).unwrap();
        overlay.update_gesture((2000.0, 2000.0), container);
        assert_eq!(overlay.get(id(1)).unwrap().rect(), PixelRect::new(100.0, 100.0, 900.0, 400.0));

        overlay.update_gesture((0.0, 0.0), container);
        assert_eq!(overlay.get(id(1)).unwrap().rect(), PixelRect::new(100.0, 100.0, 20.0, 20.0));
        overlay.end_gesture();

        overlay.begin_gesture(id(1), Grab::Resize(Handle::West), (100.0, 110.0)).unwrap();
        overlay.update_gesture((-300.0, 0.0), container);
        assert_eq!(overlay.get(id(1)).unwrap().rect(), PixelRect::new(0.0, 100.0, 120.0, 20.0));
    }

    #[test]
    fn test_resize_ignored_when_not_resizable() {
        let mut overlay = manager_with_box(false);
        let started = overlay
            .begin_gesture(id(1), Grab::Resize(Handle::East), (300.0, 150.0))
            .unwrap();
        assert!(!started);
        assert_eq!(overlay.gesture_target(), None);
    }

    #[test]
    fn test_cancel_gesture_restores_rect() {
        let mut overlay = manager_with_box(true);
        overlay.begin_gesture(id(1), Grab::Move, (150.0, 150.0)).unwrap();
        overlay.update_gesture((250.0, 150.0), Size::new(1000.0, 500.0));
        overlay.cancel_gesture();
        assert_eq!(overlay.get(id(1)).unwrap().rect(), PixelRect::new(100.0, 100.0, 200.0, 200.0));
    }

    #[test]
    fn test_delete_and_renumber() {
        let mut overlay = manager_with_box(true);
        let image = Size::new(100.0, 100.0);
        overlay.create(id(2), 2, &Geometry::default(), &image);
        overlay.create(id(3), 3, &Geometry::default(), &image);
        overlay.begin_gesture(id(2), Grab::Move, (0.0, 0.0)).unwrap();

        let removed = overlay.delete(id(2)).unwrap();
        assert_eq!(removed.id(), id(2));
        assert_eq!(overlay.gesture_target(), None);

        overlay.renumber(&[id(1), id(3)]);
        let labels: Vec<_> = overlay.boxes().iter().map(|b| b.label()).collect();
        assert_eq!(labels, vec![1, 2]);
        assert!(overlay.delete(id(2)).is_err());
    }
}
