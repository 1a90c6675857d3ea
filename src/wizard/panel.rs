// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Form panels, one per focus point.
//!
//! A panel shows the geometric fields followed by the configured fields.
//! Panels hold the text currently in each input; the focus point itself
//! lives in the session.

use crate::error::WizardError;
use crate::models::config::{FieldDescriptor, FieldKind, SelectOption};
use crate::models::focuspoint::{Focuspoint, FocuspointId, GEOMETRY_FIELDS};

/// One input inside a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelField {
    descriptor: FieldDescriptor,
    value: String,
}

impl PanelField {
    fn populate(descriptor: &FieldDescriptor, point: &Focuspoint) -> Self {
        let stored = point.field_text(&descriptor.name);
        let value = match descriptor.kind {
            // Selects show their first option when nothing matches
            FieldKind::Select => stored
                .filter(|v| descriptor.options.iter().any(|o| &o.value == v))
                .or_else(|| descriptor.options.first().map(|o| o.value.clone()))
                .unwrap_or_default(),
            _ => stored.unwrap_or_default(),
        };
        Self {
            descriptor: descriptor.clone(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn caption(&self) -> &str {
        self.descriptor.caption()
    }

    pub fn kind(&self) -> FieldKind {
        self.descriptor.kind
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.descriptor.options
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_geometry(&self) -> bool {
        Focuspoint::is_geometry_field(&self.descriptor.name)
    }
}

/// Expandable panel of inputs for one focus point.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    id: FocuspointId,
    label: usize,
    expanded: bool,
    visible: bool,
    fields: Vec<PanelField>,
}

impl Panel {
    pub fn id(&self) -> FocuspointId {
        self.id
    }

    /// 1-based number shown in the panel heading.
    pub fn label(&self) -> usize {
        self.label
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn fields(&self) -> &[PanelField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&PanelField> {
        self.fields.iter().find(|f| f.name() == name)
    }
}

/// Ordered list of panels, aligned with the session's focus points.
#[derive(Debug)]
pub struct PanelList {
    descriptors: Vec<FieldDescriptor>,
    panels: Vec<Panel>,
}

impl PanelList {
    /// Panels offer the geometric fields first, then `fields`.
    pub fn new(fields: &[FieldDescriptor]) -> Self {
        let mut descriptors: Vec<FieldDescriptor> =
            GEOMETRY_FIELDS.iter().map(|name| FieldDescriptor::geometry(name)).collect();
        for field in fields {
            if Focuspoint::is_geometry_field(&field.name) {
                log::warn!("Ignoring configured field '{}': reserved for geometry", field.name);
                continue;
            }
            descriptors.push(field.clone());
        }
        Self {
            descriptors,
            panels: Vec::new(),
        }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn get(&self, id: FocuspointId) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    fn get_mut(&mut self, id: FocuspointId) -> Result<&mut Panel, WizardError> {
        self.panels
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(WizardError::UnknownFocuspoint(id))
    }

    /// Append a collapsed panel populated from `point`.
    pub fn create(&mut self, id: FocuspointId, label: usize, point: &Focuspoint) {
        let fields = self
            .descriptors
            .iter()
            .map(|descriptor| PanelField::populate(descriptor, point))
            .collect();
        self.panels.push(Panel {
            id,
            label,
            expanded: false,
            visible: true,
            fields,
        });
    }

    /// Reload the geometric inputs of a panel from `point`.
    pub fn refresh_geometry(&mut self, id: FocuspointId, point: &Focuspoint) -> Result<(), WizardError> {
        let panel = self.get_mut(id)?;
        for field in panel.fields.iter_mut().filter(|f| f.is_geometry()) {
            *field = PanelField::populate(&field.descriptor, point);
        }
        Ok(())
    }

    /// Store the text typed into an input.
    pub fn set_input(&mut self, id: FocuspointId, name: &str, value: &str) -> Result<(), WizardError> {
        let field = self
            .get_mut(id)?
            .fields
            .iter_mut()
            .find(|f| f.name() == name)
            .ok_or_else(|| WizardError::UnknownField {
                field: name.to_string(),
            })?;
        field.value = value.to_string();
        Ok(())
    }

    /// Expand `id` and collapse every other panel.
    pub fn expand_only(&mut self, id: FocuspointId) -> Result<(), WizardError> {
        self.get_mut(id)?;
        for panel in &mut self.panels {
            panel.expanded = panel.id == id;
        }
        Ok(())
    }

    /// Flip the expanded state of one panel.
    pub fn toggle(&mut self, id: FocuspointId) -> Result<(), WizardError> {
        let panel = self.get_mut(id)?;
        panel.expanded = !panel.expanded;
        Ok(())
    }

    pub fn delete(&mut self, id: FocuspointId) -> Result<Panel, WizardError> {
        let index = self
            .panels
            .iter()
            .position(|p| p.id == id)
            .ok_or(WizardError::UnknownFocuspoint(id))?;
        Ok(self.panels.remove(index))
    }

    pub fn clear(&mut self) {
        self.panels.clear();
    }

    /// Relabel panels 1..n following `order`.
    pub fn renumber(&mut self, order: &[FocuspointId]) {
        for panel in &mut self.panels {
            if let Some(index) = order.iter().position(|id| *id == panel.id) {
                panel.label = index + 1;
            }
        }
    }
}
