//! Manipulations-Feature: verwaltet Kontexte pro Instanz und leitet Drag-Events weiter.

use super::{
    commit_attribute, CircleManipulationContext, DragCommit, DragInput, DragStatus,
    ManipulationContext, ManipulationError, PolygonManipulationContext,
    RectangleManipulationContext,
};
use crate::app::handles::{ContextId, HandleId, HandleManager};
use crate::app::host::{InstanceId, InstanceStore, PreviewGraphics};
use crate::app::section_data::{
    SectionData, ATTR_CIRCLE_RADIUS, ATTR_RECTANGLE_HEIGHT, ATTR_RECTANGLE_WIDTH,
};
use crate::core::{GeometryError, DISTANCE_EPSILON};
use crate::shared::PluginOptions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Direkt editierbares Maß eines Übergangsstücks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueField {
    RectangleWidth,
    RectangleHeight,
    CircleRadius,
}

impl ValueField {
    /// Zugehöriges Instanz-Attribut.
    pub fn attribute(self) -> &'static str {
        match self {
            ValueField::RectangleWidth => ATTR_RECTANGLE_WIDTH,
            ValueField::RectangleHeight => ATTR_RECTANGLE_HEIGHT,
            ValueField::CircleRadius => ATTR_CIRCLE_RADIUS,
        }
    }
}

/// Aktuelle Maße für Eingabefelder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionValues {
    pub rectangle_width: f64,
    pub rectangle_height: f64,
    pub circle_radius: f64,
}

/// Besitzt alle Kontexte und den Handle-Manager; höchstens ein Drag gleichzeitig.
pub struct ManipulationFeature {
    options: PluginOptions,
    handles: HandleManager,
    contexts: IndexMap<ContextId, Box<dyn ManipulationContext>>,
    next_context: u64,
    active_drag: Option<HandleId>,
}

impl ManipulationFeature {
    pub fn new(options: PluginOptions) -> Self {
        Self {
            options,
            handles: HandleManager::new(),
            contexts: IndexMap::new(),
            next_context: 0,
            active_drag: None,
        }
    }

    fn allocate_context_id(&mut self) -> ContextId {
        self.next_context += 1;
        ContextId(self.next_context)
    }

    // ── Anbinden / Lösen ────────────────────────────────────────────

    /// Bindet Rechteck- und Kreis-Kontext an ein Übergangsstück.
    pub fn attach_transition_section(
        &mut self,
        store: &dyn InstanceStore,
    ) -> Result<[ContextId; 2], ManipulationError> {
        let rectangle_id = self.allocate_context_id();
        let rectangle =
            RectangleManipulationContext::attach(rectangle_id, store, &mut self.handles, &self.options)?;
        self.contexts.insert(rectangle_id, Box::new(rectangle));

        let circle_id = self.allocate_context_id();
        match CircleManipulationContext::attach(circle_id, store, &mut self.handles, &self.options) {
            Ok(circle) => {
                self.contexts.insert(circle_id, Box::new(circle));
                log::info!("Übergangsstück {:?} zur Bearbeitung gebunden", store.id());
                Ok([rectangle_id, circle_id])
            }
            Err(e) => {
                self.detach_context(rectangle_id);
                Err(e)
            }
        }
    }

    /// Bindet einen Polygon-Kontext an eine Instanz mit Punktkette.
    pub fn attach_polygon(&mut self, store: &dyn InstanceStore) -> Result<ContextId, ManipulationError> {
        let id = self.allocate_context_id();
        let context = PolygonManipulationContext::attach(id, store, &mut self.handles, &self.options)?;
        self.contexts.insert(id, Box::new(context));
        log::info!("Punktkette {:?} zur Bearbeitung gebunden", store.id());
        Ok(id)
    }

    fn detach_context(&mut self, id: ContextId) -> bool {
        let Some(mut context) = self.contexts.shift_remove(&id) else {
            return false;
        };
        if let Some(active) = self.active_drag {
            if context.handles().contains(&active) {
                log::warn!("Drag auf {:?} durch Lösen von {:?} abgebrochen", active, id);
                self.active_drag = None;
            }
        }
        context.detach(&mut self.handles);
        true
    }

    /// Löst alle Kontexte einer Instanz (abgewählt oder gelöscht).
    pub fn detach_instance(&mut self, instance: InstanceId) -> usize {
        let ids = self.contexts_for(instance);
        ids.into_iter().filter(|&id| self.detach_context(id)).count()
    }

    /// Löst alle Kontexte.
    pub fn detach_all(&mut self) {
        let ids: Vec<ContextId> = self.contexts.keys().copied().collect();
        for id in ids {
            self.detach_context(id);
        }
    }

    /// Leitet alle Kontexte der Instanz neu aus deren Zustand ab.
    pub fn update_contexts(&mut self, store: &dyn InstanceStore) -> Result<(), ManipulationError> {
        for id in self.contexts_for(store.id()) {
            if let Some(context) = self.contexts.get_mut(&id) {
                context.update_context(store, &mut self.handles)?;
            }
        }
        Ok(())
    }

    // ── Drag-Routing ────────────────────────────────────────────────

    fn context_of(&mut self, handle: HandleId) -> Result<&mut Box<dyn ManipulationContext>, ManipulationError> {
        let owner = self
            .handles
            .owner_of(handle)
            .ok_or(ManipulationError::NoContext(handle))?;
        self.contexts
            .get_mut(&owner)
            .ok_or(ManipulationError::NoContext(handle))
    }

    /// DragStarted: wählt die Instanz aus und startet den Drag im Kontext.
    pub fn drag_started(
        &mut self,
        handle: HandleId,
        store: &mut dyn InstanceStore,
    ) -> Result<(), ManipulationError> {
        if let Some(active) = self.active_drag {
            return Err(ManipulationError::DragInProgress {
                active,
                requested: handle,
            });
        }
        let context = self.context_of(handle)?;
        ensure_instance(context.as_ref(), store)?;
        context.on_drag_started(handle)?;
        store.select();
        self.active_drag = Some(handle);
        Ok(())
    }

    /// DragOngoing: nur Vorschau, keine Schreibzugriffe auf die Instanz.
    pub fn drag_ongoing(
        &mut self,
        handle: HandleId,
        input: DragInput,
        graphics: &mut dyn PreviewGraphics,
    ) -> Result<DragStatus, ManipulationError> {
        if self.active_drag != Some(handle) {
            return Err(ManipulationError::NoActiveDrag(handle));
        }
        self.context_of(handle)?.on_drag_ongoing(handle, input, graphics)
    }

    /// DragEnded: validiert und schreibt den Endwert fest.
    pub fn drag_ended(
        &mut self,
        handle: HandleId,
        input: DragInput,
        store: &mut dyn InstanceStore,
        graphics: &mut dyn PreviewGraphics,
    ) -> Result<DragCommit, ManipulationError> {
        if self.active_drag != Some(handle) {
            return Err(ManipulationError::NoActiveDrag(handle));
        }
        let context = self.context_of(handle)?;
        // Fremde Instanz: Drag bleibt aktiv, das Ende kann erneut gemeldet werden
        ensure_instance(context.as_ref(), store)?;
        let result = context.on_drag_ended(handle, input, store, graphics);
        self.active_drag = None;
        result
    }

    // ── Werte ───────────────────────────────────────────────────────

    /// Liest die aktuellen Maße einer Instanz.
    pub fn current_values(&self, store: &dyn InstanceStore) -> TransitionValues {
        let params = SectionData::fetch(store, &self.options).params;
        TransitionValues {
            rectangle_width: params.rectangle_width,
            rectangle_height: params.rectangle_height,
            circle_radius: params.circle_radius,
        }
    }

    /// Schreibt ein einzelnes Maß und aktualisiert die Kontexte der Instanz.
    pub fn apply_value(
        &mut self,
        store: &mut dyn InstanceStore,
        field: ValueField,
        value: f64,
    ) -> Result<(), ManipulationError> {
        if value.is_nan() || value < DISTANCE_EPSILON {
            return Err(GeometryError::NonPositiveParameter {
                name: field.attribute(),
                value,
            }
            .into());
        }
        commit_attribute(store, field.attribute(), value)?;
        self.update_contexts(store)
    }

    // ── Abfragen ────────────────────────────────────────────────────

    /// Kontexte einer Instanz in Anbinde-Reihenfolge.
    pub fn contexts_for(&self, instance: InstanceId) -> Vec<ContextId> {
        self.contexts
            .iter()
            .filter(|(_, context)| context.instance() == instance)
            .map(|(&id, _)| id)
            .collect()
    }

    /// Handles eines Kontexts.
    pub fn handles_of(&self, context: ContextId) -> Vec<HandleId> {
        self.contexts
            .get(&context)
            .map(|c| c.handles())
            .unwrap_or_default()
    }

    /// Handle-Register (z.B. für Leck-Prüfungen).
    pub fn handle_manager(&self) -> &HandleManager {
        &self.handles
    }

    /// Laufender Drag.
    pub fn active_drag(&self) -> Option<HandleId> {
        self.active_drag
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }
}

impl Drop for ManipulationFeature {
    fn drop(&mut self) {
        self.detach_all();
    }
}

fn ensure_instance(
    context: &dyn ManipulationContext,
    store: &dyn InstanceStore,
) -> Result<(), ManipulationError> {
    if context.instance() == store.id() {
        Ok(())
    } else {
        Err(ManipulationError::WrongInstance {
            expected: context.instance(),
            actual: store.id(),
        })
    }
}
