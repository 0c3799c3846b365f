//! Kreis-Kontext: ein Punkt-Handle auf dem Kreis steuert den Radius.

use super::{
    commit_attribute, expect_point, release_handles, subscribe_handles, DragCommit, DragInput,
    DragStatus, ManipulationContext, ManipulationError,
};
use crate::app::handles::{ContextId, HandleEffect, HandleId, HandleLocation, HandleManager, PointHandle};
use crate::app::host::{InstanceId, InstanceStore, PreviewGraphics};
use crate::app::section_data::{SectionData, ATTR_CIRCLE_RADIUS};
use crate::core::{
    project_point_to_plane, Arc, LineSegment, TransitionGeometry, DISTANCE_EPSILON,
};
use crate::shared::PluginOptions;
use glam::DVec3;

/// Vorgeschlagener Radius samt Richtung vom Mittelpunkt.
#[derive(Debug, Clone, Copy)]
struct RadiusProposal {
    radius: f64,
    direction: DVec3,
}

/// Radius-Handle eines Übergangsstücks.
#[derive(Debug)]
pub struct CircleManipulationContext {
    id: ContextId,
    instance: InstanceId,
    options: PluginOptions,
    center: DVec3,
    normal: DVec3,
    radius: f64,
    /// Handle-Lage außerhalb eines Drags
    rest_point: DVec3,
    handle: PointHandle,
    attached: bool,
}

impl CircleManipulationContext {
    /// Liest die Instanz und legt das Handle auf den Kreis-Startpunkt.
    pub fn attach(
        id: ContextId,
        store: &dyn InstanceStore,
        manager: &mut HandleManager,
        options: &PluginOptions,
    ) -> Result<Self, ManipulationError> {
        let geometry = SectionData::fetch(store, options).geometry()?;
        let rest_point = circle_start(&geometry);
        let handle = PointHandle::new(
            manager,
            rest_point,
            HandleLocation::Other,
            HandleEffect::Parameter,
        );
        subscribe_handles(manager, &[handle.id()], id)?;
        log::debug!("Kreis-Kontext {:?} an {:?} gebunden", id, store.id());

        Ok(Self {
            id,
            instance: store.id(),
            options: options.clone(),
            center: geometry.circle_center(),
            normal: geometry.frame().normal(),
            radius: geometry.params().circle_radius,
            rest_point,
            handle,
            attached: true,
        })
    }

    /// Aktueller Radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Mittelpunkt des Kreisquerschnitts.
    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Position des Radius-Handles.
    pub fn handle_point(&self) -> DVec3 {
        self.handle.point()
    }

    fn ensure_own(&self, handle: HandleId) -> Result<(), ManipulationError> {
        if handle == self.handle.id() {
            Ok(())
        } else {
            Err(ManipulationError::NotOwned {
                handle,
                context: self.id,
            })
        }
    }

    /// Legt das Handle zurück auf den zuletzt festgeschriebenen Kreispunkt.
    fn reset_handle(&mut self) {
        self.handle.set_point(self.rest_point);
    }

    /// Projiziert in die Kreisebene und rundet den Radius.
    fn propose(&self, point: DVec3) -> Option<RadiusProposal> {
        let offset = project_point_to_plane(point, self.center, self.normal) - self.center;
        let raw = offset.length();
        if raw < DISTANCE_EPSILON {
            return None;
        }
        let radius = self.options.round_radius(raw);
        (radius >= DISTANCE_EPSILON).then(|| RadiusProposal {
            radius,
            direction: offset / raw,
        })
    }
}

fn circle_start(geometry: &TransitionGeometry) -> DVec3 {
    geometry
        .circular_section()
        .arcs()
        .next()
        .map(Arc::start)
        .unwrap_or_else(|| geometry.circle_center())
}

impl ManipulationContext for CircleManipulationContext {
    fn id(&self) -> ContextId {
        self.id
    }

    fn instance(&self) -> InstanceId {
        self.instance
    }

    fn handles(&self) -> Vec<HandleId> {
        vec![self.handle.id()]
    }

    fn update_context(
        &mut self,
        store: &dyn InstanceStore,
        _manager: &mut HandleManager,
    ) -> Result<(), ManipulationError> {
        let geometry = SectionData::fetch(store, &self.options).geometry()?;
        self.center = geometry.circle_center();
        self.normal = geometry.frame().normal();
        self.radius = geometry.params().circle_radius;
        self.rest_point = circle_start(&geometry);
        self.handle.set_point(self.rest_point);
        Ok(())
    }

    fn on_drag_started(&mut self, handle: HandleId) -> Result<(), ManipulationError> {
        self.ensure_own(handle)?;
        self.handle.begin_drag()?;
        Ok(())
    }

    fn on_drag_ongoing(
        &mut self,
        handle: HandleId,
        input: DragInput,
        graphics: &mut dyn PreviewGraphics,
    ) -> Result<DragStatus, ManipulationError> {
        self.ensure_own(handle)?;
        let point = expect_point(handle, input)?;
        self.handle.drag_to(point)?;

        let Some(proposal) = self.propose(point) else {
            self.handle.mark_invalid();
            return Ok(DragStatus::Invalid);
        };
        let rim = self.center + proposal.direction * proposal.radius;
        // Handle rastet auf den gerundeten Radius ein
        self.handle.drag_to(rim)?;
        let circle = match Arc::full_circle(self.center, self.normal, rim) {
            Ok(circle) => circle,
            Err(e) => {
                log::debug!("Kreis-Vorschau verworfen: {}", e);
                self.handle.mark_invalid();
                return Ok(DragStatus::Invalid);
            }
        };
        let radial = LineSegment::new(self.center, rim);

        graphics.clear();
        graphics.draw_arc(&circle);
        graphics.draw_line(&radial);
        graphics.draw_text(radial.midpoint(), &format!("r = {}", proposal.radius));
        Ok(DragStatus::Valid)
    }

    fn on_drag_ended(
        &mut self,
        handle: HandleId,
        input: DragInput,
        store: &mut dyn InstanceStore,
        graphics: &mut dyn PreviewGraphics,
    ) -> Result<DragCommit, ManipulationError> {
        self.ensure_own(handle)?;
        let proposal = expect_point(handle, input).and_then(|point| {
            self.handle.drag_to(point)?;
            Ok(point)
        });
        // Drag-Phase endet auch bei ungültigem Endwert
        self.handle.end_drag()?;
        graphics.clear();
        let point = match proposal {
            Ok(point) => point,
            Err(e) => {
                self.reset_handle();
                return Err(e);
            }
        };

        let Some(proposal) = self.propose(point) else {
            log::debug!("Radius-Handle auf Mittelpunkt gezogen, keine Änderung");
            self.reset_handle();
            return Ok(DragCommit::Skipped);
        };

        if let Err(e) = commit_attribute(store, ATTR_CIRCLE_RADIUS, proposal.radius) {
            self.reset_handle();
            return Err(e.into());
        }
        self.radius = proposal.radius;
        self.rest_point = self.center + proposal.direction * proposal.radius;
        self.reset_handle();
        Ok(DragCommit::Committed)
    }

    fn detach(&mut self, manager: &mut HandleManager) {
        if !self.attached {
            return;
        }
        release_handles(manager, &self.handles());
        self.attached = false;
        log::debug!("Kreis-Kontext {:?} abgemeldet", self.id);
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

impl Drop for CircleManipulationContext {
    fn drop(&mut self) {
        if self.attached {
            log::warn!(
                "Kreis-Kontext {:?} verworfen ohne detach, Handle bleibt registriert",
                self.id
            );
        }
    }
}
