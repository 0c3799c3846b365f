//! Polygon-Kontext für Instanzen mit Punktketten-Eingabe (Träger, Polylinien).
//!
//! Jeder Punkt bekommt ein Punkt-Handle, jede Kante ein Strecken-Handle und
//! einen Abstands-Manipulator. Alles liegt in einer Liste von `PolygonVertex`,
//! so dass Punkte und Kanten-Handles nicht auseinanderlaufen können.

use super::{
    expect_distance, expect_line, expect_point, release_handles, subscribe_handles, DragCommit,
    DragInput, DragStatus, ManipulationContext, ManipulationError,
};
use crate::app::handles::{
    ContextId, DistanceManipulator, HandleEffect, HandleId, HandleLocation, HandleManager,
    LineHandle, PointHandle,
};
use crate::app::host::{
    write_and_commit, ComponentInput, InstanceId, InstanceStore, PreviewGraphics,
};
use crate::app::preview::draw_profile_chain;
use crate::core::LineSegment;
use crate::shared::PluginOptions;
use glam::DVec3;

#[derive(Debug)]
struct PolygonEdge {
    line_handle: LineHandle,
    manipulator: DistanceManipulator,
}

#[derive(Debug)]
struct PolygonVertex {
    point_handle: PointHandle,
    /// Kante zum nächsten Punkt, fehlt beim letzten
    outgoing: Option<PolygonEdge>,
}

/// Welches Handle eines Vertex gemeint ist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Point,
    Line,
    Distance,
}

/// Punkt-, Kanten- und Abstands-Handles einer Punktkette.
#[derive(Debug)]
pub struct PolygonManipulationContext {
    id: ContextId,
    instance: InstanceId,
    options: PluginOptions,
    input: ComponentInput,
    vertices: Vec<PolygonVertex>,
    attached: bool,
}

impl PolygonManipulationContext {
    /// Liest die Punktkette und legt alle Handles an.
    pub fn attach(
        id: ContextId,
        store: &dyn InstanceStore,
        manager: &mut HandleManager,
        options: &PluginOptions,
    ) -> Result<Self, ManipulationError> {
        let input = store.input();
        let points = input.points();
        if points.len() < 2 {
            return Err(ManipulationError::TooFewPoints(points.len()));
        }
        let mut context = Self {
            id,
            instance: store.id(),
            options: options.clone(),
            input,
            vertices: Vec::new(),
            attached: true,
        };
        context.build_vertices(manager, &points)?;
        log::debug!(
            "Polygon-Kontext {:?} an {:?} gebunden ({} Punkte)",
            id,
            context.instance,
            points.len()
        );
        Ok(context)
    }

    /// Aktuelle Punkte laut Handles.
    pub fn points(&self) -> Vec<DVec3> {
        self.vertices
            .iter()
            .map(|v| v.point_handle.point())
            .collect()
    }

    /// Handle-ID des Punkts `index`.
    pub fn point_handle(&self, index: usize) -> Option<HandleId> {
        self.vertices.get(index).map(|v| v.point_handle.id())
    }

    /// Handle-ID der Kante `index -> index + 1`.
    pub fn line_handle(&self, index: usize) -> Option<HandleId> {
        self.vertices
            .get(index)
            .and_then(|v| v.outgoing.as_ref())
            .map(|e| e.line_handle.id())
    }

    /// Manipulator-ID der Kante `index -> index + 1`.
    pub fn distance_handle(&self, index: usize) -> Option<HandleId> {
        self.vertices
            .get(index)
            .and_then(|v| v.outgoing.as_ref())
            .map(|e| e.manipulator.id())
    }

    fn build_vertices(
        &mut self,
        manager: &mut HandleManager,
        points: &[DVec3],
    ) -> Result<(), ManipulationError> {
        self.vertices = points
            .iter()
            .enumerate()
            .map(|(i, &point)| {
                let outgoing = points.get(i + 1).map(|&next| {
                    let segment = LineSegment::new(point, next);
                    PolygonEdge {
                        line_handle: LineHandle::new(
                            manager,
                            segment,
                            HandleLocation::MidPoint,
                            HandleEffect::Geometry,
                        ),
                        manipulator: DistanceManipulator::new(manager, segment),
                    }
                });
                PolygonVertex {
                    point_handle: PointHandle::new(
                        manager,
                        point,
                        HandleLocation::InputPoint,
                        HandleEffect::Geometry,
                    ),
                    outgoing,
                }
            })
            .collect();
        subscribe_handles(manager, &self.handles(), self.id)?;
        Ok(())
    }

    fn sync_positions(&mut self, points: &[DVec3]) {
        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            let Some(&point) = points.get(i) else { break };
            vertex.point_handle.set_point(point);
            if let (Some(edge), Some(&next)) = (vertex.outgoing.as_mut(), points.get(i + 1)) {
                let segment = LineSegment::new(point, next);
                edge.line_handle.set_line(segment);
                edge.manipulator.set_segment(segment);
            }
        }
    }

    fn locate(&self, handle: HandleId) -> Result<(usize, Target), ManipulationError> {
        for (i, vertex) in self.vertices.iter().enumerate() {
            if vertex.point_handle.id() == handle {
                return Ok((i, Target::Point));
            }
            if let Some(edge) = &vertex.outgoing {
                if edge.line_handle.id() == handle {
                    return Ok((i, Target::Line));
                }
                if edge.manipulator.id() == handle {
                    return Ok((i, Target::Distance));
                }
            }
        }
        Err(ManipulationError::NotOwned {
            handle,
            context: self.id,
        })
    }

    fn edge_mut(&mut self, index: usize, handle: HandleId) -> Result<&mut PolygonEdge, ManipulationError> {
        let context = self.id;
        self.vertices
            .get_mut(index)
            .and_then(|v| v.outgoing.as_mut())
            .ok_or(ManipulationError::NotOwned { handle, context })
    }

    /// Übernimmt den Vorschlag in das gezogene Handle und liefert die neue Punktkette.
    /// `None`, wenn der Vorschlag degeneriert ist.
    fn apply_proposal(
        &mut self,
        index: usize,
        target: Target,
        handle: HandleId,
        input: DragInput,
    ) -> Result<Option<Vec<DVec3>>, ManipulationError> {
        let mut points = self.points();
        match target {
            Target::Point => {
                let point = expect_point(handle, input)?;
                self.vertices[index].point_handle.drag_to(point)?;
                points[index] = point;
            }
            Target::Line => {
                let line = expect_line(handle, input)?;
                self.edge_mut(index, handle)?.line_handle.drag_to(line)?;
                points[index] = line.start;
                points[index + 1] = line.end;
            }
            Target::Distance => {
                let distance = expect_distance(handle, input)?;
                let edge = self.edge_mut(index, handle)?;
                match edge.manipulator.with_distance(distance) {
                    Ok(segment) => {
                        edge.manipulator.drag_to(segment)?;
                        points[index + 1] = segment.end;
                    }
                    Err(e) => {
                        log::debug!("Abstand {} verworfen: {}", distance, e);
                        edge.manipulator.mark_invalid();
                        return Ok(None);
                    }
                }
            }
        }
        Ok(Some(points))
    }

    fn release(&mut self, manager: &mut HandleManager) {
        release_handles(manager, &self.handles());
        self.vertices.clear();
    }
}

impl ManipulationContext for PolygonManipulationContext {
    fn id(&self) -> ContextId {
        self.id
    }

    fn instance(&self) -> InstanceId {
        self.instance
    }

    fn handles(&self) -> Vec<HandleId> {
        let mut ids = Vec::with_capacity(self.vertices.len() * 3);
        for vertex in &self.vertices {
            ids.push(vertex.point_handle.id());
            if let Some(edge) = &vertex.outgoing {
                ids.push(edge.line_handle.id());
                ids.push(edge.manipulator.id());
            }
        }
        ids
    }

    /// Bei geänderter Punktanzahl werden alle Handles neu angelegt.
    fn update_context(
        &mut self,
        store: &dyn InstanceStore,
        manager: &mut HandleManager,
    ) -> Result<(), ManipulationError> {
        let input = store.input();
        let points = input.points();
        self.input = input;
        if points.len() == self.vertices.len() {
            self.sync_positions(&points);
            return Ok(());
        }

        log::debug!(
            "Polygon-Kontext {:?}: Punktanzahl {} -> {}, Handles neu",
            self.id,
            self.vertices.len(),
            points.len()
        );
        self.release(manager);
        if points.len() < 2 {
            return Err(ManipulationError::TooFewPoints(points.len()));
        }
        self.build_vertices(manager, &points)
    }

    fn on_drag_started(&mut self, handle: HandleId) -> Result<(), ManipulationError> {
        let (index, target) = self.locate(handle)?;
        match target {
            Target::Point => self.vertices[index].point_handle.begin_drag()?,
            Target::Line => self.edge_mut(index, handle)?.line_handle.begin_drag()?,
            Target::Distance => self.edge_mut(index, handle)?.manipulator.begin_drag()?,
        }
        Ok(())
    }

    fn on_drag_ongoing(
        &mut self,
        handle: HandleId,
        input: DragInput,
        graphics: &mut dyn PreviewGraphics,
    ) -> Result<DragStatus, ManipulationError> {
        let (index, target) = self.locate(handle)?;
        let Some(points) = self.apply_proposal(index, target, handle, input)? else {
            return Ok(DragStatus::Invalid);
        };

        graphics.clear();
        draw_profile_chain(
            graphics,
            &self.options.polygon_preview_profile,
            &points,
            DVec3::new(0.0, 0.0, self.options.polygon_preview_offset_z),
            0.0,
        );
        Ok(DragStatus::Valid)
    }

    fn on_drag_ended(
        &mut self,
        handle: HandleId,
        input: DragInput,
        store: &mut dyn InstanceStore,
        graphics: &mut dyn PreviewGraphics,
    ) -> Result<DragCommit, ManipulationError> {
        let (index, target) = self.locate(handle)?;
        let proposal = self.apply_proposal(index, target, handle, input);
        // Drag-Phase endet auch bei ungültigem Endwert
        match target {
            Target::Point => {
                self.vertices[index].point_handle.end_drag()?;
            }
            Target::Line => {
                self.edge_mut(index, handle)?.line_handle.end_drag()?;
            }
            Target::Distance => {
                self.edge_mut(index, handle)?.manipulator.end_drag()?;
            }
        }
        graphics.clear();

        let committed = self.input.points();
        let points = match proposal {
            Ok(Some(points)) => points,
            Ok(None) => {
                self.sync_positions(&committed);
                return Ok(DragCommit::Skipped);
            }
            Err(e) => {
                self.sync_positions(&committed);
                return Err(e);
            }
        };

        let input = self.input.with_points(&points);
        if let Err(e) = write_and_commit(store, &[], Some(input.clone())) {
            self.sync_positions(&committed);
            return Err(e.into());
        }
        log::info!("Instanz {:?}: Punktkette aktualisiert", store.id());

        self.input = input;
        self.sync_positions(&points);
        Ok(DragCommit::Committed)
    }

    fn detach(&mut self, manager: &mut HandleManager) {
        if !self.attached {
            return;
        }
        self.release(manager);
        self.attached = false;
        log::debug!("Polygon-Kontext {:?} abgemeldet", self.id);
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

impl Drop for PolygonManipulationContext {
    fn drop(&mut self) {
        if self.attached {
            log::warn!(
                "Polygon-Kontext {:?} verworfen ohne detach, Handles bleiben registriert",
                self.id
            );
        }
    }
}
