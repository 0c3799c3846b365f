//! Rechteck-Kontext: vier Kanten-Handles, symmetrisch um den Schwerpunkt.

use super::{
    commit_attribute, expect_line, release_handles, subscribe_handles, DragCommit, DragInput,
    DragStatus, ManipulationContext, ManipulationError,
};
use crate::app::handles::{ContextId, HandleEffect, HandleId, HandleLocation, HandleManager, LineHandle};
use crate::app::host::{InstanceId, InstanceStore, PreviewGraphics};
use crate::app::preview::draw_polycurve;
use crate::app::section_data::{SectionData, ATTR_RECTANGLE_HEIGHT, ATTR_RECTANGLE_WIDTH};
use crate::core::{
    distance_point_to_line, LineSegment, TransitionGeometry, TransitionParams, DISTANCE_EPSILON,
};
use crate::shared::PluginOptions;

/// Gerade Kante des Rechteckquerschnitts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RectangleEdge {
    Right,
    Top,
    Left,
    Bottom,
}

impl RectangleEdge {
    /// Reihenfolge wie im Rechteckquerschnitt.
    pub const ALL: [RectangleEdge; 4] = [
        RectangleEdge::Right,
        RectangleEdge::Top,
        RectangleEdge::Left,
        RectangleEdge::Bottom,
    ];

    /// Gegenüberliegende Kante.
    pub fn opposite(self) -> Self {
        match self {
            RectangleEdge::Right => RectangleEdge::Left,
            RectangleEdge::Top => RectangleEdge::Bottom,
            RectangleEdge::Left => RectangleEdge::Right,
            RectangleEdge::Bottom => RectangleEdge::Top,
        }
    }

    /// Attribut, das diese Kante steuert.
    pub fn attribute(self) -> &'static str {
        match self {
            RectangleEdge::Right | RectangleEdge::Left => ATTR_RECTANGLE_WIDTH,
            RectangleEdge::Top | RectangleEdge::Bottom => ATTR_RECTANGLE_HEIGHT,
        }
    }

    fn index(self) -> usize {
        match self {
            RectangleEdge::Right => 0,
            RectangleEdge::Top => 1,
            RectangleEdge::Left => 2,
            RectangleEdge::Bottom => 3,
        }
    }

    /// Parameter mit neuer Ausdehnung in Richtung dieser Kante.
    fn resized(self, params: &TransitionParams, extent: f64) -> TransitionParams {
        let mut params = *params;
        match self {
            RectangleEdge::Right | RectangleEdge::Left => params.rectangle_width = extent,
            RectangleEdge::Top | RectangleEdge::Bottom => params.rectangle_height = extent,
        }
        params
    }
}

#[derive(Debug)]
struct EdgeHandle {
    edge: RectangleEdge,
    handle: LineHandle,
}

/// Kanten-Handles eines Übergangsstücks.
#[derive(Debug)]
pub struct RectangleManipulationContext {
    id: ContextId,
    instance: InstanceId,
    options: PluginOptions,
    data: SectionData,
    edges: Vec<EdgeHandle>,
    attached: bool,
}

impl RectangleManipulationContext {
    /// Liest die Instanz, legt vier Kanten-Handles an und abonniert sie.
    pub fn attach(
        id: ContextId,
        store: &dyn InstanceStore,
        manager: &mut HandleManager,
        options: &PluginOptions,
    ) -> Result<Self, ManipulationError> {
        let data = SectionData::fetch(store, options);
        let geometry = data.geometry()?;
        let edges: Vec<EdgeHandle> = RectangleEdge::ALL
            .into_iter()
            .zip(geometry.rectangle_edges())
            .map(|(edge, line)| EdgeHandle {
                edge,
                handle: LineHandle::new(
                    manager,
                    line,
                    HandleLocation::MidPoint,
                    HandleEffect::Parameter,
                ),
            })
            .collect();
        let ids: Vec<HandleId> = edges.iter().map(|e| e.handle.id()).collect();
        subscribe_handles(manager, &ids, id)?;
        log::debug!("Rechteck-Kontext {:?} an {:?} gebunden", id, store.id());

        Ok(Self {
            id,
            instance: store.id(),
            options: options.clone(),
            data,
            edges,
            attached: true,
        })
    }

    /// Aktuelle Lage des Handles einer Kante.
    pub fn edge_line(&self, edge: RectangleEdge) -> Option<LineSegment> {
        self.edges.get(edge.index()).map(|e| e.handle.line())
    }

    /// Handle-ID einer Kante.
    pub fn edge_handle(&self, edge: RectangleEdge) -> Option<HandleId> {
        self.edges.get(edge.index()).map(|e| e.handle.id())
    }

    /// Zuletzt gelesene bzw. geschriebene Parameter.
    pub fn params(&self) -> &TransitionParams {
        &self.data.params
    }

    fn position_of(&self, handle: HandleId) -> Result<usize, ManipulationError> {
        self.edges
            .iter()
            .position(|e| e.handle.id() == handle)
            .ok_or(ManipulationError::NotOwned {
                handle,
                context: self.id,
            })
    }

    /// Legt alle Kanten-Handles auf die Geometrie der aktuellen Parameter.
    fn sync_edges(&mut self) {
        match TransitionGeometry::with_frame(self.data.params, self.data.frame) {
            Ok(geometry) => {
                for (edge, line) in self.edges.iter_mut().zip(geometry.rectangle_edges()) {
                    edge.handle.set_line(line);
                }
            }
            Err(e) => log::warn!("Rechteck-Kontext {:?}: Kanten nicht aktualisiert: {}", self.id, e),
        }
    }

    /// Halbe Ausdehnung: Abstand Schwerpunkt -> gezogene Kante.
    fn proposed_half_extent(&self, line: &LineSegment) -> Option<f64> {
        let half = distance_point_to_line(self.data.frame.origin, line.start, line.end);
        (half >= DISTANCE_EPSILON).then_some(half)
    }
}

impl ManipulationContext for RectangleManipulationContext {
    fn id(&self) -> ContextId {
        self.id
    }

    fn instance(&self) -> InstanceId {
        self.instance
    }

    fn handles(&self) -> Vec<HandleId> {
        self.edges.iter().map(|e| e.handle.id()).collect()
    }

    fn update_context(
        &mut self,
        store: &dyn InstanceStore,
        _manager: &mut HandleManager,
    ) -> Result<(), ManipulationError> {
        let data = SectionData::fetch(store, &self.options);
        let geometry = data.geometry()?;
        for (edge, line) in self.edges.iter_mut().zip(geometry.rectangle_edges()) {
            edge.handle.set_line(line);
        }
        self.data = data;
        Ok(())
    }

    fn on_drag_started(&mut self, handle: HandleId) -> Result<(), ManipulationError> {
        let index = self.position_of(handle)?;
        self.edges[index].handle.begin_drag()?;
        Ok(())
    }

    fn on_drag_ongoing(
        &mut self,
        handle: HandleId,
        input: DragInput,
        graphics: &mut dyn PreviewGraphics,
    ) -> Result<DragStatus, ManipulationError> {
        let index = self.position_of(handle)?;
        let line = expect_line(handle, input)?;
        self.edges[index].handle.drag_to(line)?;

        let edge = self.edges[index].edge;
        let Some(half) = self.proposed_half_extent(&line) else {
            self.edges[index].handle.mark_invalid();
            return Ok(DragStatus::Invalid);
        };
        let params = edge.resized(&self.data.params, 2.0 * half);
        let geometry = match TransitionGeometry::with_frame(params, self.data.frame) {
            Ok(geometry) => geometry,
            Err(e) => {
                log::debug!("Rechteck-Vorschau verworfen: {}", e);
                self.edges[index].handle.mark_invalid();
                return Ok(DragStatus::Invalid);
            }
        };

        let centroid = self.data.frame.origin;
        for i in [index, edge.opposite().index()] {
            if let Err(e) = self.edges[i].handle.place_at_distance_from(centroid, half) {
                log::debug!("Kante {:?} nicht verschiebbar: {}", self.edges[i].edge, e);
            }
        }

        graphics.clear();
        draw_polycurve(graphics, geometry.rectangular_section());
        Ok(DragStatus::Valid)
    }

    fn on_drag_ended(
        &mut self,
        handle: HandleId,
        input: DragInput,
        store: &mut dyn InstanceStore,
        graphics: &mut dyn PreviewGraphics,
    ) -> Result<DragCommit, ManipulationError> {
        let index = self.position_of(handle)?;
        let proposal = expect_line(handle, input).and_then(|line| {
            self.edges[index].handle.drag_to(line)?;
            Ok(line)
        });
        // Drag-Phase endet auch bei ungültigem Endwert
        self.edges[index].handle.end_drag()?;
        graphics.clear();
        let line = match proposal {
            Ok(line) => line,
            Err(e) => {
                self.sync_edges();
                return Err(e);
            }
        };

        let edge = self.edges[index].edge;
        let Some(half) = self.proposed_half_extent(&line) else {
            log::debug!("Kante {:?} auf Schwerpunkt gezogen, keine Änderung", edge);
            self.sync_edges();
            return Ok(DragCommit::Skipped);
        };

        let extent = 2.0 * half;
        if let Err(e) = commit_attribute(store, edge.attribute(), extent) {
            self.sync_edges();
            return Err(e.into());
        }
        self.data.params = edge.resized(&self.data.params, extent);
        self.sync_edges();
        Ok(DragCommit::Committed)
    }

    fn detach(&mut self, manager: &mut HandleManager) {
        if !self.attached {
            return;
        }
        release_handles(manager, &self.handles());
        self.attached = false;
        log::debug!("Rechteck-Kontext {:?} abgemeldet", self.id);
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

impl Drop for RectangleManipulationContext {
    fn drop(&mut self) {
        if self.attached {
            log::warn!(
                "Rechteck-Kontext {:?} verworfen ohne detach, Handles bleiben registriert",
                self.id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::host::memory::{MemoryInstance, RecordingGraphics};
    use crate::app::host::{AttributeValue, ComponentInput};
    use approx::assert_relative_eq;
    use glam::DVec3;

    fn attached() -> (RectangleManipulationContext, HandleManager, MemoryInstance) {
        let store = MemoryInstance::new(
            1,
            ComponentInput::polygon(vec![DVec3::ZERO, DVec3::new(0.0, 0.0, 1000.0)]),
        );
        let mut manager = HandleManager::new();
        let context = RectangleManipulationContext::attach(
            ContextId(1),
            &store,
            &mut manager,
            &PluginOptions::default(),
        )
        .expect("Anbinden");
        (context, manager, store)
    }

    fn top_line_at(y: f64) -> LineSegment {
        LineSegment::new(DVec3::new(1250.0, y, 0.0), DVec3::new(-1250.0, y, 0.0))
    }

    #[test]
    fn dragging_top_edge_mirrors_bottom_edge() {
        let (mut context, mut manager, _store) = attached();
        let mut graphics = RecordingGraphics::default();
        let top = context.edge_handle(RectangleEdge::Top).expect("Handle");

        // h/2 = 3000, Δ = 200
        context.on_drag_started(top).expect("Start");
        let status = context
            .on_drag_ongoing(top, DragInput::Line(top_line_at(3200.0)), &mut graphics)
            .expect("Tick");
        assert_eq!(status, DragStatus::Valid);

        let bottom = context.edge_line(RectangleEdge::Bottom).expect("Kante");
        assert_relative_eq!(bottom.start.y, -3200.0, epsilon = 1e-9);
        assert_relative_eq!(bottom.end.y, -3200.0, epsilon = 1e-9);
        let top_line = context.edge_line(RectangleEdge::Top).expect("Kante");
        assert_relative_eq!(top_line.start.y, 3200.0, epsilon = 1e-9);
        // Seitenkanten bleiben liegen
        let right = context.edge_line(RectangleEdge::Right).expect("Kante");
        assert_relative_eq!(right.start.x, 1500.0, epsilon = 1e-9);
        context.detach(&mut manager);
    }

    #[test]
    fn wrong_input_at_drag_end_still_finishes_drag() {
        let (mut context, mut manager, mut store) = attached();
        let mut graphics = RecordingGraphics::default();
        let right = context.edge_handle(RectangleEdge::Right).expect("Handle");

        context.on_drag_started(right).expect("Start");
        let err = context
            .on_drag_ended(right, DragInput::Point(DVec3::X), &mut store, &mut graphics)
            .expect_err("falsche Art");
        assert!(matches!(err, ManipulationError::UnexpectedInput { .. }));
        context.on_drag_started(right).expect("neuer Drag möglich");
        context.detach(&mut manager);
    }

    #[test]
    fn failed_commit_restores_edges_and_keeps_params() {
        let (mut context, mut manager, mut store) = attached();
        let mut graphics = RecordingGraphics::default();
        let top = context.edge_handle(RectangleEdge::Top).expect("Handle");
        store.fail_modify = true;

        context.on_drag_started(top).expect("Start");
        context
            .on_drag_ongoing(top, DragInput::Line(top_line_at(3500.0)), &mut graphics)
            .expect("Tick");
        let err = context
            .on_drag_ended(top, DragInput::Line(top_line_at(3500.0)), &mut store, &mut graphics)
            .expect_err("Host-Fehler");
        assert!(matches!(err, ManipulationError::Host(_)));

        assert_eq!(context.params().rectangle_height, 6000.0);
        assert_eq!(store.attribute(ATTR_RECTANGLE_HEIGHT), None::<AttributeValue>);
        let bottom = context.edge_line(RectangleEdge::Bottom).expect("Kante");
        assert_relative_eq!(bottom.start.y, -3000.0, epsilon = 1e-9);
        context.detach(&mut manager);
    }
}
