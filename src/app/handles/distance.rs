use super::{DragPhase, HandleEffect, HandleError, HandleId, HandleKind, HandleLocation, HandleManager};
use crate::core::{GeometryError, GeometryResult, LineSegment, DISTANCE_EPSILON};

/// Abgeleiteter Abstand entlang einer Strecke; Ändern verschiebt den Endpunkt.
#[derive(Debug, Clone)]
pub struct DistanceManipulator {
    id: HandleId,
    segment: LineSegment,
    phase: DragPhase,
    valid: bool,
}

impl DistanceManipulator {
    pub fn new(manager: &mut HandleManager, segment: LineSegment) -> Self {
        Self {
            id: manager.allocate(
                HandleKind::Distance,
                HandleLocation::Other,
                HandleEffect::Geometry,
            ),
            segment,
            phase: DragPhase::Idle,
            valid: true,
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn segment(&self) -> LineSegment {
        self.segment
    }

    /// Gemessener Abstand.
    pub fn distance(&self) -> f64 {
        self.segment.length()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn set_segment(&mut self, segment: LineSegment) {
        self.segment = segment;
        self.valid = true;
    }

    /// Strecke mit gleichem Start und gleicher Richtung, aber Länge `distance`.
    pub fn with_distance(&self, distance: f64) -> GeometryResult<LineSegment> {
        if distance.is_nan() || distance < DISTANCE_EPSILON {
            return Err(GeometryError::NonPositiveParameter {
                name: "distance",
                value: distance,
            });
        }
        let direction = self.segment.direction()?;
        Ok(LineSegment::new(
            self.segment.start,
            self.segment.start + direction * distance,
        ))
    }

    pub fn begin_drag(&mut self) -> Result<(), HandleError> {
        self.phase.begin(self.id)?;
        self.valid = true;
        Ok(())
    }

    /// Übernimmt einen neuen Abstand während des Drags.
    pub fn drag_to(&mut self, segment: LineSegment) -> Result<(), HandleError> {
        self.phase.ensure_dragging(self.id)?;
        self.segment = segment;
        self.valid = true;
        Ok(())
    }

    pub fn mark_invalid(&mut self) {
        self.valid = false;
    }

    pub fn end_drag(&mut self) -> Result<f64, HandleError> {
        self.phase.finish(self.id)?;
        Ok(self.distance())
    }
}
