use super::{DragPhase, HandleEffect, HandleError, HandleId, HandleKind, HandleLocation, HandleManager};
use crate::core::{project_point_to_line, try_normalize, GeometryResult, LineSegment};
use glam::DVec3;

/// Ziehbare Strecke.
#[derive(Debug, Clone)]
pub struct LineHandle {
    id: HandleId,
    line: LineSegment,
    phase: DragPhase,
    valid: bool,
}

impl LineHandle {
    /// Legt das Handle über den Manager an.
    pub fn new(
        manager: &mut HandleManager,
        line: LineSegment,
        location: HandleLocation,
        effect: HandleEffect,
    ) -> Self {
        Self {
            id: manager.allocate(HandleKind::Line, location, effect),
            line,
            phase: DragPhase::Idle,
            valid: true,
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn line(&self) -> LineSegment {
        self.line
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Setzt die Strecke außerhalb eines Drags.
    pub fn set_line(&mut self, line: LineSegment) {
        self.line = line;
        self.valid = true;
    }

    pub fn begin_drag(&mut self) -> Result<(), HandleError> {
        self.phase.begin(self.id)?;
        self.valid = true;
        Ok(())
    }

    pub fn drag_to(&mut self, line: LineSegment) -> Result<(), HandleError> {
        self.phase.ensure_dragging(self.id)?;
        self.line = line;
        self.valid = true;
        Ok(())
    }

    pub fn mark_invalid(&mut self) {
        self.valid = false;
    }

    pub fn end_drag(&mut self) -> Result<LineSegment, HandleError> {
        self.phase.finish(self.id)?;
        Ok(self.line)
    }

    /// Die Strecke parallel verschoben, so dass ihre Gerade den Abstand
    /// `distance` zu `reference` hat. Die Seite bleibt erhalten.
    pub fn placed_at_distance_from(&self, reference: DVec3, distance: f64) -> GeometryResult<LineSegment> {
        let foot = project_point_to_line(reference, self.line.start, self.line.end);
        let current = foot - reference;
        let shift = try_normalize(current)? * distance - current;
        Ok(self.line.translated(shift))
    }

    /// Verschiebt die eigene Strecke auf Abstand `distance` zu `reference`.
    pub fn place_at_distance_from(&mut self, reference: DVec3, distance: f64) -> GeometryResult<()> {
        self.line = self.placed_at_distance_from(reference, distance)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{distance_point_to_line, GeometryError};
    use approx::assert_relative_eq;

    fn handle(line: LineSegment) -> LineHandle {
        let mut manager = HandleManager::new();
        LineHandle::new(&mut manager, line, HandleLocation::MidPoint, HandleEffect::Parameter)
    }

    #[test]
    fn placed_line_keeps_direction_and_side() {
        let h = handle(LineSegment::new(
            DVec3::new(-5.0, -1.0, 0.0),
            DVec3::new(-5.0, 1.0, 0.0),
        ));
        let placed = h
            .placed_at_distance_from(DVec3::ZERO, 8.0)
            .expect("Verschiebung");
        assert_relative_eq!(placed.start.x, -8.0, epsilon = 1e-12);
        assert_relative_eq!(placed.end.x, -8.0, epsilon = 1e-12);
        assert_relative_eq!(placed.start.y, -1.0, epsilon = 1e-12);
        assert_relative_eq!(
            distance_point_to_line(DVec3::ZERO, placed.start, placed.end),
            8.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn line_through_reference_cannot_be_placed() {
        let h = handle(LineSegment::new(DVec3::NEG_Y, DVec3::Y));
        assert!(matches!(
            h.placed_at_distance_from(DVec3::ZERO, 3.0),
            Err(GeometryError::DegenerateDirection { .. })
        ));
    }
}
