use super::{DragPhase, HandleEffect, HandleError, HandleId, HandleKind, HandleLocation, HandleManager};
use glam::DVec3;

/// Ziehbarer Punkt.
#[derive(Debug, Clone)]
pub struct PointHandle {
    id: HandleId,
    point: DVec3,
    phase: DragPhase,
    valid: bool,
}

impl PointHandle {
    /// Legt das Handle über den Manager an.
    pub fn new(
        manager: &mut HandleManager,
        point: DVec3,
        location: HandleLocation,
        effect: HandleEffect,
    ) -> Self {
        Self {
            id: manager.allocate(HandleKind::Point, location, effect),
            point,
            phase: DragPhase::Idle,
            valid: true,
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    /// Aktueller (ggf. vorgeschlagener) Punkt.
    pub fn point(&self) -> DVec3 {
        self.point
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Ob die aktuelle Position akzeptiert wird.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Setzt die Position außerhalb eines Drags (Refresh aus dem Modell).
    pub fn set_point(&mut self, point: DVec3) {
        self.point = point;
        self.valid = true;
    }

    pub fn begin_drag(&mut self) -> Result<(), HandleError> {
        self.phase.begin(self.id)?;
        self.valid = true;
        Ok(())
    }

    /// Übernimmt die vorgeschlagene Position während des Drags.
    pub fn drag_to(&mut self, point: DVec3) -> Result<(), HandleError> {
        self.phase.ensure_dragging(self.id)?;
        self.point = point;
        self.valid = true;
        Ok(())
    }

    /// Verwirft die aktuelle Position, der Drag läuft weiter.
    pub fn mark_invalid(&mut self) {
        self.valid = false;
    }

    /// Beendet den Drag und liefert die Endposition.
    pub fn end_drag(&mut self) -> Result<DVec3, HandleError> {
        self.phase.finish(self.id)?;
        Ok(self.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_lifecycle_updates_point() {
        let mut manager = HandleManager::new();
        let mut handle = PointHandle::new(
            &mut manager,
            DVec3::ZERO,
            HandleLocation::InputPoint,
            HandleEffect::Geometry,
        );
        assert!(handle.drag_to(DVec3::X).is_err());
        handle.begin_drag().expect("Start");
        handle.drag_to(DVec3::X).expect("Update");
        handle.mark_invalid();
        assert!(!handle.is_valid());
        handle.drag_to(DVec3::Y).expect("Update");
        assert!(handle.is_valid());
        assert_eq!(handle.end_drag().expect("Ende"), DVec3::Y);
        assert_eq!(handle.phase(), DragPhase::Idle);
    }
}
