//! Platzierungs-Frames: Ursprung plus zwei orthonormale Achsen in der Ebene.

use super::{GeometryError, GeometryResult};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Minimale Distanz (Modelleinheiten), die als ungleich Null gilt.
pub const DISTANCE_EPSILON: f64 = 1.0e-4;

/// Normiert `v`, lehnt aber Vektoren kürzer als [`DISTANCE_EPSILON`] ab.
pub fn try_normalize(v: DVec3) -> GeometryResult<DVec3> {
    let length = v.length();
    if length < DISTANCE_EPSILON || !length.is_finite() {
        return Err(GeometryError::DegenerateDirection { length });
    }
    Ok(v / length)
}

/// Lokales Koordinatensystem. Die Normale ergibt sich als `axis_x × axis_y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateFrame {
    /// Ursprung in globalen Koordinaten
    pub origin: DVec3,
    /// Lokale X-Achse (Einheitsvektor)
    pub axis_x: DVec3,
    /// Lokale Y-Achse (Einheitsvektor)
    pub axis_y: DVec3,
}

impl CoordinateFrame {
    /// Globales Koordinatensystem im Ursprung.
    pub const GLOBAL: Self = Self {
        origin: DVec3::ZERO,
        axis_x: DVec3::X,
        axis_y: DVec3::Y,
    };

    /// Erstellt einen Frame aus bereits orthonormalen Achsen.
    pub fn new(origin: DVec3, axis_x: DVec3, axis_y: DVec3) -> Self {
        Self {
            origin,
            axis_x,
            axis_y,
        }
    }

    /// Normale der Frame-Ebene.
    pub fn normal(&self) -> DVec3 {
        self.axis_x.cross(self.axis_y)
    }

    /// Bildet einen lokalen Punkt in globale Koordinaten ab.
    pub fn to_global(&self, local: DVec3) -> DVec3 {
        self.origin + self.direction_to_global(local)
    }

    /// Bildet eine lokale Richtung ab (ohne Translation).
    pub fn direction_to_global(&self, local: DVec3) -> DVec3 {
        self.axis_x * local.x + self.axis_y * local.y + self.normal() * local.z
    }

    /// Bildet einen globalen Punkt in lokale Koordinaten ab.
    pub fn to_local(&self, global: DVec3) -> DVec3 {
        let offset = global - self.origin;
        DVec3::new(
            offset.dot(self.axis_x),
            offset.dot(self.axis_y),
            offset.dot(self.normal()),
        )
    }
}

impl Default for CoordinateFrame {
    fn default() -> Self {
        Self::GLOBAL
    }
}

/// Baut den Frame der Grundfläche aus Schwerpunkt und Normale.
///
/// Die freie Drehung in der Ebene wird über die globale X-Achse festgelegt:
/// `axis_y = normal × X`. Ist die Normale parallel zu X, wird `axis_y = Z`
/// verwendet. Anschließend `axis_x = axis_y × normal`.
pub fn build_frame(centroid: DVec3, normal: DVec3) -> GeometryResult<CoordinateFrame> {
    let normal = try_normalize(normal)?;
    let axis_y = try_normalize(normal.cross(DVec3::X)).unwrap_or(DVec3::Z);
    let axis_x = try_normalize(axis_y.cross(normal))?;
    Ok(CoordinateFrame::new(centroid, axis_x, axis_y))
}
