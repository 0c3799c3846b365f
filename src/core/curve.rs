//! Kurven-Primitive: Strecke und Kreisbogen als Summentyp [`Curve`].

use super::{try_normalize, CoordinateFrame, GeometryError, GeometryResult, DISTANCE_EPSILON};
use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

// ── Strecke ──────────────────────────────────────────────────────────

/// Gerade Strecke zwischen zwei Punkten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    /// Startpunkt
    pub start: DVec3,
    /// Endpunkt
    pub end: DVec3,
}

impl LineSegment {
    /// Erstellt eine Strecke.
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    /// Länge der Strecke.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Normierte Richtung von Start nach Ende.
    pub fn direction(&self) -> GeometryResult<DVec3> {
        try_normalize(self.end - self.start)
    }

    /// Mittelpunkt der Strecke.
    pub fn midpoint(&self) -> DVec3 {
        (self.start + self.end) * 0.5
    }

    /// Parallel verschobene Kopie.
    pub fn translated(&self, offset: DVec3) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    /// Bildet die Strecke aus dem lokalen Frame in globale Koordinaten ab.
    pub fn transformed(&self, frame: &CoordinateFrame) -> Self {
        Self::new(frame.to_global(self.start), frame.to_global(self.end))
    }
}

// ── Kreisbogen ───────────────────────────────────────────────────────

/// Kreisbogen, gegen den Uhrzeigersinn um `normal` von `start` aus überstrichen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    center: DVec3,
    normal: DVec3,
    start: DVec3,
    /// Überstrichener Winkel in Radiant, `(0, 2π]`
    sweep: f64,
}

impl Arc {
    /// Bogen aus Mittelpunkt, Drehachse, Startpunkt und Öffnungswinkel.
    pub fn from_center(center: DVec3, normal: DVec3, start: DVec3, sweep: f64) -> GeometryResult<Self> {
        let normal = try_normalize(normal)?;
        if start.distance(center) < DISTANCE_EPSILON {
            return Err(GeometryError::NonPositiveParameter {
                name: "radius",
                value: start.distance(center),
            });
        }
        if sweep.is_nan() || sweep <= 0.0 {
            return Err(GeometryError::NonPositiveParameter {
                name: "sweep",
                value: sweep,
            });
        }
        Ok(Self {
            center,
            normal,
            start,
            sweep: sweep.min(TAU),
        })
    }

    /// Vollkreis, beginnend bei `start`.
    pub fn full_circle(center: DVec3, normal: DVec3, start: DVec3) -> GeometryResult<Self> {
        Self::from_center(center, normal, start, TAU)
    }

    /// Bogen durch drei Punkte in Durchlaufreihenfolge `start -> mid -> end`.
    pub fn from_three_points(start: DVec3, mid: DVec3, end: DVec3) -> GeometryResult<Self> {
        let a = start - end;
        let b = mid - end;
        let axb = a.cross(b);
        let axb_len_sq = axb.length_squared();
        if axb_len_sq < DISTANCE_EPSILON * DISTANCE_EPSILON {
            return Err(GeometryError::CollinearPoints);
        }
        let center =
            end + (b * a.length_squared() - a * b.length_squared()).cross(axb) / (2.0 * axb_len_sq);
        let normal = try_normalize((mid - start).cross(end - start))
            .map_err(|_| GeometryError::CollinearPoints)?;
        let sweep = ccw_angle(start - center, end - center, normal);
        Self::from_center(center, normal, start, sweep)
    }

    /// Bogen ab `start` mit Starttangente `tangent`, der durch `through` endet.
    pub fn tangent_through(start: DVec3, tangent: DVec3, through: DVec3) -> GeometryResult<Self> {
        let tangent = try_normalize(tangent)?;
        let chord = through - start;
        let normal =
            try_normalize(tangent.cross(chord)).map_err(|_| GeometryError::CollinearPoints)?;
        let inward = normal.cross(tangent);
        let radius = chord.length_squared() / (2.0 * chord.dot(inward));
        let center = start + inward * radius;
        let sweep = ccw_angle(start - center, through - center, normal);
        Self::from_center(center, normal, start, sweep)
    }

    /// Mittelpunkt.
    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Einheits-Drehachse.
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.start.distance(self.center)
    }

    /// Öffnungswinkel in Radiant.
    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    /// Vollkreis?
    pub fn is_full_circle(&self) -> bool {
        (TAU - self.sweep).abs() < 1e-9
    }

    /// Punkt nach Drehung um `angle` ab dem Startpunkt.
    pub fn point_at(&self, angle: f64) -> DVec3 {
        self.center + DQuat::from_axis_angle(self.normal, angle) * (self.start - self.center)
    }

    /// Startpunkt.
    pub fn start(&self) -> DVec3 {
        self.start
    }

    /// Endpunkt.
    pub fn end(&self) -> DVec3 {
        self.point_at(self.sweep)
    }

    /// Punkt auf halbem Winkel, Stützpunkt für die Rekonstruktion.
    pub fn mid(&self) -> DVec3 {
        self.point_at(self.sweep * 0.5)
    }

    /// Einheitstangente am Startpunkt (Laufrichtung).
    pub fn start_tangent(&self) -> DVec3 {
        self.tangent_at(self.start)
    }

    /// Einheitstangente am Endpunkt (Laufrichtung).
    pub fn end_tangent(&self) -> DVec3 {
        self.tangent_at(self.end())
    }

    fn tangent_at(&self, point: DVec3) -> DVec3 {
        self.normal.cross(point - self.center).normalize_or_zero()
    }

    /// Bildet den Bogen ab. Teilbögen werden aus Start-, Mittel- und Endpunkt
    /// neu aufgebaut, Vollkreise über Mittelpunkt und Achse.
    pub fn transformed(&self, frame: &CoordinateFrame) -> GeometryResult<Self> {
        if self.is_full_circle() {
            return Self::full_circle(
                frame.to_global(self.center),
                frame.direction_to_global(self.normal),
                frame.to_global(self.start),
            );
        }
        Self::from_three_points(
            frame.to_global(self.start),
            frame.to_global(self.mid()),
            frame.to_global(self.end()),
        )
    }
}

/// Winkel von `from` nach `to`, gegen den Uhrzeigersinn um `normal`, in `(0, 2π]`.
fn ccw_angle(from: DVec3, to: DVec3, normal: DVec3) -> f64 {
    let angle = from.cross(to).dot(normal).atan2(from.dot(to));
    if angle <= 1e-12 {
        angle + TAU
    } else {
        angle
    }
}

// ── Curve ────────────────────────────────────────────────────────────

/// Element einer Polycurve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Curve {
    /// Gerade Strecke
    Line(LineSegment),
    /// Kreisbogen
    Arc(Arc),
}

impl Curve {
    /// Startpunkt.
    pub fn start(&self) -> DVec3 {
        match self {
            Curve::Line(line) => line.start,
            Curve::Arc(arc) => arc.start(),
        }
    }

    /// Endpunkt.
    pub fn end(&self) -> DVec3 {
        match self {
            Curve::Line(line) => line.end,
            Curve::Arc(arc) => arc.end(),
        }
    }

    /// Laufrichtung am Startpunkt.
    pub fn start_tangent(&self) -> GeometryResult<DVec3> {
        match self {
            Curve::Line(line) => line.direction(),
            Curve::Arc(arc) => Ok(arc.start_tangent()),
        }
    }

    /// Laufrichtung am Endpunkt.
    pub fn end_tangent(&self) -> GeometryResult<DVec3> {
        match self {
            Curve::Line(line) => line.direction(),
            Curve::Arc(arc) => Ok(arc.end_tangent()),
        }
    }

    /// Bogenlänge.
    pub fn length(&self) -> f64 {
        match self {
            Curve::Line(line) => line.length(),
            Curve::Arc(arc) => arc.radius() * arc.sweep(),
        }
    }

    /// Bildet die Kurve aus dem lokalen Frame in globale Koordinaten ab.
    pub fn transformed(&self, frame: &CoordinateFrame) -> GeometryResult<Self> {
        match self {
            Curve::Line(line) => Ok(Curve::Line(line.transformed(frame))),
            Curve::Arc(arc) => arc.transformed(frame).map(Curve::Arc),
        }
    }
}

impl From<LineSegment> for Curve {
    fn from(line: LineSegment) -> Self {
        Curve::Line(line)
    }
}

impl From<Arc> for Curve {
    fn from(arc: Arc) -> Self {
        Curve::Arc(arc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn quarter_arc_from_center_ends_on_y_axis() {
        let arc = Arc::from_center(DVec3::ZERO, DVec3::Z, DVec3::new(2.0, 0.0, 0.0), FRAC_PI_2)
            .expect("Bogen erwartet");
        let end = arc.end();
        assert_relative_eq!(end.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(end.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(arc.start_tangent().y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn three_point_arc_recovers_center_and_sweep() {
        let arc = Arc::from_three_points(
            DVec3::new(5.0, 0.0, 1.0),
            DVec3::new(0.0, 5.0, 1.0),
            DVec3::new(-5.0, 0.0, 1.0),
        )
        .expect("Bogen erwartet");
        assert!(arc.center().distance(DVec3::new(0.0, 0.0, 1.0)) < 1e-9);
        assert_relative_eq!(arc.radius(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(arc.sweep(), std::f64::consts::PI, epsilon = 1e-9);
        assert!(arc.normal().distance(DVec3::Z) < 1e-12);
    }

    #[test]
    fn three_point_arc_follows_traversal_direction() {
        // Im Uhrzeigersinn (von +Z gesehen) durchlaufen -> Normale zeigt nach -Z
        let arc = Arc::from_three_points(
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, -1.0, 0.0),
        )
        .expect("Bogen erwartet");
        assert!(arc.normal().distance(DVec3::NEG_Z) < 1e-12);
        assert!(arc.mid().distance(DVec3::X) < 1e-9);
    }

    #[test]
    fn collinear_points_are_rejected() {
        let result = Arc::from_three_points(DVec3::ZERO, DVec3::X, DVec3::X * 2.0);
        assert_eq!(result, Err(GeometryError::CollinearPoints));
    }

    #[test]
    fn tangent_arc_keeps_start_direction() {
        let arc = Arc::tangent_through(DVec3::new(10.0, 0.0, 0.0), DVec3::Y, DVec3::new(8.0, 2.0, 0.0))
            .expect("Bogen erwartet");
        assert!(arc.start_tangent().distance(DVec3::Y) < 1e-12);
        assert!(arc.end().distance(DVec3::new(8.0, 2.0, 0.0)) < 1e-9);
        assert_relative_eq!(arc.radius(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(arc.sweep(), FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn tangent_arc_rejects_point_on_tangent_line() {
        let result = Arc::tangent_through(DVec3::ZERO, DVec3::X, DVec3::new(5.0, 0.0, 0.0));
        assert_eq!(result, Err(GeometryError::CollinearPoints));
    }

    #[test]
    fn transformed_arc_keeps_radius() {
        let frame = crate::core::build_frame(DVec3::new(10.0, 20.0, 30.0), DVec3::new(1.0, 2.0, 2.0))
            .expect("Frame erwartet");
        let arc = Arc::from_center(DVec3::ZERO, DVec3::Z, DVec3::new(3.0, 0.0, 0.0), 1.0)
            .expect("Bogen erwartet");
        let global = arc.transformed(&frame).expect("Transformation erwartet");
        assert_relative_eq!(global.radius(), 3.0, epsilon = 1e-9);
        assert_relative_eq!(global.sweep(), 1.0, epsilon = 1e-9);
        assert!(global.center().distance(frame.origin) < 1e-9);
    }

    #[test]
    fn curve_enum_dispatches_endpoints() {
        let line: Curve = LineSegment::new(DVec3::ZERO, DVec3::X).into();
        assert_eq!(line.start(), DVec3::ZERO);
        assert_eq!(line.end(), DVec3::X);
        assert_relative_eq!(line.length(), 1.0);
    }
}
