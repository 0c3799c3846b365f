//! Übergangsstück Rechteck -> Kreis.
//!
//! Aus vier Skalaren und einem Platzierungs-Frame entstehen:
//! - der Rechteckquerschnitt mit gerundeten Ecken (8 Elemente, Strecke/Bogen im Wechsel)
//! - der Kreisquerschnitt (4 Viertelbögen) im Abstand `transition_length` entlang der Normale
//! - daraus 4 gelofte Kegelflächen und 4 Dreiecksflächen
//!
//! Die Geometrie wird bei jeder Parameteränderung komplett neu berechnet.

use super::{
    build_frame, error::ensure_positive, segment_distance, Arc, CoordinateFrame, GeometryError,
    GeometryResult, LineSegment, Polycurve, PolycurveBuilder, DISTANCE_EPSILON,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Eckradius = kleinere Rechteckseite / `CORNER_RADIUS_DIVISOR`.
pub const CORNER_RADIUS_DIVISOR: f64 = 12.0;

// ── Parameter ────────────────────────────────────────────────────────

/// Skalare Parameter eines Übergangsstücks (Modelleinheiten).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionParams {
    /// Rechteckhöhe (lokale Y-Richtung)
    pub rectangle_height: f64,
    /// Rechteckbreite (lokale X-Richtung)
    pub rectangle_width: f64,
    /// Abstand Rechteck -> Kreis entlang der Normale
    pub transition_length: f64,
    /// Kreisradius
    pub circle_radius: f64,
}

impl TransitionParams {
    /// Eckradius der gerundeten Rechteckecken.
    pub fn corner_radius(&self) -> f64 {
        self.rectangle_height.min(self.rectangle_width) / CORNER_RADIUS_DIVISOR
    }

    /// Lehnt nicht-positive Werte und zu große Eckradien ab.
    pub fn validate(&self) -> GeometryResult<()> {
        ensure_positive("rectangle_height", self.rectangle_height)?;
        ensure_positive("rectangle_width", self.rectangle_width)?;
        ensure_positive("transition_length", self.transition_length)?;
        ensure_positive("circle_radius", self.circle_radius)?;

        let corner_radius = self.corner_radius();
        let half_min = self.rectangle_height.min(self.rectangle_width) / 2.0;
        if corner_radius >= half_min {
            return Err(GeometryError::CornerRadiusTooLarge {
                corner_radius,
                half_min,
            });
        }
        Ok(())
    }

    /// Rechteckquerschnitt im lokalen Frame, ab der rechten Kante gegen den Uhrzeigersinn.
    pub fn local_rectangular_section(&self) -> GeometryResult<Polycurve> {
        self.validate()?;
        let r = self.corner_radius();
        let hw = self.rectangle_width / 2.0;
        let hh = self.rectangle_height / 2.0;
        let x_length = self.rectangle_width - 2.0 * r;
        let y_length = self.rectangle_height - 2.0 * r;

        let right = LineSegment::new(
            DVec3::new(hw, -y_length / 2.0, 0.0),
            DVec3::new(hw, y_length / 2.0, 0.0),
        );

        let polycurve = PolycurveBuilder::new()
            .append(right)
            .append_tangent_arc(DVec3::new(hw - r, hh, 0.0))?
            .append_tangent_segment(x_length)?
            .append_tangent_arc(DVec3::new(-hw, hh - r, 0.0))?
            .append_tangent_segment(y_length)?
            .append_tangent_arc(DVec3::new(-(hw - r), -hh, 0.0))?
            .append_tangent_segment(x_length)?
            .append_tangent_arc(DVec3::new(hw, -(hh - r), 0.0))?
            .build();
        Ok(polycurve)
    }

    /// Kreisquerschnitt im lokalen Frame: vier Viertelbögen ab lokal +X.
    pub fn local_circular_section(&self) -> GeometryResult<Polycurve> {
        self.validate()?;
        let radius = self.circle_radius;
        let z = self.transition_length;

        let first = Arc::from_center(
            DVec3::new(0.0, 0.0, z),
            DVec3::Z,
            DVec3::new(radius, 0.0, z),
            FRAC_PI_2,
        )?;

        let polycurve = PolycurveBuilder::new()
            .append(first)
            .append_tangent_arc(DVec3::new(-radius, 0.0, z))?
            .append_tangent_arc(DVec3::new(0.0, -radius, z))?
            .append_tangent_arc(DVec3::new(radius, 0.0, z))?
            .build();
        Ok(polycurve)
    }
}

// ── Flächen ──────────────────────────────────────────────────────────

/// Gelofte Fläche zwischen Rechteck-Eckbogen und zugehörigem Kreisbogen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoftedPanel {
    /// Bogen im Rechteckquerschnitt
    pub bottom: Arc,
    /// Bogen im Kreisquerschnitt
    pub top: Arc,
}

impl LoftedPanel {
    /// Verbindungslinien Start->Start und Ende->Ende.
    pub fn connectors(&self) -> [LineSegment; 2] {
        [
            LineSegment::new(self.bottom.start(), self.top.start()),
            LineSegment::new(self.bottom.end(), self.top.end()),
        ]
    }

    /// Gültig, wenn sich die beiden Verbindungslinien nicht berühren.
    pub fn is_valid(&self) -> bool {
        let [a, b] = self.connectors();
        segment_distance(a.start, a.end, b.start, b.end) > DISTANCE_EPSILON
    }
}

/// Dreiecksfläche zwischen zwei benachbarten Kegelflächen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangularPanel {
    /// Eckpunkte: Ende Eckbogen i, Start Eckbogen i+1, Ende Kreisbogen i
    pub corners: [DVec3; 3],
}

// ── Geometrie ────────────────────────────────────────────────────────

/// Vollständig abgeleitete Übergangsstück-Geometrie in globalen Koordinaten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionGeometry {
    params: TransitionParams,
    frame: CoordinateFrame,
    rectangular_section: Polycurve,
    circular_section: Polycurve,
}

impl TransitionGeometry {
    /// Baut die Geometrie aus Parametern, Schwerpunkt und Normale.
    pub fn new(params: TransitionParams, centroid: DVec3, normal: DVec3) -> GeometryResult<Self> {
        let frame = build_frame(centroid, normal)?;
        Self::with_frame(params, frame)
    }

    /// Baut die Geometrie in einem bereits bestimmten Frame.
    pub fn with_frame(params: TransitionParams, frame: CoordinateFrame) -> GeometryResult<Self> {
        let rectangular_section = params.local_rectangular_section()?.transformed(&frame)?;
        let circular_section = params.local_circular_section()?.transformed(&frame)?;
        Ok(Self {
            params,
            frame,
            rectangular_section,
            circular_section,
        })
    }

    /// Parameter.
    pub fn params(&self) -> &TransitionParams {
        &self.params
    }

    /// Platzierungs-Frame.
    pub fn frame(&self) -> &CoordinateFrame {
        &self.frame
    }

    /// Schwerpunkt der Rechteckfläche.
    pub fn centroid(&self) -> DVec3 {
        self.frame.origin
    }

    /// Mittelpunkt des Kreisquerschnitts.
    pub fn circle_center(&self) -> DVec3 {
        self.frame
            .to_global(DVec3::new(0.0, 0.0, self.params.transition_length))
    }

    /// Rechteckquerschnitt (8 Elemente).
    pub fn rectangular_section(&self) -> &Polycurve {
        &self.rectangular_section
    }

    /// Kreisquerschnitt (4 Viertelbögen).
    pub fn circular_section(&self) -> &Polycurve {
        &self.circular_section
    }

    /// Gerade Rechteckkanten in der Reihenfolge rechts, oben, links, unten.
    pub fn rectangle_edges(&self) -> Vec<LineSegment> {
        self.rectangular_section.segments().copied().collect()
    }

    /// Die vier Kegelflächen, Bogen i mit Bogen i.
    pub fn lofted_panels(&self) -> Vec<LoftedPanel> {
        self.rectangular_section
            .arcs()
            .zip(self.circular_section.arcs())
            .map(|(bottom, top)| LoftedPanel {
                bottom: *bottom,
                top: *top,
            })
            .collect()
    }

    /// Die vier Dreiecksflächen zwischen benachbarten Kegelflächen.
    pub fn triangular_panels(&self) -> Vec<TriangularPanel> {
        let bottom: Vec<&Arc> = self.rectangular_section.arcs().collect();
        let top: Vec<&Arc> = self.circular_section.arcs().collect();
        let count = bottom.len().min(top.len());
        (0..count)
            .map(|i| TriangularPanel {
                corners: [bottom[i].end(), bottom[(i + 1) % count].start(), top[i].end()],
            })
            .collect()
    }
}
