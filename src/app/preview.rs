//! Zeichen-Hilfen für die Vorschau-Fläche.

use super::host::PreviewGraphics;
use crate::core::{Curve, LineSegment, Polycurve, TransitionGeometry};
use glam::DVec3;

/// Zeichnet jede Kurve der Kette.
pub fn draw_polycurve(graphics: &mut dyn PreviewGraphics, polycurve: &Polycurve) {
    for curve in polycurve {
        match curve {
            Curve::Line(line) => graphics.draw_line(line),
            Curve::Arc(arc) => graphics.draw_arc(arc),
        }
    }
}

/// Rechteck, Kreis und die Kegel-Verbindungslinien.
pub fn draw_transition_section(graphics: &mut dyn PreviewGraphics, geometry: &TransitionGeometry) {
    draw_polycurve(graphics, geometry.rectangular_section());
    draw_polycurve(graphics, geometry.circular_section());
    for panel in geometry.lofted_panels() {
        for connector in panel.connectors() {
            graphics.draw_line(&connector);
        }
    }
}

/// Profil entlang jeder Strecke einer Punktkette.
pub fn draw_profile_chain(
    graphics: &mut dyn PreviewGraphics,
    profile: &str,
    points: &[DVec3],
    offset: DVec3,
    rotation_deg: f64,
) {
    for pair in points.windows(2) {
        graphics.draw_profile(profile, &LineSegment::new(pair[0], pair[1]), offset, rotation_deg);
    }
}
