//! Core-Geometrie: Frames, Kurven, Polycurve-Builder und Übergangsstück-Modell.
//!
//! Reine Mathematik ohne Host-Typen. Alle Konstruktionen liefern
//! [`GeometryResult`] statt bei degenerierten Eingaben zu paniken.

pub mod curve;
mod error;
pub mod frame;
pub mod measure;
pub mod polycurve;
/// Übergangsstück Rechteck -> Kreis
///
/// - TransitionParams: Höhe, Breite, Länge, Radius
/// - TransitionGeometry: Rechteck- und Kreisquerschnitt in globalen Koordinaten
/// - LoftedPanel / TriangularPanel: daraus abgeleitete Flächen
pub mod transition;

pub use curve::{Arc, Curve, LineSegment};
pub use error::{GeometryError, GeometryResult};
pub use frame::{build_frame, try_normalize, CoordinateFrame, DISTANCE_EPSILON};
pub use measure::{
    distance_point_to_line, project_point_to_line, project_point_to_plane, segment_distance,
};
pub use polycurve::{Polycurve, PolycurveBuilder};
pub use transition::{
    LoftedPanel, TransitionGeometry, TransitionParams, TriangularPanel, CORNER_RADIUS_DIVISOR,
};
