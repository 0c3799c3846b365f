//! Fehlertypen der Geometrie-Schicht.

use thiserror::Error;

/// Ergebnis-Typ aller Geometrie-Konstruktionen.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Degenerierte Eingaben bei der Geometrie-Konstruktion.
///
/// Wird nie als harter Fehler durch einen laufenden Drag propagiert:
/// Aufrufer markieren das Handle ungültig oder überspringen das Update.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Richtungsvektor kürzer als `DISTANCE_EPSILON`
    #[error("Richtungsvektor zu kurz zum Normieren (Länge {length:e})")]
    DegenerateDirection {
        /// Tatsächliche Länge des Vektors
        length: f64,
    },
    /// Drei Punkte liegen (fast) auf einer Geraden
    #[error("Punkte sind kollinear, kein Bogen konstruierbar")]
    CollinearPoints,
    /// Tangenten-Operation ohne vorheriges Element
    #[error("PolycurveBuilder ist leer: `{operation}` braucht ein vorheriges Element")]
    EmptyBuilder {
        /// Name der aufgerufenen Builder-Operation
        operation: &'static str,
    },
    /// Parameter ist nicht positiv (oder NaN)
    #[error("Parameter `{name}` muss positiv sein (ist {value})")]
    NonPositiveParameter {
        /// Name des Parameters
        name: &'static str,
        /// Übergebener Wert
        value: f64,
    },
    /// Eckradius erreicht die halbe kleinere Rechteckseite
    #[error("Eckradius {corner_radius} ist nicht kleiner als die halbe kleinere Seite {half_min}")]
    CornerRadiusTooLarge {
        /// Berechneter Eckradius
        corner_radius: f64,
        /// Hälfte der kleineren Rechteckseite
        half_min: f64,
    },
}

/// Prüft, dass `value` echt positiv ist.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> GeometryResult<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::NonPositiveParameter { name, value })
    }
}
