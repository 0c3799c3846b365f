//! Geordnete, tangentenstetige Kurvenkette und ihr Builder.

use super::{Arc, CoordinateFrame, Curve, GeometryError, GeometryResult, LineSegment};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Geordnete Kette von Kurven; aufeinanderfolgende Elemente teilen ihre Endpunkte.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polycurve {
    curves: Vec<Curve>,
}

impl Polycurve {
    /// Alle Elemente in Durchlaufreihenfolge.
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// Anzahl der Elemente.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Leer?
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Iterator über die Kurven.
    pub fn iter(&self) -> std::slice::Iter<'_, Curve> {
        self.curves.iter()
    }

    /// Nur die Bögen, in Reihenfolge.
    pub fn arcs(&self) -> impl Iterator<Item = &Arc> + '_ {
        self.curves.iter().filter_map(|curve| match curve {
            Curve::Arc(arc) => Some(arc),
            Curve::Line(_) => None,
        })
    }

    /// Nur die Strecken, in Reihenfolge.
    pub fn segments(&self) -> impl Iterator<Item = &LineSegment> + '_ {
        self.curves.iter().filter_map(|curve| match curve {
            Curve::Line(line) => Some(line),
            Curve::Arc(_) => None,
        })
    }

    /// Bildet jede Kurve über den Frame in globale Koordinaten ab.
    pub fn transformed(&self, frame: &CoordinateFrame) -> GeometryResult<Self> {
        let curves = self
            .curves
            .iter()
            .map(|curve| curve.transformed(frame))
            .collect::<GeometryResult<Vec<_>>>()?;
        Ok(Self { curves })
    }
}

impl<'a> IntoIterator for &'a Polycurve {
    type Item = &'a Curve;
    type IntoIter = std::slice::Iter<'a, Curve>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.iter()
    }
}

/// Fluenter Builder für [`Polycurve`].
///
/// Tangenten-Operationen setzen am Ende des letzten Elements an und
/// übernehmen dessen Laufrichtung. Auf einem leeren Builder liefern sie
/// [`GeometryError::EmptyBuilder`].
#[derive(Debug, Clone, Default)]
pub struct PolycurveBuilder {
    curves: Vec<Curve>,
}

impl PolycurveBuilder {
    /// Leerer Builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hängt eine beliebige Kurve an.
    pub fn append(mut self, curve: impl Into<Curve>) -> Self {
        self.curves.push(curve.into());
        self
    }

    /// Tangentialer Bogen vom aktuellen Ende durch `through`.
    pub fn append_tangent_arc(self, through: DVec3) -> GeometryResult<Self> {
        let (end, tangent) = self.tail("append_tangent_arc")?;
        let arc = Arc::tangent_through(end, tangent, through)?;
        Ok(self.append(arc))
    }

    /// Tangentiale Strecke der Länge `length` ab dem aktuellen Ende.
    pub fn append_tangent_segment(self, length: f64) -> GeometryResult<Self> {
        let (end, tangent) = self.tail("append_tangent_segment")?;
        super::error::ensure_positive("length", length)?;
        Ok(self.append(LineSegment::new(end, end + tangent * length)))
    }

    /// Anzahl bisher angehängter Elemente.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Noch leer?
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Schließt den Builder ab.
    pub fn build(self) -> Polycurve {
        Polycurve {
            curves: self.curves,
        }
    }

    fn tail(&self, operation: &'static str) -> GeometryResult<(DVec3, DVec3)> {
        let last = self
            .curves
            .last()
            .ok_or(GeometryError::EmptyBuilder { operation })?;
        Ok((last.end(), last.end_tangent()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn tangent_operations_on_empty_builder_fail() {
        let arc = PolycurveBuilder::new().append_tangent_arc(DVec3::X);
        assert!(matches!(
            arc,
            Err(GeometryError::EmptyBuilder {
                operation: "append_tangent_arc"
            })
        ));
        let segment = PolycurveBuilder::new().append_tangent_segment(10.0);
        assert!(matches!(segment, Err(GeometryError::EmptyBuilder { .. })));
    }

    #[test]
    fn tangent_chain_is_c0_and_c1() {
        let polycurve = PolycurveBuilder::new()
            .append(LineSegment::new(DVec3::ZERO, DVec3::new(0.0, 10.0, 0.0)))
            .append_tangent_arc(DVec3::new(-2.0, 12.0, 0.0))
            .and_then(|b| b.append_tangent_segment(5.0))
            .expect("Kette erwartet")
            .build();

        assert_eq!(polycurve.len(), 3);
        for pair in polycurve.curves().windows(2) {
            assert!(pair[0].end().distance(pair[1].start()) < 1e-9);
            let t0 = pair[0].end_tangent().expect("Tangente");
            let t1 = pair[1].start_tangent().expect("Tangente");
            assert!(t0.distance(t1) < 1e-9);
        }
        let last = polycurve.curves()[2];
        assert!(last.end().distance(DVec3::new(-7.0, 12.0, 0.0)) < 1e-9);
    }

    #[test]
    fn tangent_segment_rejects_non_positive_length() {
        let result = PolycurveBuilder::new()
            .append(LineSegment::new(DVec3::ZERO, DVec3::X))
            .append_tangent_segment(0.0);
        assert!(matches!(
            result,
            Err(GeometryError::NonPositiveParameter { name: "length", .. })
        ));
    }

    #[test]
    fn arcs_and_segments_filter_by_kind() {
        let polycurve = PolycurveBuilder::new()
            .append(LineSegment::new(DVec3::ZERO, DVec3::Y))
            .append_tangent_arc(DVec3::new(-1.0, 2.0, 0.0))
            .expect("Bogen erwartet")
            .build();
        assert_eq!(polycurve.arcs().count(), 1);
        assert_eq!(polycurve.segments().count(), 1);
        let arc = polycurve.arcs().next().expect("Bogen");
        assert_relative_eq!(arc.radius(), 1.0, epsilon = 1e-9);
    }
}
