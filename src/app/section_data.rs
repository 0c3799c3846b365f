//! Liest Parameter und Platzierung eines Übergangsstücks aus einer Instanz.

use super::host::{AttributeValue, InstanceStore};
use crate::core::{
    build_frame, CoordinateFrame, GeometryResult, TransitionGeometry, TransitionParams,
    DISTANCE_EPSILON,
};
use crate::shared::PluginOptions;
use glam::DVec3;

// ── Attributnamen ───────────────────────────────────────────────────

/// Rechteckbreite (mm)
pub const ATTR_RECTANGLE_WIDTH: &str = "RectangleWidth";
/// Rechteckhöhe (mm)
pub const ATTR_RECTANGLE_HEIGHT: &str = "RectangleHeight";
/// Kreisradius (mm)
pub const ATTR_CIRCLE_RADIUS: &str = "CircleRadius";
/// Blechprofil der Flächen
pub const ATTR_SECTION_PROFILE: &str = "SectionProfile";
/// Material
pub const ATTR_MATERIAL: &str = "Material";
/// Oberfläche
pub const ATTR_FINISH: &str = "Finish";
/// Trägerprofil
pub const ATTR_PROFILE: &str = "Profile";
/// Verlängerungsfaktor
pub const ATTR_LENGTH_FACTOR: &str = "LengthFactor";

/// Liest ein Zahl-Attribut, Fallback auf `default` wenn fehlend oder nicht numerisch.
pub fn number_attribute(store: &dyn InstanceStore, name: &str, default: f64) -> f64 {
    match store.attribute(name) {
        None => default,
        Some(value) => match value.as_number() {
            Some(number) if number.is_finite() => number,
            _ => {
                log::warn!(
                    "Attribut {} = {:?} ist keine Zahl, verwende {}",
                    name,
                    value,
                    default
                );
                default
            }
        },
    }
}

/// Liest ein Text-Attribut; leere Werte gelten als fehlend.
pub fn text_attribute(store: &dyn InstanceStore, name: &str, default: &str) -> String {
    match store.attribute(name) {
        Some(AttributeValue::Text(text)) if !text.trim().is_empty() => text,
        Some(AttributeValue::Number(number)) => number.to_string(),
        _ => default.to_string(),
    }
}

/// Aus einer Instanz gelesene Übergangsstück-Daten.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionData {
    /// Skalare Parameter
    pub params: TransitionParams,
    /// Platzierung der Rechteckfläche
    pub frame: CoordinateFrame,
    /// Definitionspunkte in Eingabereihenfolge
    pub points: Vec<DVec3>,
}

impl SectionData {
    /// Liest Attribute und Definitionspunkte.
    ///
    /// Länge und Normale kommen aus den ersten beiden Punkten. Mit nur
    /// einem Punkt liegt der Frame dort in globaler Ausrichtung, ohne
    /// Punkte im Ursprung.
    pub fn fetch(store: &dyn InstanceStore, options: &PluginOptions) -> Self {
        let points = store.input().points();

        let mut transition_length = options.section_length;
        let frame = match points.as_slice() {
            [p0, p1, ..] => {
                let axis = *p1 - *p0;
                if axis.length() >= DISTANCE_EPSILON {
                    transition_length = axis.length();
                }
                build_frame(*p0, axis).unwrap_or_else(|e| {
                    log::warn!("Definitionspunkte degeneriert ({}), globaler Frame", e);
                    CoordinateFrame {
                        origin: *p0,
                        ..CoordinateFrame::GLOBAL
                    }
                })
            }
            [p0] => CoordinateFrame {
                origin: *p0,
                ..CoordinateFrame::GLOBAL
            },
            [] => CoordinateFrame::GLOBAL,
        };

        let params = TransitionParams {
            rectangle_height: number_attribute(
                store,
                ATTR_RECTANGLE_HEIGHT,
                options.rectangle_height,
            ),
            rectangle_width: number_attribute(store, ATTR_RECTANGLE_WIDTH, options.rectangle_width),
            transition_length,
            circle_radius: number_attribute(store, ATTR_CIRCLE_RADIUS, options.circle_radius),
        };

        Self {
            params,
            frame,
            points,
        }
    }

    /// Baut die Geometrie zu den gelesenen Daten.
    pub fn geometry(&self) -> GeometryResult<TransitionGeometry> {
        TransitionGeometry::with_frame(self.params, self.frame)
    }
}
