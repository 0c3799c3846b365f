//! Erzeugung eines Übergangsstücks aus Schwerpunkt und Längen-Punkt.

use super::{CreationFeature, FinalizedInput, InputRange};
use crate::app::host::{AttributeValue, ComponentInput, PreviewGraphics};
use crate::app::preview::draw_transition_section;
use crate::app::section_data::{ATTR_CIRCLE_RADIUS, ATTR_RECTANGLE_HEIGHT, ATTR_RECTANGLE_WIDTH};
use crate::core::{TransitionGeometry, TransitionParams, DISTANCE_EPSILON};
use crate::shared::PluginOptions;
use glam::DVec3;
use indexmap::IndexMap;

/// Picks für Schwerpunkt der Rechteckfläche und Kreismittelpunkt.
const DEFINITION_POINTS: usize = 2;

/// Erster Pick = Schwerpunkt der Rechteckfläche, zweiter = Kreismittelpunkt.
#[derive(Debug, Clone)]
pub struct TransitionSectionCreation {
    options: PluginOptions,
}

impl TransitionSectionCreation {
    pub fn new(options: PluginOptions) -> Self {
        Self { options }
    }

    fn params_for_length(&self, transition_length: f64) -> TransitionParams {
        TransitionParams {
            rectangle_height: self.options.rectangle_height,
            rectangle_width: self.options.rectangle_width,
            transition_length,
            circle_radius: self.options.circle_radius,
        }
    }
}

impl CreationFeature for TransitionSectionCreation {
    fn name(&self) -> &str {
        "Übergangsstück"
    }

    fn prompt(&self) -> &str {
        "Schwerpunkt der Rechteckfläche und Kreismittelpunkt wählen"
    }

    fn input_range(&self) -> InputRange {
        InputRange::at_most(DEFINITION_POINTS)
    }

    fn required_picks(&self) -> usize {
        DEFINITION_POINTS
    }

    fn preview(&self, picks: &[DVec3], hit: DVec3, graphics: &mut dyn PreviewGraphics) {
        let Some(&centroid) = picks.last() else {
            return;
        };
        let axis = hit - centroid;
        let length = axis.length();
        let params = self.params_for_length(length);
        if [
            length,
            params.rectangle_width,
            params.rectangle_height,
            params.circle_radius,
        ]
        .iter()
        .any(|&value| value < DISTANCE_EPSILON)
        {
            return;
        }
        match TransitionGeometry::new(params, centroid, axis) {
            Ok(geometry) => draw_transition_section(graphics, &geometry),
            Err(e) => log::debug!("Übergangsstück-Vorschau übersprungen: {}", e),
        }
    }

    fn finalize(&self, picks: &[DVec3]) -> FinalizedInput {
        let mut attributes = IndexMap::new();
        attributes.insert(
            ATTR_RECTANGLE_WIDTH.to_string(),
            AttributeValue::Number(self.options.rectangle_width),
        );
        attributes.insert(
            ATTR_RECTANGLE_HEIGHT.to_string(),
            AttributeValue::Number(self.options.rectangle_height),
        );
        attributes.insert(
            ATTR_CIRCLE_RADIUS.to_string(),
            AttributeValue::Number(self.options.circle_radius),
        );
        FinalizedInput {
            input: ComponentInput::polygon(picks.to_vec()),
            attributes,
        }
    }
}
