//! Erzeugung eines Trägers: Profil-Vorschau vom letzten Pick in Zeigerrichtung.

use super::{CreationFeature, FinalizedInput, InputRange};
use crate::app::host::{AttributeValue, ComponentInput, PreviewGraphics};
use crate::app::section_data::{ATTR_LENGTH_FACTOR, ATTR_PROFILE};
use crate::core::LineSegment;
use crate::shared::PluginOptions;
use glam::DVec3;
use indexmap::IndexMap;

const DEFINITION_POINTS: usize = 2;

#[derive(Debug, Clone)]
pub struct BeamCreation {
    options: PluginOptions,
    range: InputRange,
}

impl BeamCreation {
    pub fn new(options: PluginOptions) -> Self {
        Self::with_range(options, InputRange::at_most(DEFINITION_POINTS))
    }

    /// Mit abweichendem Eingabebereich, z.B. `InputRange::exactly(2)`.
    pub fn with_range(options: PluginOptions, range: InputRange) -> Self {
        Self { options, range }
    }

    /// Vorschau-Achse: vom letzten Pick um `length_factor` über den Zeiger hinaus.
    pub fn preview_axis(&self, last: DVec3, hit: DVec3) -> LineSegment {
        LineSegment::new(last, last + (hit - last) * self.options.length_factor)
    }
}

impl CreationFeature for BeamCreation {
    fn name(&self) -> &str {
        "Träger"
    }

    fn prompt(&self) -> &str {
        "Start- und Richtungspunkt wählen"
    }

    fn input_range(&self) -> InputRange {
        self.range
    }

    fn required_picks(&self) -> usize {
        self.range.min.max(DEFINITION_POINTS)
    }

    fn preview(&self, picks: &[DVec3], hit: DVec3, graphics: &mut dyn PreviewGraphics) {
        let Some(&last) = picks.last() else {
            return;
        };
        graphics.draw_profile(
            &self.options.beam_profile,
            &self.preview_axis(last, hit),
            DVec3::new(0.0, 0.0, self.options.beam_preview_offset_z),
            self.options.beam_preview_rotation_deg,
        );
    }

    fn finalize(&self, picks: &[DVec3]) -> FinalizedInput {
        let mut attributes = IndexMap::new();
        attributes.insert(
            ATTR_PROFILE.to_string(),
            AttributeValue::Text(self.options.beam_profile.clone()),
        );
        attributes.insert(
            ATTR_LENGTH_FACTOR.to_string(),
            AttributeValue::Number(self.options.length_factor),
        );
        FinalizedInput {
            input: ComponentInput::polygon(picks.to_vec()),
            attributes,
        }
    }
}
