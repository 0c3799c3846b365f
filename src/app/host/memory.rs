//! In-Memory-Host: Instanz, Vorschau-Aufzeichnung und Modell-Sammler.

use super::{AttributeValue, ComponentInput, InstanceId, InstanceStore, PreviewGraphics};
use crate::app::plugin::{BeamPart, ContourPlate, LoftedPlate, ModelWriter};
use crate::core::{Arc, LineSegment};
use glam::DVec3;
use indexmap::IndexMap;
use serde::Serialize;

// ── Instanz ─────────────────────────────────────────────────────────

/// Instanz mit getrenntem Arbeits- und festgeschriebenem Zustand.
#[derive(Debug, Clone, Default)]
pub struct MemoryInstance {
    id: u64,
    attributes: IndexMap<String, AttributeValue>,
    input: ComponentInput,
    committed_attributes: IndexMap<String, AttributeValue>,
    committed_input: ComponentInput,
    /// Anzahl `modify`-Aufrufe
    pub modify_count: usize,
    /// Anzahl `commit_changes`-Aufrufe
    pub commit_count: usize,
    /// Anzahl `select`-Aufrufe
    pub select_count: usize,
    /// Simuliert einen Host-Fehler bei `modify`
    pub fail_modify: bool,
}

impl MemoryInstance {
    /// Neue Instanz mit bereits festgeschriebener Eingabe.
    pub fn new(id: u64, input: ComponentInput) -> Self {
        Self {
            id,
            committed_input: input.clone(),
            input,
            ..Self::default()
        }
    }

    /// Setzt ein Attribut direkt als festgeschrieben (Host-Zustand vor der Bearbeitung).
    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        let value = value.into();
        self.attributes.insert(name.to_string(), value.clone());
        self.committed_attributes.insert(name.to_string(), value);
        self
    }

    /// Festgeschriebener Attributwert.
    pub fn committed_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.committed_attributes.get(name)
    }

    /// Festgeschriebene Eingabe.
    pub fn committed_input(&self) -> &ComponentInput {
        &self.committed_input
    }
}

impl InstanceStore for MemoryInstance {
    fn id(&self) -> InstanceId {
        InstanceId(self.id)
    }

    fn attribute(&self, name: &str) -> Option<AttributeValue> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: AttributeValue) {
        self.attributes.insert(name.to_string(), value);
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.shift_remove(name);
    }

    fn input(&self) -> ComponentInput {
        self.input.clone()
    }

    fn set_input(&mut self, input: ComponentInput) {
        self.input = input;
    }

    fn select(&mut self) {
        self.select_count += 1;
    }

    fn modify(&mut self) -> anyhow::Result<()> {
        if self.fail_modify {
            anyhow::bail!("Instanz {} konnte nicht neu berechnet werden", self.id);
        }
        self.modify_count += 1;
        Ok(())
    }

    fn commit_changes(&mut self) -> anyhow::Result<()> {
        self.committed_attributes = self.attributes.clone();
        self.committed_input = self.input.clone();
        self.commit_count += 1;
        Ok(())
    }
}

// ── Vorschau ────────────────────────────────────────────────────────

/// Ein aufgezeichnetes Vorschau-Element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PreviewPrimitive {
    /// Strecke
    Line(LineSegment),
    /// Bogen
    Arc(Arc),
    /// Profil entlang einer Strecke
    Profile {
        /// Profilname
        profile: String,
        /// Achse
        segment: LineSegment,
        /// Versatz
        offset: DVec3,
        /// Drehung in Grad
        rotation_deg: f64,
    },
    /// Beschriftung
    Text {
        /// Position
        position: DVec3,
        /// Inhalt
        text: String,
    },
}

/// Zeichnet nichts, merkt sich aber den aktuellen Vorschau-Inhalt.
#[derive(Debug, Clone, Default)]
pub struct RecordingGraphics {
    /// Aktuell sichtbare Elemente (seit dem letzten `clear`)
    pub primitives: Vec<PreviewPrimitive>,
    /// Anzahl `clear`-Aufrufe
    pub clear_count: usize,
}

impl RecordingGraphics {
    /// Anzahl sichtbarer Bögen.
    pub fn arc_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, PreviewPrimitive::Arc(_)))
            .count()
    }

    /// Anzahl sichtbarer Strecken.
    pub fn line_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, PreviewPrimitive::Line(_)))
            .count()
    }

    /// Alle sichtbaren Texte.
    pub fn texts(&self) -> Vec<&str> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                PreviewPrimitive::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl PreviewGraphics for RecordingGraphics {
    fn clear(&mut self) {
        self.primitives.clear();
        self.clear_count += 1;
    }

    fn draw_line(&mut self, segment: &LineSegment) {
        self.primitives.push(PreviewPrimitive::Line(*segment));
    }

    fn draw_arc(&mut self, arc: &Arc) {
        self.primitives.push(PreviewPrimitive::Arc(*arc));
    }

    fn draw_profile(&mut self, profile: &str, segment: &LineSegment, offset: DVec3, rotation_deg: f64) {
        self.primitives.push(PreviewPrimitive::Profile {
            profile: profile.to_string(),
            segment: *segment,
            offset,
            rotation_deg,
        });
    }

    fn draw_text(&mut self, position: DVec3, text: &str) {
        self.primitives.push(PreviewPrimitive::Text {
            position,
            text: text.to_string(),
        });
    }
}

// ── Modell ──────────────────────────────────────────────────────────

/// Sammelt eingefügte Bauteile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryModel {
    /// Gelofte Bleche
    pub lofted_plates: Vec<LoftedPlate>,
    /// Kontur-Bleche
    pub contour_plates: Vec<ContourPlate>,
    /// Träger
    pub beams: Vec<BeamPart>,
    /// Simuliert einen Host-Fehler beim Einfügen
    #[serde(skip)]
    pub fail_insert: bool,
}

impl MemoryModel {
    fn check(&self, what: &str) -> anyhow::Result<()> {
        if self.fail_insert {
            anyhow::bail!("{what} konnte nicht eingefügt werden");
        }
        Ok(())
    }
}

impl ModelWriter for MemoryModel {
    fn insert_lofted_plate(&mut self, plate: LoftedPlate) -> anyhow::Result<()> {
        self.check("Gelofte Fläche")?;
        self.lofted_plates.push(plate);
        Ok(())
    }

    fn insert_contour_plate(&mut self, plate: ContourPlate) -> anyhow::Result<()> {
        self.check("Kontur-Blech")?;
        self.contour_plates.push(plate);
        Ok(())
    }

    fn insert_beam(&mut self, beam: BeamPart) -> anyhow::Result<()> {
        self.check("Träger")?;
        self.beams.push(beam);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncommitted_attribute_is_not_visible_as_committed() {
        let mut instance = MemoryInstance::new(1, ComponentInput::default())
            .with_attribute("RectangleWidth", 3000.0);
        instance.set_attribute("RectangleWidth", AttributeValue::Number(4000.0));
        assert_eq!(
            instance.committed_attribute("RectangleWidth"),
            Some(&AttributeValue::Number(3000.0))
        );
        instance.commit_changes().expect("Commit");
        assert_eq!(
            instance.committed_attribute("RectangleWidth"),
            Some(&AttributeValue::Number(4000.0))
        );
    }

    #[test]
    fn failing_modify_reports_error() {
        let mut instance = MemoryInstance::new(3, ComponentInput::default());
        instance.fail_modify = true;
        let err = instance.modify().expect_err("Fehler erwartet");
        assert!(err.to_string().contains("Instanz 3"));
        assert_eq!(instance.modify_count, 0);
    }

    #[test]
    fn clear_drops_recorded_primitives() {
        let mut graphics = RecordingGraphics::default();
        graphics.draw_line(&LineSegment::new(DVec3::ZERO, DVec3::X));
        graphics.draw_text(DVec3::ZERO, "r = 5");
        assert_eq!(graphics.line_count(), 1);
        assert_eq!(graphics.texts(), vec!["r = 5"]);
        graphics.clear();
        assert!(graphics.primitives.is_empty());
        assert_eq!(graphics.clear_count, 1);
    }
}
