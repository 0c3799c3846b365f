//! Plugin-Einstiegspunkte: erzeugen die Bauteile einer Instanz im Modell.
//!
//! Fehler werden hier abgefangen und protokolliert; gegenüber dem Host gilt
//! ein Lauf immer als abgeschlossen.

use super::host::InstanceStore;
use super::section_data::{
    number_attribute, text_attribute, SectionData, ATTR_FINISH, ATTR_LENGTH_FACTOR, ATTR_MATERIAL,
    ATTR_PROFILE, ATTR_SECTION_PROFILE,
};
use crate::core::Arc;
use crate::shared::PluginOptions;
use anyhow::Context;
use glam::DVec3;
use serde::Serialize;

// ── Bauteile ────────────────────────────────────────────────────────

/// Gemeinsame Bauteil-Attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartAttributes {
    pub profile: String,
    pub material: String,
    pub finish: String,
}

/// Gelofte Fläche zwischen Rechteck- und Kreisbogen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoftedPlate {
    pub bottom: Arc,
    pub top: Arc,
    pub attributes: PartAttributes,
}

/// Ebenes Blech aus drei Eckpunkten.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContourPlate {
    pub corners: [DVec3; 3],
    pub attributes: PartAttributes,
}

/// Träger zwischen zwei Punkten.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeamPart {
    pub start: DVec3,
    pub end: DVec3,
    pub attributes: PartAttributes,
}

/// Schreibzugriff auf das Host-Modell.
pub trait ModelWriter {
    fn insert_lofted_plate(&mut self, plate: LoftedPlate) -> anyhow::Result<()>;
    fn insert_contour_plate(&mut self, plate: ContourPlate) -> anyhow::Result<()>;
    fn insert_beam(&mut self, beam: BeamPart) -> anyhow::Result<()>;
}

/// Schließt einen Lauf ab: Fehler werden geloggt, der Host sieht immer Erfolg.
fn finish_run(name: &str, result: anyhow::Result<usize>) -> bool {
    match result {
        Ok(count) => log::info!("{}: {} Bauteile eingefügt", name, count),
        Err(e) => log::error!("{} fehlgeschlagen: {:#}", name, e),
    }
    true
}

// ── Übergangsstück ──────────────────────────────────────────────────

/// Erzeugt vier gelofte Flächen und vier Dreiecksbleche.
#[derive(Debug, Clone, Default)]
pub struct TransitionSectionPlugin {
    options: PluginOptions,
}

impl TransitionSectionPlugin {
    pub fn new(options: PluginOptions) -> Self {
        Self { options }
    }

    fn part_attributes(&self, store: &dyn InstanceStore) -> PartAttributes {
        PartAttributes {
            profile: text_attribute(store, ATTR_SECTION_PROFILE, &self.options.plate_profile),
            material: text_attribute(store, ATTR_MATERIAL, &self.options.material),
            finish: text_attribute(store, ATTR_FINISH, &self.options.finish),
        }
    }

    /// Führt den Lauf aus. Liefert immer `true` (nicht-fataler Abschluss).
    pub fn run(&self, store: &dyn InstanceStore, model: &mut dyn ModelWriter) -> bool {
        finish_run("Übergangsstück", self.insert_parts(store, model))
    }

    fn insert_parts(
        &self,
        store: &dyn InstanceStore,
        model: &mut dyn ModelWriter,
    ) -> anyhow::Result<usize> {
        let data = SectionData::fetch(store, &self.options);
        let geometry = data
            .geometry()
            .with_context(|| format!("Geometrie für Instanz {:?}", store.id()))?;
        let attributes = self.part_attributes(store);

        let mut inserted = 0;
        for (index, panel) in geometry.lofted_panels().into_iter().enumerate() {
            if !panel.is_valid() {
                log::warn!("Gelofte Fläche {}: Verbindungslinien kreuzen sich", index);
            }
            model
                .insert_lofted_plate(LoftedPlate {
                    bottom: panel.bottom,
                    top: panel.top,
                    attributes: attributes.clone(),
                })
                .with_context(|| format!("Gelofte Fläche {}", index))?;
            inserted += 1;
        }
        for (index, panel) in geometry.triangular_panels().into_iter().enumerate() {
            model
                .insert_contour_plate(ContourPlate {
                    corners: panel.corners,
                    attributes: attributes.clone(),
                })
                .with_context(|| format!("Dreiecksblech {}", index))?;
            inserted += 1;
        }
        Ok(inserted)
    }
}

// ── Träger ──────────────────────────────────────────────────────────

/// Erzeugt einen Träger, verlängert um den Längenfaktor.
#[derive(Debug, Clone, Default)]
pub struct BeamPlugin {
    options: PluginOptions,
}

impl BeamPlugin {
    pub fn new(options: PluginOptions) -> Self {
        Self { options }
    }

    /// Endpunkt `p1 + factor·(p2 - p1)`; ohne positiven Faktor `p2`.
    pub fn beam_end(start: DVec3, direction_point: DVec3, factor: f64) -> DVec3 {
        if factor > 0.0 {
            start + (direction_point - start) * factor
        } else {
            direction_point
        }
    }

    pub fn run(&self, store: &dyn InstanceStore, model: &mut dyn ModelWriter) -> bool {
        finish_run("Träger", self.insert_beam(store, model))
    }

    fn insert_beam(
        &self,
        store: &dyn InstanceStore,
        model: &mut dyn ModelWriter,
    ) -> anyhow::Result<usize> {
        let points = store.input().points();
        let [p1, p2, ..] = points.as_slice() else {
            anyhow::bail!("Träger braucht zwei Punkte, erhalten {}", points.len());
        };
        let factor = number_attribute(store, ATTR_LENGTH_FACTOR, self.options.length_factor);
        let beam = BeamPart {
            start: *p1,
            end: Self::beam_end(*p1, *p2, factor),
            attributes: PartAttributes {
                profile: text_attribute(store, ATTR_PROFILE, &self.options.beam_profile),
                material: text_attribute(store, ATTR_MATERIAL, &self.options.material),
                finish: text_attribute(store, ATTR_FINISH, &self.options.finish),
            },
        };
        model.insert_beam(beam).context("Träger einfügen")?;
        Ok(1)
    }
}
