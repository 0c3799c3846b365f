//! Erzeugungs-Sitzungen: Punkte picken, Vorschau zeigen, Eingabe abschließen.
//!
//! Zustandsfolge: `NotStarted -> Picking -> Completed | Interrupted`.
//! Das konkrete Verhalten (Prompt, Vorschau, Abschluss) liefert ein
//! [`CreationFeature`]; die Sitzung kümmert sich um Zählung und Zustände.

pub mod beam;
pub mod transition;

pub use beam::BeamCreation;
pub use transition::TransitionSectionCreation;

use super::host::{
    write_and_commit, AttributeValue, ComponentInput, InstanceStore, PreviewGraphics,
};
use glam::DVec3;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Eingabebereich ──────────────────────────────────────────────────

/// Erlaubte Anzahl angenommener Picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRange {
    /// Mindestanzahl
    pub min: usize,
    /// Höchstanzahl
    pub max: usize,
}

impl InputRange {
    /// Höchstens `max` Picks, mindestens einer.
    pub fn at_most(max: usize) -> Self {
        Self { min: 1.min(max), max }
    }

    /// Genau `count` Picks.
    pub fn exactly(count: usize) -> Self {
        Self {
            min: count,
            max: count,
        }
    }

    /// Mindestens `min` Picks, nach oben offen.
    pub fn at_least(min: usize) -> Self {
        Self {
            min,
            max: usize::MAX,
        }
    }

    /// Liegt `count` im Bereich?
    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

// ── Zustände und Fehler ─────────────────────────────────────────────

/// Lebenszyklus einer Sitzung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    Picking,
    Completed,
    Interrupted,
}

/// Ungültige Aufrufe gegen eine Sitzung.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// `start` auf einer bereits gestarteten Sitzung
    #[error("Sitzung läuft bereits oder ist beendet ({0:?})")]
    AlreadyStarted(SessionPhase),
    /// Pick außerhalb der Phase `Picking`
    #[error("Sitzung nimmt keine Picks an ({0:?})")]
    NotPicking(SessionPhase),
    /// Höchstanzahl erreicht
    #[error("Höchstens {max} Picks erlaubt")]
    TooManyPicks {
        /// Höchstanzahl
        max: usize,
    },
    /// Pick-Koordinate nicht endlich
    #[error("Pick enthält ungültige Koordinaten")]
    NonFinitePick,
}

// ── Ergebnis ────────────────────────────────────────────────────────

/// Abgeschlossene Eingabe für Erzeugung oder Änderung einer Instanz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedInput {
    /// Komponenten-Eingabe (Punktkette der Picks)
    pub input: ComponentInput,
    /// Zusätzliche Attribute aus den Optionen
    pub attributes: IndexMap<String, AttributeValue>,
}

impl FinalizedInput {
    /// Schreibt Eingabe und Attribute in eine Instanz und schreibt fest.
    /// Scheitert der Host, bleibt die Instanz unverändert.
    pub fn apply_to(&self, store: &mut dyn InstanceStore) -> anyhow::Result<()> {
        let attributes: Vec<(&str, AttributeValue)> = self
            .attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.clone()))
            .collect();
        write_and_commit(store, &attributes, Some(self.input.clone()))?;
        log::info!(
            "Instanz {:?}: Eingabe mit {} Punkten übernommen",
            store.id(),
            self.input.points().len()
        );
        Ok(())
    }
}

// ── Feature-Vertrag ─────────────────────────────────────────────────

/// Verhalten einer konkreten Erzeugung.
pub trait CreationFeature {
    /// Anzeigename
    fn name(&self) -> &str;

    /// Aufforderung beim Start der Pick-Sitzung
    fn prompt(&self) -> &str;

    fn input_range(&self) -> InputRange;

    /// Picks, bis die Sitzung abgeschlossen werden darf.
    fn required_picks(&self) -> usize {
        self.input_range().min
    }

    /// Zeichnet die Vorschau für die aktuelle Zeigerposition.
    /// Die Fläche ist bereits geleert.
    fn preview(&self, picks: &[DVec3], hit: DVec3, graphics: &mut dyn PreviewGraphics);

    /// Verpackt die Picks zur fertigen Eingabe.
    fn finalize(&self, picks: &[DVec3]) -> FinalizedInput;
}

// ── Sitzung ─────────────────────────────────────────────────────────

/// Eine Pick-Sitzung für genau eine neue Instanz.
#[derive(Debug)]
pub struct CreationSession<F: CreationFeature> {
    feature: F,
    phase: SessionPhase,
    picks: Vec<DVec3>,
}

impl<F: CreationFeature> CreationSession<F> {
    pub fn new(feature: F) -> Self {
        Self {
            feature,
            phase: SessionPhase::NotStarted,
            picks: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Bisher angenommene Picks.
    pub fn picks(&self) -> &[DVec3] {
        &self.picks
    }

    pub fn feature(&self) -> &F {
        &self.feature
    }

    /// Startet das Picken und liefert die Aufforderung.
    pub fn start(&mut self) -> Result<&str, SessionError> {
        if self.phase != SessionPhase::NotStarted {
            return Err(SessionError::AlreadyStarted(self.phase));
        }
        self.phase = SessionPhase::Picking;
        log::info!("{}: {}", self.feature.name(), self.feature.prompt());
        Ok(self.feature.prompt())
    }

    /// ObjectPicked: nimmt einen Punkt an und liefert die neue Anzahl.
    pub fn on_object_picked(&mut self, point: DVec3) -> Result<usize, SessionError> {
        if self.phase != SessionPhase::Picking {
            return Err(SessionError::NotPicking(self.phase));
        }
        if !point.is_finite() {
            return Err(SessionError::NonFinitePick);
        }
        let max = self.feature.input_range().max;
        if self.picks.len() >= max {
            return Err(SessionError::TooManyPicks { max });
        }
        self.picks.push(point);
        log::debug!("{}: Pick {} bei {:?}", self.feature.name(), self.picks.len(), point);
        Ok(self.picks.len())
    }

    /// InputValidationRequested: `true` = Sitzung offen halten.
    pub fn on_input_validation_requested(&self) -> bool {
        self.phase == SessionPhase::Picking && self.picks.len() < self.feature.required_picks()
    }

    /// PreviewRequested: leert die Vorschau und zeichnet sie neu.
    pub fn on_preview_requested(&self, hit: DVec3, graphics: &mut dyn PreviewGraphics) {
        if self.phase != SessionPhase::Picking {
            return;
        }
        graphics.clear();
        self.feature.preview(&self.picks, hit, graphics);
    }

    /// PickUndone: nimmt den letzten Pick zurück. Ohne Picks ein No-op.
    pub fn on_pick_undone(&mut self) -> Option<DVec3> {
        if self.phase != SessionPhase::Picking {
            return None;
        }
        let undone = self.picks.pop();
        if undone.is_none() {
            log::debug!("{}: nichts zurückzunehmen", self.feature.name());
        }
        undone
    }

    /// PickSessionEnded: liefert die fertige Eingabe oder bricht bei zu
    /// wenigen Picks ab.
    pub fn on_pick_session_ended(
        &mut self,
        graphics: &mut dyn PreviewGraphics,
    ) -> Option<FinalizedInput> {
        graphics.clear();
        if self.phase != SessionPhase::Picking {
            return None;
        }
        let required = self.feature.required_picks();
        if self.picks.len() < required {
            log::info!(
                "{}: {} von {} Picks, keine Instanz",
                self.feature.name(),
                self.picks.len(),
                required
            );
            self.phase = SessionPhase::Interrupted;
            self.picks.clear();
            return None;
        }
        self.phase = SessionPhase::Completed;
        Some(self.feature.finalize(&self.picks))
    }

    /// PickSessionInterrupted: verwirft alles, keine Teil-Instanz.
    pub fn on_pick_session_interrupted(&mut self, graphics: &mut dyn PreviewGraphics) {
        graphics.clear();
        if matches!(self.phase, SessionPhase::NotStarted | SessionPhase::Picking) {
            self.phase = SessionPhase::Interrupted;
            self.picks.clear();
            log::info!("{}: Sitzung abgebrochen", self.feature.name());
        }
    }
}

#[cfg(test)]
mod tests;
