//! Manipulations-Kontexte: binden Handles an genau eine Modell-Instanz.
//!
//! Ablauf pro Drag: `on_drag_started` -> `on_drag_ongoing`* -> `on_drag_ended`.
//! Während des Drags wird nur die Vorschau neu gezeichnet; erst
//! `on_drag_ended` schreibt Attribute und schreibt die Transaktion fest.
//!
//! Kontexte müssen vor dem Verwerfen mit `detach` abgemeldet werden
//! (erst Abbestellen, dann Entsorgen der Handles). `detach` ist idempotent.

pub mod circle;
pub mod feature;
pub mod polygon;
pub mod rectangle;

pub use circle::CircleManipulationContext;
pub use feature::{ManipulationFeature, TransitionValues, ValueField};
pub use polygon::PolygonManipulationContext;
pub use rectangle::{RectangleEdge, RectangleManipulationContext};

use super::handles::{ContextId, HandleError, HandleId, HandleManager};
use super::host::{write_and_commit, AttributeValue, InstanceId, InstanceStore, PreviewGraphics};
use crate::core::{GeometryError, LineSegment};
use glam::DVec3;
use thiserror::Error;

// ── Drag-Daten ──────────────────────────────────────────────────────

/// Vom Host gelieferter Vorschlag für den gezogenen Wert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragInput {
    /// Neue Position eines Punkt-Handles
    Point(DVec3),
    /// Neue Lage eines Strecken-Handles
    Line(LineSegment),
    /// Neuer Messwert eines Abstands-Manipulators
    Distance(f64),
}

impl DragInput {
    fn kind(&self) -> &'static str {
        match self {
            DragInput::Point(_) => "Punkt",
            DragInput::Line(_) => "Strecke",
            DragInput::Distance(_) => "Abstand",
        }
    }
}

/// Ergebnis eines Drag-Ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStatus {
    /// Vorschau aktualisiert
    Valid,
    /// Vorschlag verworfen, Handle ungültig markiert
    Invalid,
}

/// Ergebnis eines Drag-Endes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragCommit {
    /// Wert geschrieben und festgeschrieben
    Committed,
    /// Degenerierter Endwert, nichts geschrieben
    Skipped,
}

// ── Fehler ──────────────────────────────────────────────────────────

/// Fehler beim Anbinden, Aktualisieren oder Ziehen.
#[derive(Debug, Error)]
pub enum ManipulationError {
    /// Handle-Lebenszyklus verletzt
    #[error(transparent)]
    Handle(#[from] HandleError),
    /// Geometrie der Instanz nicht konstruierbar
    #[error("Geometrie nicht konstruierbar: {0}")]
    Geometry(#[from] GeometryError),
    /// Handle gehört nicht zu diesem Kontext
    #[error("Handle {handle:?} gehört nicht zu Kontext {context:?}")]
    NotOwned {
        /// Handle
        handle: HandleId,
        /// Kontext
        context: ContextId,
    },
    /// Kein Kontext abonniert dieses Handle
    #[error("Kein Kontext für Handle {0:?}")]
    NoContext(HandleId),
    /// Falsche Art von Drag-Wert für das Handle
    #[error("Handle {handle:?} erwartet {expected}, erhalten {actual}")]
    UnexpectedInput {
        /// Handle
        handle: HandleId,
        /// Erwartete Art
        expected: &'static str,
        /// Gelieferte Art
        actual: &'static str,
    },
    /// Ein anderer Drag läuft bereits
    #[error("Drag auf {active:?} läuft noch, {requested:?} abgewiesen")]
    DragInProgress {
        /// Laufender Drag
        active: HandleId,
        /// Abgewiesenes Handle
        requested: HandleId,
    },
    /// Event ohne passenden DragStarted
    #[error("Kein aktiver Drag auf {0:?}")]
    NoActiveDrag(HandleId),
    /// Schreibzugriff auf eine fremde Instanz
    #[error("Kontext gehört zu {expected:?}, Instanz ist {actual:?}")]
    WrongInstance {
        /// Gebundene Instanz
        expected: InstanceId,
        /// Übergebene Instanz
        actual: InstanceId,
    },
    /// Punktkette zu kurz für Polygon-Handles
    #[error("Polygon braucht mindestens 2 Punkte, hat {0}")]
    TooFewPoints(usize),
    /// Host-Fehler bei modify/commit
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

// ── Vertrag ─────────────────────────────────────────────────────────

/// Controller für die Handles einer Instanz.
pub trait ManipulationContext {
    /// ID, unter der der Kontext Handles abonniert
    fn id(&self) -> ContextId;

    /// Gebundene Instanz
    fn instance(&self) -> InstanceId;

    /// Alle eigenen Handles
    fn handles(&self) -> Vec<HandleId>;

    /// Leitet alle Handle-Lagen neu aus der Instanz ab.
    fn update_context(
        &mut self,
        store: &dyn InstanceStore,
        manager: &mut HandleManager,
    ) -> Result<(), ManipulationError>;

    fn on_drag_started(&mut self, handle: HandleId) -> Result<(), ManipulationError>;

    /// Rechnet die Geometrie zum Vorschlag neu und zeichnet die Vorschau.
    /// Degenerierte Vorschläge liefern `DragStatus::Invalid`, keinen Fehler.
    fn on_drag_ongoing(
        &mut self,
        handle: HandleId,
        input: DragInput,
        graphics: &mut dyn PreviewGraphics,
    ) -> Result<DragStatus, ManipulationError>;

    fn on_drag_ended(
        &mut self,
        handle: HandleId,
        input: DragInput,
        store: &mut dyn InstanceStore,
        graphics: &mut dyn PreviewGraphics,
    ) -> Result<DragCommit, ManipulationError>;

    /// Bestellt alle Handles ab und entsorgt sie.
    fn detach(&mut self, manager: &mut HandleManager);

    fn is_attached(&self) -> bool;
}

// ── Gemeinsame Hilfen ───────────────────────────────────────────────

/// Schreibt ein Attribut, berechnet neu und schreibt fest.
/// Bei Host-Fehlern bleibt der vorherige Wert stehen.
pub fn commit_attribute(
    store: &mut dyn InstanceStore,
    name: &str,
    value: f64,
) -> anyhow::Result<()> {
    write_and_commit(store, &[(name, AttributeValue::Number(value))], None)?;
    log::info!("Instanz {:?}: {} = {}", store.id(), name, value);
    Ok(())
}

/// Abbestellen vor Entsorgen, für jedes Handle.
pub(crate) fn release_handles(manager: &mut HandleManager, handles: &[HandleId]) {
    for &handle in handles {
        if let Err(e) = manager.release(handle) {
            log::warn!("Handle {:?} nicht freigegeben: {}", handle, e);
        }
    }
}

/// Abonniert alle Handles für den Kontext.
pub(crate) fn subscribe_handles(
    manager: &mut HandleManager,
    handles: &[HandleId],
    context: ContextId,
) -> Result<(), HandleError> {
    for &handle in handles {
        manager.subscribe(handle, context)?;
    }
    Ok(())
}

pub(crate) fn expect_point(handle: HandleId, input: DragInput) -> Result<DVec3, ManipulationError> {
    match input {
        DragInput::Point(point) => Ok(point),
        other => Err(ManipulationError::UnexpectedInput {
            handle,
            expected: "Punkt",
            actual: other.kind(),
        }),
    }
}

pub(crate) fn expect_line(
    handle: HandleId,
    input: DragInput,
) -> Result<LineSegment, ManipulationError> {
    match input {
        DragInput::Line(line) => Ok(line),
        other => Err(ManipulationError::UnexpectedInput {
            handle,
            expected: "Strecke",
            actual: other.kind(),
        }),
    }
}

pub(crate) fn expect_distance(handle: HandleId, input: DragInput) -> Result<f64, ManipulationError> {
    match input {
        DragInput::Distance(distance) => Ok(distance),
        other => Err(ManipulationError::UnexpectedInput {
            handle,
            expected: "Abstand",
            actual: other.kind(),
        }),
    }
}
