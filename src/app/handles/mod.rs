//! Handles: ziehbare Stellvertreter für Punkte, Strecken und abgeleitete Abstände.
//!
//! Der `HandleManager` ist die Handle-Fabrik. Er vergibt IDs, merkt sich
//! den abonnierenden Kontext je Handle und verweigert das Entsorgen
//! eines noch abonnierten Handles.

mod distance;
mod line;
mod point;

pub use distance::DistanceManipulator;
pub use line::LineHandle;
pub use point::PointHandle;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── IDs ─────────────────────────────────────────────────────────────

/// ID eines Handles, eindeutig pro `HandleManager`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId(pub u64);

/// ID eines Manipulations-Kontexts, der Handle-Events abonniert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextId(pub u64);

// ── Klassifikation (rein beschreibend) ──────────────────────────────

/// Art des Handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleKind {
    /// Punkt
    Point,
    /// Strecke
    Line,
    /// Abgeleiteter Abstand
    Distance,
}

/// Wo das Handle sitzt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleLocation {
    /// Auf einem Eingabepunkt
    InputPoint,
    /// Auf einem Kantenmittelpunkt
    MidPoint,
    /// Sonstige Lage
    Other,
}

/// Was das Ziehen bewirkt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleEffect {
    /// Verschiebt Geometrie
    Geometry,
    /// Ändert einen Parameter
    Parameter,
}

/// Zustand eines Drags pro Handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    /// Kein Drag aktiv
    #[default]
    Idle,
    /// Drag läuft
    Dragging,
}

impl DragPhase {
    /// `Idle -> Dragging`
    pub(crate) fn begin(&mut self, id: HandleId) -> Result<(), HandleError> {
        match self {
            DragPhase::Idle => {
                *self = DragPhase::Dragging;
                Ok(())
            }
            DragPhase::Dragging => Err(HandleError::AlreadyDragging(id)),
        }
    }

    /// `Dragging -> Idle`
    pub(crate) fn finish(&mut self, id: HandleId) -> Result<(), HandleError> {
        match self {
            DragPhase::Dragging => {
                *self = DragPhase::Idle;
                Ok(())
            }
            DragPhase::Idle => Err(HandleError::NotDragging(id)),
        }
    }

    /// Prüft, dass ein Drag läuft.
    pub(crate) fn ensure_dragging(&self, id: HandleId) -> Result<(), HandleError> {
        match self {
            DragPhase::Dragging => Ok(()),
            DragPhase::Idle => Err(HandleError::NotDragging(id)),
        }
    }
}

// ── Fehler ──────────────────────────────────────────────────────────

/// Verletzungen des Handle-Lebenszyklus.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    /// Handle existiert nicht (mehr)
    #[error("Handle {0:?} ist unbekannt oder bereits entsorgt")]
    Unknown(HandleId),
    /// Handle hat bereits einen Abonnenten
    #[error("Handle {handle:?} ist bereits von Kontext {owner:?} abonniert")]
    AlreadySubscribed {
        /// Betroffenes Handle
        handle: HandleId,
        /// Bisheriger Abonnent
        owner: ContextId,
    },
    /// Entsorgen vor dem Abbestellen
    #[error("Handle {0:?} wird noch abonniert und darf nicht entsorgt werden")]
    StillSubscribed(HandleId),
    /// DragStarted während eines laufenden Drags
    #[error("Handle {0:?} wird bereits gezogen")]
    AlreadyDragging(HandleId),
    /// DragOngoing/DragEnded ohne DragStarted
    #[error("Handle {0:?} wird nicht gezogen")]
    NotDragging(HandleId),
}

// ── Manager ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct HandleEntry {
    kind: HandleKind,
    location: HandleLocation,
    effect: HandleEffect,
    subscriber: Option<ContextId>,
}

/// Handle-Fabrik und Abonnement-Register.
#[derive(Debug, Default)]
pub struct HandleManager {
    next_id: u64,
    entries: IndexMap<HandleId, HandleEntry>,
}

impl HandleManager {
    /// Leerer Manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Vergibt ein neues Handle.
    pub fn allocate(
        &mut self,
        kind: HandleKind,
        location: HandleLocation,
        effect: HandleEffect,
    ) -> HandleId {
        self.next_id += 1;
        let id = HandleId(self.next_id);
        self.entries.insert(
            id,
            HandleEntry {
                kind,
                location,
                effect,
                subscriber: None,
            },
        );
        log::debug!("Handle {:?} angelegt ({:?}, {:?}, {:?})", id, kind, location, effect);
        id
    }

    /// Kontext abonniert die Drag-Events des Handles.
    pub fn subscribe(&mut self, id: HandleId, context: ContextId) -> Result<(), HandleError> {
        let entry = self.entries.get_mut(&id).ok_or(HandleError::Unknown(id))?;
        match entry.subscriber {
            Some(owner) if owner != context => Err(HandleError::AlreadySubscribed { handle: id, owner }),
            _ => {
                entry.subscriber = Some(context);
                Ok(())
            }
        }
    }

    /// Abonnement lösen. Idempotent für bereits abbestellte Handles.
    pub fn unsubscribe(&mut self, id: HandleId) -> Result<(), HandleError> {
        let entry = self.entries.get_mut(&id).ok_or(HandleError::Unknown(id))?;
        entry.subscriber = None;
        Ok(())
    }

    /// Handle entsorgen. Muss vorher abbestellt sein.
    pub fn dispose(&mut self, id: HandleId) -> Result<(), HandleError> {
        let entry = self.entries.get(&id).ok_or(HandleError::Unknown(id))?;
        if entry.subscriber.is_some() {
            return Err(HandleError::StillSubscribed(id));
        }
        self.entries.shift_remove(&id);
        log::debug!("Handle {:?} entsorgt", id);
        Ok(())
    }

    /// Abbestellen und Entsorgen in der vorgeschriebenen Reihenfolge.
    pub fn release(&mut self, id: HandleId) -> Result<(), HandleError> {
        self.unsubscribe(id)?;
        self.dispose(id)
    }

    /// Abonnierender Kontext des Handles.
    pub fn owner_of(&self, id: HandleId) -> Option<ContextId> {
        self.entries.get(&id).and_then(|entry| entry.subscriber)
    }

    /// Art des Handles.
    pub fn kind_of(&self, id: HandleId) -> Option<HandleKind> {
        self.entries.get(&id).map(|entry| entry.kind)
    }

    /// Anzahl lebender Handles.
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }

    /// Lebende Handles in Anlagereihenfolge.
    pub fn live_handles(&self) -> impl Iterator<Item = HandleId> + '_ {
        self.entries.keys().copied()
    }
}
