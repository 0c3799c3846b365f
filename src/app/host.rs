//! Schnittstellen zum Modellier-Host: Instanz-Speicher, Komponenten-Eingabe, Vorschau.
//!
//! Der Host wird nie direkt angesprochen, nur über diese Traits.
//! `memory` liefert In-Memory-Implementierungen für Binary und Tests.

pub mod memory;

use crate::core::{Arc, LineSegment};
use glam::DVec3;
use serde::{Deserialize, Serialize};

// ── Identitäten ─────────────────────────────────────────────────────

/// Stabile ID einer Modell-Instanz im Host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

/// Referenz auf ein vom Nutzer gewähltes Modellobjekt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef(pub u64);

// ── Attribute ───────────────────────────────────────────────────────

/// Wert eines benannten Instanz-Attributs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Zahl (Längen in mm, Faktoren)
    Number(f64),
    /// Text (Profil, Material, Oberfläche)
    Text(String),
}

impl AttributeValue {
    /// Zahlwert; Text wird versuchsweise geparst.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(value) => Some(*value),
            AttributeValue::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Textwert; Zahlen werden formatiert.
    pub fn as_text(&self) -> String {
        match self {
            AttributeValue::Number(value) => value.to_string(),
            AttributeValue::Text(text) => text.clone(),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

// ── Komponenten-Eingabe ─────────────────────────────────────────────

/// Ein Eintrag der geordneten Komponenten-Eingabe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputItem {
    /// Einzelner Punkt
    OnePoint(DVec3),
    /// Punktpaar
    TwoPoints(DVec3, DVec3),
    /// Offene Punktkette
    Polygon(Vec<DVec3>),
    /// Ein gewähltes Objekt
    Object(ObjectRef),
    /// Mehrere gewählte Objekte
    Objects(Vec<ObjectRef>),
}

/// Geordnete Eingabe einer Komponente, wie vom Host gespeichert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentInput {
    /// Einträge in Eingabereihenfolge
    pub items: Vec<InputItem>,
}

impl ComponentInput {
    /// Eingabe aus genau einer Punktkette.
    pub fn polygon(points: Vec<DVec3>) -> Self {
        Self {
            items: vec![InputItem::Polygon(points)],
        }
    }

    /// Alle Punkte aller Einträge in Reihenfolge, Objekte werden übersprungen.
    pub fn points(&self) -> Vec<DVec3> {
        let mut points = Vec::new();
        for item in &self.items {
            match item {
                InputItem::OnePoint(p) => points.push(*p),
                InputItem::TwoPoints(a, b) => points.extend([*a, *b]),
                InputItem::Polygon(chain) => points.extend(chain.iter().copied()),
                InputItem::Object(_) | InputItem::Objects(_) => {}
            }
        }
        points
    }

    /// Baut die Eingabe mit ersetzten Punkten neu auf.
    ///
    /// Die Struktur bleibt erhalten: jeder Eintrag behält seine Punktanzahl,
    /// Objekt-Referenzen bleiben unverändert. Fehlen Ersatzpunkte, bleiben
    /// die bisherigen Werte stehen.
    pub fn with_points(&self, replacement: &[DVec3]) -> Self {
        let mut source = replacement.iter().copied();
        let mut next = |current: DVec3| source.next().unwrap_or(current);
        let items = self
            .items
            .iter()
            .map(|item| match item {
                InputItem::OnePoint(p) => InputItem::OnePoint(next(*p)),
                InputItem::TwoPoints(a, b) => {
                    let a = next(*a);
                    let b = next(*b);
                    InputItem::TwoPoints(a, b)
                }
                InputItem::Polygon(chain) => {
                    InputItem::Polygon(chain.iter().map(|p| next(*p)).collect())
                }
                other => other.clone(),
            })
            .collect();
        Self { items }
    }
}

// ── Instanz-Speicher ────────────────────────────────────────────────

/// Persistente Modell-Instanz im Host.
///
/// Schreibende Zugriffe werden erst mit `modify` + `commit_changes` dauerhaft.
pub trait InstanceStore {
    /// ID der Instanz
    fn id(&self) -> InstanceId;

    /// Liest ein Attribut, `None` wenn nicht gesetzt.
    fn attribute(&self, name: &str) -> Option<AttributeValue>;

    /// Setzt ein Attribut (noch nicht festgeschrieben).
    fn set_attribute(&mut self, name: &str, value: AttributeValue);

    /// Entfernt ein Attribut (noch nicht festgeschrieben).
    fn remove_attribute(&mut self, name: &str);

    /// Aktuelle Komponenten-Eingabe.
    fn input(&self) -> ComponentInput;

    /// Ersetzt die Komponenten-Eingabe (noch nicht festgeschrieben).
    fn set_input(&mut self, input: ComponentInput);

    /// Wählt die Instanz im Host aus (Seiteneffekt bei Drag-Start).
    fn select(&mut self) {}

    /// Stößt die Neuberechnung der Instanz an.
    fn modify(&mut self) -> anyhow::Result<()>;

    /// Schreibt die Transaktion fest.
    fn commit_changes(&mut self) -> anyhow::Result<()>;
}

/// Schreibt Attribute und optional eine neue Eingabe, berechnet neu und
/// schreibt fest.
///
/// Scheitert `modify` oder `commit_changes`, steht der Arbeitszustand der
/// Instanz danach wieder wie vor dem Aufruf.
pub fn write_and_commit(
    store: &mut dyn InstanceStore,
    attributes: &[(&str, AttributeValue)],
    input: Option<ComponentInput>,
) -> anyhow::Result<()> {
    let previous_input = input.as_ref().map(|_| store.input());
    let previous_attributes: Vec<(&str, Option<AttributeValue>)> = attributes
        .iter()
        .map(|(name, _)| (*name, store.attribute(name)))
        .collect();

    if let Some(input) = input {
        store.set_input(input);
    }
    for (name, value) in attributes {
        store.set_attribute(name, value.clone());
    }

    let result = store.modify().and_then(|()| store.commit_changes());
    if let Err(e) = &result {
        // Rückwärts, damit bei doppelten Namen der älteste Wert gewinnt
        for (name, value) in previous_attributes.into_iter().rev() {
            match value {
                Some(value) => store.set_attribute(name, value),
                None => store.remove_attribute(name),
            }
        }
        if let Some(input) = previous_input {
            store.set_input(input);
        }
        log::warn!("Instanz {:?}: Änderung verworfen ({:#})", store.id(), e);
    }
    result
}

// ── Vorschau ────────────────────────────────────────────────────────

/// Flüchtige Vorschau-Zeichenfläche des Hosts. Reine Seiteneffekte.
pub trait PreviewGraphics {
    /// Entfernt alle Vorschau-Elemente.
    fn clear(&mut self);

    /// Zeichnet eine Strecke.
    fn draw_line(&mut self, segment: &LineSegment);

    /// Zeichnet einen Bogen.
    fn draw_arc(&mut self, arc: &Arc);

    /// Zeichnet ein Profil entlang einer Strecke.
    fn draw_profile(&mut self, profile: &str, segment: &LineSegment, offset: DVec3, rotation_deg: f64);

    /// Zeichnet einen Text an einer Position.
    fn draw_text(&mut self, position: DVec3, text: &str);
}
