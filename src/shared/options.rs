//! Zentrale Konfiguration der Übergangsstück- und Träger-Werkzeuge.
//!
//! `PluginOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Übergangsstück ──────────────────────────────────────────────────

/// Standard-Rechteckbreite (mm).
pub const RECTANGLE_WIDTH: f64 = 3000.0;
/// Standard-Rechteckhöhe (mm).
pub const RECTANGLE_HEIGHT: f64 = 6000.0;
/// Standard-Kreisradius (mm).
pub const CIRCLE_RADIUS: f64 = 1000.0;
/// Übergangslänge, wenn keine zwei Definitionspunkte vorliegen (mm).
pub const SECTION_LENGTH: f64 = 1000.0;
/// Rundungsschritt für gezogene Radien (mm).
pub const RADIUS_ROUNDING_STEP: f64 = 1.0;

// ── Bauteil-Eigenschaften ───────────────────────────────────────────

/// Blechprofil der Übergangsflächen.
pub const PLATE_PROFILE: &str = "PL10";
/// Standard-Material.
pub const MATERIAL: &str = "Steel_Undefined";
/// Standard-Oberflächenbehandlung.
pub const FINISH: &str = "PAINT";

// ── Träger / Polylinie ──────────────────────────────────────────────

/// Standard-Trägerprofil.
pub const BEAM_PROFILE: &str = "HEA300";
/// Profil für die Vorschau entlang von Polygon-Eingaben.
pub const POLYGON_PREVIEW_PROFILE: &str = "HEA200";
/// Verlängerungsfaktor Start -> Ende.
pub const LENGTH_FACTOR: f64 = 2.0;

// ── Vorschau ────────────────────────────────────────────────────────

/// Versatz der Polygon-Profilvorschau entlang lokal Z (mm).
pub const POLYGON_PREVIEW_OFFSET_Z: f64 = -100.0;
/// Versatz der Träger-Profilvorschau entlang lokal Z (mm).
pub const BEAM_PREVIEW_OFFSET_Z: f64 = -150.0;
/// Drehung der Träger-Profilvorschau (Grad).
pub const BEAM_PREVIEW_ROTATION_DEG: f64 = 90.0;

/// Laufzeit-Optionen (persistiert als TOML neben der Binary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginOptions {
    // ── Übergangsstück ───────────────────────────────────────────
    /// Rechteckbreite für neue Übergangsstücke
    pub rectangle_width: f64,
    /// Rechteckhöhe für neue Übergangsstücke
    pub rectangle_height: f64,
    /// Kreisradius für neue Übergangsstücke
    pub circle_radius: f64,
    /// Übergangslänge ohne zweiten Definitionspunkt
    pub section_length: f64,
    /// Rundungsschritt für den Radius beim Ziehen
    pub radius_rounding_step: f64,

    // ── Bauteil ──────────────────────────────────────────────────
    /// Blechprofil der Flächen
    pub plate_profile: String,
    /// Material
    pub material: String,
    /// Oberflächenbehandlung
    pub finish: String,

    // ── Träger ───────────────────────────────────────────────────
    /// Trägerprofil
    pub beam_profile: String,
    /// Vorschau-Profil entlang Polygon-Eingaben
    pub polygon_preview_profile: String,
    /// Verlängerungsfaktor
    pub length_factor: f64,

    // ── Vorschau ─────────────────────────────────────────────────
    /// Z-Versatz der Polygon-Vorschau
    pub polygon_preview_offset_z: f64,
    /// Z-Versatz der Träger-Vorschau
    pub beam_preview_offset_z: f64,
    /// Drehung der Träger-Vorschau in Grad
    pub beam_preview_rotation_deg: f64,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            rectangle_width: RECTANGLE_WIDTH,
            rectangle_height: RECTANGLE_HEIGHT,
            circle_radius: CIRCLE_RADIUS,
            section_length: SECTION_LENGTH,
            radius_rounding_step: RADIUS_ROUNDING_STEP,

            plate_profile: PLATE_PROFILE.to_string(),
            material: MATERIAL.to_string(),
            finish: FINISH.to_string(),

            beam_profile: BEAM_PROFILE.to_string(),
            polygon_preview_profile: POLYGON_PREVIEW_PROFILE.to_string(),
            length_factor: LENGTH_FACTOR,

            polygon_preview_offset_z: POLYGON_PREVIEW_OFFSET_Z,
            beam_preview_offset_z: BEAM_PREVIEW_OFFSET_Z,
            beam_preview_rotation_deg: BEAM_PREVIEW_ROTATION_DEG,
        }
    }
}

impl PluginOptions {
    /// Lädt Optionen aus einer TOML-Datei. Fallback auf Defaults bei Fehler.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("transition_section_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("transition_section_editor.toml")
    }

    /// Rundet einen Radius auf den konfigurierten Schritt.
    pub fn round_radius(&self, radius: f64) -> f64 {
        if self.radius_rounding_step > 0.0 {
            (radius / self.radius_rounding_step).round() * self.radius_rounding_step
        } else {
            radius
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let opts: PluginOptions =
            toml::from_str("rectangle_width = 2500.0\nmaterial = \"S355\"\n").expect("TOML");
        assert_eq!(opts.rectangle_width, 2500.0);
        assert_eq!(opts.material, "S355");
        assert_eq!(opts.rectangle_height, RECTANGLE_HEIGHT);
        assert_eq!(opts.beam_profile, BEAM_PROFILE);
    }

    #[test]
    fn toml_roundtrip_preserves_values() {
        let mut opts = PluginOptions::default();
        opts.length_factor = 3.5;
        opts.finish = "GALV".to_string();
        let text = toml::to_string_pretty(&opts).expect("Serialisierung");
        let back: PluginOptions = toml::from_str(&text).expect("Deserialisierung");
        assert_eq!(back, opts);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("transition_section_editor_missing_opts.toml");
        let _ = std::fs::remove_file(&path);
        assert_eq!(PluginOptions::load_from_file(&path), PluginOptions::default());
    }

    #[test]
    fn saved_file_loads_back() {
        let path = std::env::temp_dir().join("transition_section_editor_saved_opts.toml");
        let mut opts = PluginOptions::default();
        opts.circle_radius = 1250.0;
        opts.beam_profile = "HEB200".to_string();
        opts.save_to_file(&path).expect("Speichern");

        let loaded = PluginOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, opts);
    }

    #[test]
    fn radius_rounds_to_step() {
        let mut opts = PluginOptions::default();
        assert_eq!(opts.round_radius(1234.56), 1235.0);
        opts.radius_rounding_step = 50.0;
        assert_eq!(opts.round_radius(1234.56), 1250.0);
        opts.radius_rounding_step = 0.0;
        assert_eq!(opts.round_radius(1234.56), 1234.56);
    }
}
