//! Transition Section Preview.
//!
//! Headless-Vorschau: baut ein Übergangsstück mit den Optionen aus der
//! TOML-Datei und gibt Geometrie und erzeugte Bauteile als JSON aus.

use anyhow::Context;
use glam::DVec3;
use serde::Serialize;
use transition_section_editor::app::host::memory::{MemoryInstance, MemoryModel};
use transition_section_editor::app::host::ComponentInput;
use transition_section_editor::{
    PluginOptions, SectionData, TransitionGeometry, TransitionSectionPlugin,
};

/// JSON-Ausgabe der Vorschau.
#[derive(Serialize)]
struct PreviewExport {
    options: PluginOptions,
    geometry: TransitionGeometry,
    model: MemoryModel,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!(
        "Transition Section Preview v{} startet...",
        env!("CARGO_PKG_VERSION")
    );

    let config_path = PluginOptions::config_path();
    let options = PluginOptions::load_from_file(&config_path);
    if !config_path.exists() {
        // Standardwerte als Vorlage zum Anpassen ablegen
        if let Err(e) = options.save_to_file(&config_path) {
            log::warn!("Optionen-Vorlage nicht geschrieben: {:#}", e);
        }
    }

    let instance = MemoryInstance::new(
        1,
        ComponentInput::polygon(vec![
            DVec3::ZERO,
            DVec3::new(0.0, 0.0, options.section_length),
        ]),
    );
    let geometry = SectionData::fetch(&instance, &options)
        .geometry()
        .context("Übergangsstück konnte nicht gebaut werden")?;

    let mut model = MemoryModel::default();
    TransitionSectionPlugin::new(options.clone()).run(&instance, &mut model);

    let export = PreviewExport {
        options,
        geometry,
        model,
    };
    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}
