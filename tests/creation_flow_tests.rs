//! Integrationstests für Pick-Sitzungen bis zur fertigen Instanz:
//! - Übergangsstück: Vorschau, Abschluss, Plugin-Lauf
//! - Träger mit genau zwei Picks
//! - Undo und Abbruch

use glam::DVec3;
use transition_section_editor::app::host::memory::{MemoryInstance, MemoryModel, RecordingGraphics};
use transition_section_editor::app::section_data::{ATTR_LENGTH_FACTOR, ATTR_PROFILE};
use transition_section_editor::app::{
    AttributeValue, BeamCreation, BeamPlugin, ComponentInput, CreationSession, InputRange, SessionPhase,
    TransitionSectionCreation, TransitionSectionPlugin,
};
use transition_section_editor::PluginOptions;

// ─── Übergangsstück ──────────────────────────────────────────────────────────

#[test]
fn test_transition_sitzung_erzeugt_instanz_mit_acht_blechen() {
    let options = PluginOptions::default();
    let mut session = CreationSession::new(TransitionSectionCreation::new(options.clone()));
    let mut graphics = RecordingGraphics::default();

    session.start().expect("Start fehlgeschlagen");
    session
        .on_object_picked(DVec3::new(500.0, 500.0, 0.0))
        .expect("Pick 1 fehlgeschlagen");
    assert!(session.on_input_validation_requested());

    session.on_preview_requested(DVec3::new(500.0, 500.0, 900.0), &mut graphics);
    assert_eq!(graphics.arc_count(), 8);
    assert_eq!(graphics.line_count(), 4 + 8);

    session
        .on_object_picked(DVec3::new(500.0, 500.0, 1500.0))
        .expect("Pick 2 fehlgeschlagen");
    assert!(!session.on_input_validation_requested());

    let finalized = session
        .on_pick_session_ended(&mut graphics)
        .expect("Sitzung ohne Ergebnis");
    assert!(graphics.primitives.is_empty());

    let mut instance = MemoryInstance::new(7, ComponentInput::default());
    finalized
        .apply_to(&mut instance)
        .expect("Eingabe nicht übernommen");

    let mut model = MemoryModel::default();
    assert!(TransitionSectionPlugin::new(options).run(&instance, &mut model));
    assert_eq!(model.lofted_plates.len(), 4);
    assert_eq!(model.contour_plates.len(), 4);

    // Kreis liegt im Abstand der beiden Picks über dem Schwerpunkt
    for plate in &model.lofted_plates {
        assert!((plate.top.center() - DVec3::new(500.0, 500.0, 1500.0)).length() < 1e-6);
        assert!((plate.top.radius() - 1000.0).abs() < 1e-6);
    }
}

#[test]
fn test_undo_ohne_picks_laesst_sitzung_unveraendert() {
    let mut session =
        CreationSession::new(TransitionSectionCreation::new(PluginOptions::default()));
    session.start().expect("Start fehlgeschlagen");

    assert_eq!(session.on_pick_undone(), None);
    assert_eq!(session.on_pick_undone(), None);
    assert_eq!(session.picks().len(), 0);
    assert_eq!(session.phase(), SessionPhase::Picking);

    // Sitzung bleibt benutzbar
    assert_eq!(session.on_object_picked(DVec3::ZERO), Ok(1));
}

#[test]
fn test_abbruch_erzeugt_keine_instanz() {
    let mut session =
        CreationSession::new(TransitionSectionCreation::new(PluginOptions::default()));
    let mut graphics = RecordingGraphics::default();
    session.start().expect("Start fehlgeschlagen");
    session.on_object_picked(DVec3::ZERO).expect("Pick");
    session.on_pick_session_interrupted(&mut graphics);

    assert_eq!(session.phase(), SessionPhase::Interrupted);
    assert!(session.on_pick_session_ended(&mut graphics).is_none());
}

// ─── Träger ──────────────────────────────────────────────────────────────────

#[test]
fn test_genau_zwei_picks_liefern_beide_punkte_in_reihenfolge() {
    let options = PluginOptions::default();
    let mut session = CreationSession::new(BeamCreation::with_range(
        options.clone(),
        InputRange::exactly(2),
    ));
    let mut graphics = RecordingGraphics::default();
    let first = DVec3::new(10.0, 20.0, 30.0);
    let second = DVec3::new(110.0, 20.0, 30.0);

    session.start().expect("Start fehlgeschlagen");
    session.on_object_picked(first).expect("Pick 1");
    session.on_object_picked(second).expect("Pick 2");
    assert!(session.on_object_picked(DVec3::ZERO).is_err());

    let finalized = session
        .on_pick_session_ended(&mut graphics)
        .expect("Sitzung ohne Ergebnis");
    assert_eq!(finalized.input.points(), vec![first, second]);
    assert_eq!(
        finalized.attributes.get(ATTR_PROFILE),
        Some(&AttributeValue::Text("HEA300".to_string()))
    );
    assert_eq!(
        finalized.attributes.get(ATTR_LENGTH_FACTOR),
        Some(&AttributeValue::Number(options.length_factor))
    );

    let mut instance = MemoryInstance::new(8, ComponentInput::default());
    finalized.apply_to(&mut instance).expect("Übernahme");
    let mut model = MemoryModel::default();
    assert!(BeamPlugin::new(options).run(&instance, &mut model));
    assert_eq!(model.beams.len(), 1);
    assert_eq!(model.beams[0].start, first);
    assert_eq!(model.beams[0].end, DVec3::new(210.0, 20.0, 30.0));
}
