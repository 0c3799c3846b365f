use super::*;
use crate::app::host::memory::{MemoryInstance, PreviewPrimitive, RecordingGraphics};
use crate::app::section_data::{
    ATTR_CIRCLE_RADIUS, ATTR_LENGTH_FACTOR, ATTR_PROFILE, ATTR_RECTANGLE_WIDTH,
};
use crate::shared::PluginOptions;

fn transition_session() -> CreationSession<TransitionSectionCreation> {
    CreationSession::new(TransitionSectionCreation::new(PluginOptions::default()))
}

#[test]
fn input_range_constructors() {
    assert_eq!(InputRange::exactly(2), InputRange { min: 2, max: 2 });
    assert_eq!(InputRange::at_most(2), InputRange { min: 1, max: 2 });
    assert!(InputRange::at_least(3).contains(10_000));
    assert!(!InputRange::exactly(2).contains(1));
}

#[test]
fn picks_are_rejected_before_start() {
    let mut session = transition_session();
    assert_eq!(
        session.on_object_picked(DVec3::ZERO),
        Err(SessionError::NotPicking(SessionPhase::NotStarted))
    );
    session.start().expect("Start");
    assert!(matches!(
        session.start(),
        Err(SessionError::AlreadyStarted(SessionPhase::Picking))
    ));
}

#[test]
fn session_stays_open_until_two_picks() {
    let mut session = transition_session();
    session.start().expect("Start");
    assert!(session.on_input_validation_requested());
    session.on_object_picked(DVec3::ZERO).expect("Pick 1");
    assert!(session.on_input_validation_requested());
    session
        .on_object_picked(DVec3::new(0.0, 0.0, 1000.0))
        .expect("Pick 2");
    assert!(!session.on_input_validation_requested());
    assert_eq!(
        session.on_object_picked(DVec3::X),
        Err(SessionError::TooManyPicks { max: 2 })
    );
}

#[test]
fn undo_on_empty_session_is_noop() {
    let mut session = transition_session();
    session.start().expect("Start");
    assert_eq!(session.on_pick_undone(), None);
    assert!(session.picks().is_empty());
    assert_eq!(session.phase(), SessionPhase::Picking);

    session.on_object_picked(DVec3::X).expect("Pick");
    assert_eq!(session.on_pick_undone(), Some(DVec3::X));
    assert_eq!(session.on_pick_undone(), None);
}

#[test]
fn non_finite_pick_is_rejected() {
    let mut session = transition_session();
    session.start().expect("Start");
    assert_eq!(
        session.on_object_picked(DVec3::new(f64::NAN, 0.0, 0.0)),
        Err(SessionError::NonFinitePick)
    );
    assert!(session.picks().is_empty());
}

#[test]
fn transition_preview_redraws_from_scratch_each_tick() {
    let mut session = transition_session();
    let mut graphics = RecordingGraphics::default();
    session.start().expect("Start");

    // Ohne Pick keine Vorschau, aber geleert
    session.on_preview_requested(DVec3::new(0.0, 0.0, 500.0), &mut graphics);
    assert!(graphics.primitives.is_empty());

    session.on_object_picked(DVec3::ZERO).expect("Pick");
    session.on_preview_requested(DVec3::new(0.0, 0.0, 500.0), &mut graphics);
    let first = graphics.primitives.len();
    assert_eq!(graphics.arc_count(), 8);
    session.on_preview_requested(DVec3::new(0.0, 0.0, 800.0), &mut graphics);
    assert_eq!(graphics.primitives.len(), first);
    assert_eq!(graphics.clear_count, 3);

    // Zeiger auf dem Pick: Länge 0, Vorschau wird übersprungen
    session.on_preview_requested(DVec3::ZERO, &mut graphics);
    assert!(graphics.primitives.is_empty());
}

#[test]
fn completed_transition_carries_dimensions() {
    let mut session = transition_session();
    let mut graphics = RecordingGraphics::default();
    session.start().expect("Start");
    session.on_object_picked(DVec3::ZERO).expect("Pick 1");
    session
        .on_object_picked(DVec3::new(0.0, 0.0, 1200.0))
        .expect("Pick 2");
    let finalized = session
        .on_pick_session_ended(&mut graphics)
        .expect("Eingabe erwartet");
    assert_eq!(session.phase(), SessionPhase::Completed);
    assert_eq!(
        finalized.input.points(),
        vec![DVec3::ZERO, DVec3::new(0.0, 0.0, 1200.0)]
    );
    assert_eq!(
        finalized.attributes.get(ATTR_RECTANGLE_WIDTH),
        Some(&AttributeValue::Number(3000.0))
    );

    let mut store = MemoryInstance::new(9, ComponentInput::default());
    finalized.apply_to(&mut store).expect("Übernahme");
    assert_eq!(store.committed_input().points().len(), 2);
    assert_eq!(
        store.committed_attribute(ATTR_CIRCLE_RADIUS),
        Some(&AttributeValue::Number(1000.0))
    );
}

#[test]
fn ending_with_too_few_picks_interrupts() {
    let mut session = transition_session();
    let mut graphics = RecordingGraphics::default();
    session.start().expect("Start");
    session.on_object_picked(DVec3::ZERO).expect("Pick");
    assert!(session.on_pick_session_ended(&mut graphics).is_none());
    assert_eq!(session.phase(), SessionPhase::Interrupted);
    assert!(session.picks().is_empty());
}

#[test]
fn interruption_clears_preview_and_picks() {
    let mut session = transition_session();
    let mut graphics = RecordingGraphics::default();
    session.start().expect("Start");
    session.on_object_picked(DVec3::ZERO).expect("Pick");
    session.on_preview_requested(DVec3::new(0.0, 0.0, 700.0), &mut graphics);
    assert!(!graphics.primitives.is_empty());

    session.on_pick_session_interrupted(&mut graphics);
    assert!(graphics.primitives.is_empty());
    assert_eq!(session.phase(), SessionPhase::Interrupted);
    assert!(session.on_pick_session_ended(&mut graphics).is_none());
    assert_eq!(
        session.on_object_picked(DVec3::X),
        Err(SessionError::NotPicking(SessionPhase::Interrupted))
    );
}

#[test]
fn beam_preview_extends_by_length_factor() {
    let mut session = CreationSession::new(BeamCreation::new(PluginOptions::default()));
    let mut graphics = RecordingGraphics::default();
    session.start().expect("Start");
    session
        .on_object_picked(DVec3::new(100.0, 0.0, 0.0))
        .expect("Pick");
    session.on_preview_requested(DVec3::new(200.0, 0.0, 0.0), &mut graphics);

    assert_eq!(graphics.primitives.len(), 1);
    match &graphics.primitives[0] {
        PreviewPrimitive::Profile {
            profile,
            segment,
            offset,
            rotation_deg,
        } => {
            assert_eq!(profile, "HEA300");
            assert_eq!(segment.start, DVec3::new(100.0, 0.0, 0.0));
            assert_eq!(segment.end, DVec3::new(300.0, 0.0, 0.0));
            assert_eq!(*offset, DVec3::new(0.0, 0.0, -150.0));
            assert_eq!(*rotation_deg, 90.0);
        }
        other => panic!("Profil erwartet, erhalten {other:?}"),
    }
}

#[test]
fn failed_apply_leaves_instance_unchanged() {
    let finalized = TransitionSectionCreation::new(PluginOptions::default())
        .finalize(&[DVec3::ZERO, DVec3::new(0.0, 0.0, 1000.0)]);
    let original = ComponentInput::polygon(vec![DVec3::X]);
    let mut store = MemoryInstance::new(4, original.clone()).with_attribute(ATTR_CIRCLE_RADIUS, 750.0);
    store.fail_modify = true;

    assert!(finalized.apply_to(&mut store).is_err());
    assert_eq!(store.input(), original);
    assert_eq!(
        store.attribute(ATTR_CIRCLE_RADIUS),
        Some(AttributeValue::Number(750.0))
    );
    assert_eq!(store.attribute(ATTR_RECTANGLE_WIDTH), None);
    assert_eq!(store.commit_count, 0);
}

#[test]
fn beam_finalize_packages_profile_and_length_factor() {
    let mut options = PluginOptions::default();
    options.beam_profile = "IPE240".to_string();
    options.length_factor = 1.5;
    let finalized = BeamCreation::new(options)
        .finalize(&[DVec3::ZERO, DVec3::new(500.0, 0.0, 0.0)]);

    assert_eq!(finalized.input.points().len(), 2);
    assert_eq!(
        finalized.attributes.get(ATTR_PROFILE),
        Some(&AttributeValue::Text("IPE240".to_string()))
    );
    assert_eq!(
        finalized.attributes.get(ATTR_LENGTH_FACTOR),
        Some(&AttributeValue::Number(1.5))
    );
}

#[test]
fn finalized_input_serializes_attributes_in_order() {
    let finalized = BeamCreation::new(PluginOptions::default())
        .finalize(&[DVec3::ZERO, DVec3::new(500.0, 0.0, 0.0)]);
    let json = serde_json::to_string(&finalized).expect("Serialisierung");
    assert!(json.find("Profile").expect("Profil") < json.find("LengthFactor").expect("Faktor"));

    let back: FinalizedInput = serde_json::from_str(&json).expect("Deserialisierung");
    assert_eq!(back, finalized);
}
