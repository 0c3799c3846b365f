//! Application-Layer: Host-Schnittstellen, Handles, Manipulation und Erzeugung.

pub mod creation;
pub mod handles;
/// Host-Kollaborateure
///
/// Instanz-Zugriff, Vorschau-Fläche und eine In-Memory-Implementierung
/// für Tests und die Vorschau-Binary.
pub mod host;
pub mod manipulation;
pub mod plugin;
pub mod preview;
pub mod section_data;

pub use creation::{
    BeamCreation, CreationFeature, CreationSession, FinalizedInput, InputRange, SessionError,
    SessionPhase, TransitionSectionCreation,
};
pub use handles::{
    ContextId, DistanceManipulator, HandleError, HandleId, HandleManager, LineHandle, PointHandle,
};
pub use host::{
    AttributeValue, ComponentInput, InputItem, InstanceId, InstanceStore, ObjectRef,
    PreviewGraphics,
};
pub use manipulation::{
    DragCommit, DragInput, DragStatus, ManipulationContext, ManipulationError,
    ManipulationFeature, ValueField,
};
pub use plugin::{BeamPlugin, ModelWriter, TransitionSectionPlugin};
pub use section_data::SectionData;
