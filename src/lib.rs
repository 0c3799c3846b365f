//! Transition Section Editor Library.
//! Parametrische Übergangsstücke Rechteck -> Kreis mit Handles und Pick-Sitzungen.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    CreationSession, ManipulationFeature, SectionData, TransitionSectionCreation,
    TransitionSectionPlugin,
};
pub use core::{
    Arc, CoordinateFrame, Curve, GeometryError, LineSegment, Polycurve, TransitionGeometry,
    TransitionParams,
};
pub use shared::PluginOptions;
