//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen, die `app` und die Binary gemeinsam nutzen.

pub mod options;

pub use options::PluginOptions;
