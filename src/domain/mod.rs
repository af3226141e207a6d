//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the spectral family descriptors (`SpectrumKind`, `ModelSpectrum`)
//! - channel responses tabulated on a shared grid (`ChannelResponse`)
//! - solver inputs and outputs (`SolveOptions`, `BowtieResult`, `SpreadCurve`)
//! - the assembled run configuration (`AnalysisConfig`)

pub mod types;

pub use types::*;
