//! Read/write analysis JSON files.
//!
//! Analysis JSON is the "portable" representation of a completed run:
//! - the grid and spectral-family settings that produced it
//! - one record per channel (geometric factor, effective energy, margins,
//!   and the spread curve when it was requested)
//!
//! Saved files can be re-rendered later with `bowtie plot`.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AnalysisConfig, BowtieResult, SpectrumKind};
use crate::error::AppError;
use crate::grid::EnergyGrid;

/// Grid settings and realized size, for provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSummary {
    pub channels_per_decade: u32,
    pub min_energy: f64,
    pub max_energy: f64,
    pub step_count: usize,
}

/// Spectral-family settings, for provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectraSummary {
    pub kind: SpectrumKind,
    pub gamma_min: f64,
    pub gamma_max: f64,
    pub gamma_steps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutoff_energy: Option<f64>,
    pub integral_mode: bool,
}

/// One solved channel in the exported file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub name: String,
    #[serde(flatten)]
    pub result: BowtieResult,
}

/// The exported analysis file schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub grid: GridSummary,
    pub spectra: SpectraSummary,
    pub sigma: f64,
    pub channels: Vec<ChannelRecord>,
}

impl AnalysisFile {
    /// Assemble an export file from a run's configuration and outcomes.
    pub fn assemble(
        config: &AnalysisConfig,
        grid: &EnergyGrid,
        channels: Vec<ChannelRecord>,
    ) -> Self {
        Self {
            tool: "bowtie".to_string(),
            generated_at: Utc::now(),
            grid: GridSummary {
                channels_per_decade: config.channels_per_decade,
                min_energy: config.min_energy,
                max_energy: config.max_energy,
                step_count: grid.step_count,
            },
            spectra: SpectraSummary {
                kind: config.spectrum_kind,
                gamma_min: config.gamma_min,
                gamma_max: config.gamma_max,
                gamma_steps: config.gamma_steps,
                cutoff_energy: matches!(config.spectrum_kind, SpectrumKind::Cutoff)
                    .then_some(config.cutoff_energy),
                integral_mode: config.integral_mode,
            },
            sigma: config.sigma,
            channels,
        }
    }
}

/// Write an analysis JSON file.
pub fn write_analysis_json(path: &Path, analysis: &AnalysisFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::config(format!(
            "Failed to create analysis JSON '{}': {e}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, analysis)
        .map_err(|e| AppError::config(format!("Failed to write analysis JSON: {e}")))?;
    Ok(())
}

/// Read an analysis JSON file.
pub fn read_analysis_json(path: &Path) -> Result<AnalysisFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::config(format!(
            "Failed to open analysis JSON '{}': {e}",
            path.display()
        ))
    })?;
    let analysis: AnalysisFile = serde_json::from_reader(file)
        .map_err(|e| AppError::config(format!("Invalid analysis JSON: {e}")))?;
    Ok(analysis)
}
