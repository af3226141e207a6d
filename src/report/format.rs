//! Formatted terminal output for analysis runs.
//!
//! We keep formatting code in one place so:
//! - the solver code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{AnalysisConfig, SpectrumKind};
use crate::io::ChannelRecord;

/// Unit label for the geometric factor in the current fold mode.
pub fn gf_unit(integral_mode: bool) -> &'static str {
    if integral_mode { "cm2 sr" } else { "cm2 sr MeV" }
}

/// Format the run header (grid, spectral family, instrument settings).
pub fn format_run_summary(config: &AnalysisConfig, step_count: usize) -> String {
    let mut out = String::new();

    out.push_str("=== bowtie - Channel Response Characterization ===\n");
    out.push_str(&format!(
        "Grid: {}/decade | energy=[{}, {}] MeV | {} steps\n",
        config.channels_per_decade, config.min_energy, config.max_energy, step_count
    ));
    out.push_str(&format!(
        "Spectra: {} | gamma=[{}, {}] x{}{}\n",
        config.spectrum_kind.label(),
        config.gamma_min,
        config.gamma_max,
        config.gamma_steps,
        match config.spectrum_kind {
            SpectrumKind::Cutoff => format!(" | E0={} MeV", config.cutoff_energy),
            SpectrumKind::PowerLaw => String::new(),
        },
    ));
    out.push_str(&format!(
        "Fold: {}\n",
        if config.integral_mode {
            "integral"
        } else {
            "differential"
        }
    ));
    out.push_str(&format!(
        "Instrument: {} channels over [{}, {}] MeV | noise={} (seed {})\n",
        config.channel_count, config.channel_lo, config.channel_hi, config.noise, config.seed
    ));
    out.push_str(&format!("Sigma: {}\n", config.sigma));
    out.push('\n');

    out
}

/// Format the per-channel result lines, one channel per line, plus any
/// channels that were skipped with the reason.
pub fn format_channel_table(
    channels: &[ChannelRecord],
    skipped: &[(String, String)],
    integral_mode: bool,
) -> String {
    let unit = gf_unit(integral_mode);
    let mut out = String::new();

    for c in channels {
        let r = &c.result;
        let band = if r.energy_margin_low > 0.0 && r.energy_margin_high > 0.0 {
            format!(
                "band = [{:.3}, {:.3}] MeV",
                r.energy_margin_low, r.energy_margin_high
            )
        } else {
            "band = n/a".to_string()
        };
        let stddev = match r.gf_stddev {
            Some(sd) => format!("; dG/G = {:.1}%", 100.0 * sd),
            None => String::new(),
        };
        out.push_str(&format!(
            "Channel {}: G = {:.4e} {unit}; E = {:.3} MeV; {band}{stddev}\n",
            c.name, r.geometric_factor, r.effective_energy
        ));
    }

    for (name, reason) in skipped {
        out.push_str(&format!("  (skipped {name}) {reason}\n"));
    }

    out
}
