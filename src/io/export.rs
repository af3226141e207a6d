//! Export the per-channel table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::io::results::ChannelRecord;

/// Write per-channel results to a CSV file.
pub fn write_channels_csv(path: &Path, channels: &[ChannelRecord]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::config(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(
        file,
        "name,geometric_factor,effective_energy_mev,energy_margin_low_mev,energy_margin_high_mev,gf_stddev"
    )
    .map_err(|e| AppError::config(format!("Failed to write export CSV header: {e}")))?;

    for c in channels {
        let r = &c.result;
        writeln!(
            file,
            "{},{:.10e},{:.10},{:.10},{:.10},{}",
            c.name,
            r.geometric_factor,
            r.effective_energy,
            r.energy_margin_low,
            r.energy_margin_high,
            r.gf_stddev.map(|v| format!("{v:.10}")).unwrap_or_default(),
        )
        .map_err(|e| AppError::config(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
