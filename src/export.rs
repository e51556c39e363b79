//! Result export: raw sample and percentile summary CSV files.
//!
//! Layout under the results directory:
//!
//! ```text
//! <dir>/temp/<slug>_raw_<scenario>.csv   Volume column, one row per sample
//! <dir>/temp/<slug>_<scenario>.csv       Place, 10th, 50th, 90th percentile
//! <dir>/<slug>_summary.csv               one row per scenario
//! <dir>/<slug>_outcomes.json             every outcome, when enabled
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::OutputConfig;
use crate::error::{CleanupError, CleanupResult};
use crate::scenarios::{ScenarioOutcome, VolumeReport};

/// Sub-directory for per-scenario files.
pub const SCENARIO_DIR: &str = "temp";

/// Header of the per-scenario summary CSV.
pub const SUMMARY_HEADER: &str = "Place,10th Percentile,50th Percentile,90th Percentile";

/// Header of the combined summary CSV.
pub const COMBINED_HEADER: &str = "Scenario,Exposure,Surfaces,Min thickness (mm),Max thickness (mm),\
Area min (m2),Area max (m2),10th Percentile,50th Percentile,90th Percentile";

/// Write raw samples with a single `Volume` column.
///
/// # Errors
///
/// Returns error if the file cannot be created or written.
pub fn write_raw_csv(path: &Path, samples: &[f64]) -> CleanupResult<()> {
    let mut writer = create(path)?;
    writeln!(writer, "Volume").map_err(|e| CleanupError::io(format!("Write header failed: {e}")))?;
    for volume in samples {
        writeln!(writer, "{volume}")
            .map_err(|e| CleanupError::io(format!("Write row failed: {e}")))?;
    }
    finish(writer)
}

/// Write the percentile summary of one report.
///
/// # Errors
///
/// Returns error if the file cannot be created or written.
pub fn write_summary_csv(path: &Path, report: &VolumeReport) -> CleanupResult<()> {
    let mut writer = create(path)?;
    writeln!(writer, "{SUMMARY_HEADER}")
        .map_err(|e| CleanupError::io(format!("Write header failed: {e}")))?;
    writeln!(
        writer,
        "{},{},{},{}",
        csv_field(&report.place),
        report.p10,
        report.p50,
        report.p90
    )
    .map_err(|e| CleanupError::io(format!("Write row failed: {e}")))?;
    finish(writer)
}

/// Write one summary row per outcome.
///
/// # Errors
///
/// Returns error if the file cannot be created or written.
pub fn write_combined_csv(path: &Path, outcomes: &[ScenarioOutcome]) -> CleanupResult<()> {
    let mut writer = create(path)?;
    writeln!(writer, "{COMBINED_HEADER}")
        .map_err(|e| CleanupError::io(format!("Write header failed: {e}")))?;
    for outcome in outcomes {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{}",
            csv_field(&outcome.name),
            csv_field(&outcome.exposure),
            outcome.surfaces,
            outcome.scenario.thickness.min_mm(),
            outcome.scenario.thickness.max_mm(),
            outcome.bounds.area_min(),
            outcome.bounds.area_max(),
            outcome.report.p10,
            outcome.report.p50,
            outcome.report.p90
        )
        .map_err(|e| CleanupError::io(format!("Write row failed: {e}")))?;
    }
    finish(writer)
}

/// Write outcomes as pretty-printed JSON.
///
/// # Errors
///
/// Returns error if serialization or writing fails.
pub fn write_json(path: &Path, outcomes: &[ScenarioOutcome]) -> CleanupResult<()> {
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, outcomes)
        .map_err(|e| CleanupError::serialization(format!("JSON export failed: {e}")))?;
    finish(writer)
}

fn create(path: &Path) -> CleanupResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        CleanupError::io(format!("Failed to create {}: {e}", path.display()))
    })?;
    Ok(BufWriter::new(file))
}

fn finish(mut writer: BufWriter<File>) -> CleanupResult<()> {
    writer
        .flush()
        .map_err(|e| CleanupError::io(format!("Flush failed: {e}")))
}

/// Quote a text field if it contains a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Writes plan outcomes into a results directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    directory: PathBuf,
    summary_csv: bool,
    raw_csv: bool,
    json: bool,
}

impl ReportWriter {
    /// Writer producing every file under `directory`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            summary_csv: true,
            raw_csv: true,
            json: false,
        }
    }

    /// Writer following an output configuration.
    #[must_use]
    pub fn from_config(config: &OutputConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            summary_csv: config.summary_csv,
            raw_csv: config.raw_csv,
            json: config.json,
        }
    }

    /// Enable or disable summary CSVs.
    #[must_use]
    pub const fn with_summary(mut self, enabled: bool) -> Self {
        self.summary_csv = enabled;
        self
    }

    /// Enable or disable raw sample CSVs.
    #[must_use]
    pub const fn with_raw(mut self, enabled: bool) -> Self {
        self.raw_csv = enabled;
        self
    }

    /// Enable or disable the JSON dump of all outcomes.
    #[must_use]
    pub const fn with_json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// Results directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the raw sample file for a scenario.
    #[must_use]
    pub fn raw_path(&self, slug: &str, scenario: &str) -> PathBuf {
        self.directory
            .join(SCENARIO_DIR)
            .join(format!("{slug}_raw_{scenario}.csv"))
    }

    /// Path of the per-scenario summary file.
    #[must_use]
    pub fn summary_path(&self, slug: &str, scenario: &str) -> PathBuf {
        self.directory
            .join(SCENARIO_DIR)
            .join(format!("{slug}_{scenario}.csv"))
    }

    /// Path of the combined summary file.
    #[must_use]
    pub fn combined_path(&self, slug: &str) -> PathBuf {
        self.directory.join(format!("{slug}_summary.csv"))
    }

    /// Path of the JSON outcome file.
    #[must_use]
    pub fn json_path(&self, slug: &str) -> PathBuf {
        self.directory.join(format!("{slug}_outcomes.json"))
    }

    /// Write every enabled file for `outcomes`, returning the paths written.
    ///
    /// # Errors
    ///
    /// Returns error if a directory or file cannot be created or written.
    pub fn write_all(&self, slug: &str, outcomes: &[ScenarioOutcome]) -> CleanupResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        if !self.summary_csv && !self.raw_csv && !self.json {
            debug!("File output disabled");
            return Ok(written);
        }

        let csv = self.summary_csv || self.raw_csv;
        let root = if csv {
            self.directory.join(SCENARIO_DIR)
        } else {
            self.directory.clone()
        };
        fs::create_dir_all(&root)
            .map_err(|e| CleanupError::io(format!("Failed to create {}: {e}", root.display())))?;

        for outcome in outcomes {
            if self.raw_csv {
                let path = self.raw_path(slug, &outcome.name);
                write_raw_csv(&path, &outcome.report.raw_samples)?;
                debug!(path = %path.display(), "Wrote raw samples");
                written.push(path);
            }
            if self.summary_csv {
                let path = self.summary_path(slug, &outcome.name);
                write_summary_csv(&path, &outcome.report)?;
                debug!(path = %path.display(), "Wrote scenario summary");
                written.push(path);
            }
        }

        if self.summary_csv {
            let path = self.combined_path(slug);
            write_combined_csv(&path, outcomes)?;
            written.push(path);
        }

        if self.json {
            let path = self.json_path(slug);
            write_json(&path, outcomes)?;
            debug!(path = %path.display(), "Wrote JSON outcomes");
            written.push(path);
        }

        info!(
            directory = %self.directory.display(),
            files = written.len(),
            "Exported results"
        );
        Ok(written)
    }
}
