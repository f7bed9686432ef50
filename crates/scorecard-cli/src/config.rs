//! Run settings: optional TOML file, overridden by command-line flags.
//!
//! ```toml
//! report_fields = "advanced"
//! report_line_start = 100
//! missing_type = "fail-card"
//! missing_method = "skip"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use scorecard_combine::{CombineOptions, MissingPolicy};
use scorecard_report::{RenderOptions, ReportFieldsLayout};

/// Settings file looked up inside the input directory.
pub const CONFIG_FILENAME: &str = "scorecard.toml";

/// Values from a settings file; absent keys keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub report_fields: Option<ReportFieldsLayout>,
    pub report_line_start: Option<u32>,
    pub missing_type: Option<MissingPolicy>,
    pub missing_method: Option<MissingPolicy>,
}

impl Settings {
    /// Field-wise merge; values set in `other` win.
    #[must_use]
    pub fn merged_with(self, other: Settings) -> Settings {
        Settings {
            report_fields: other.report_fields.or(self.report_fields),
            report_line_start: other.report_line_start.or(self.report_line_start),
            missing_type: other.missing_type.or(self.missing_type),
            missing_method: other.missing_method.or(self.missing_method),
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            render: RenderOptions {
                report_fields: self.report_fields.unwrap_or_default(),
                report_line_start: self.report_line_start.unwrap_or_default(),
            },
            combine: CombineOptions {
                missing_type: self.missing_type.unwrap_or_default(),
                missing_method: self.missing_method.unwrap_or_default(),
            },
        }
    }
}

/// Fully resolved options for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub render: RenderOptions,
    pub combine: CombineOptions,
}

pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read settings file {}", path.display()))?;
    let settings: Settings = toml::from_str(&content)
        .with_context(|| format!("parse settings file {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Picks the settings file for a run.
///
/// An explicit path must exist. Otherwise `scorecard.toml` in the input
/// directory is used when present, and defaults when it is not.
pub fn resolve_settings(explicit: Option<&Path>, input_dir: &Path) -> Result<Settings> {
    if let Some(path) = explicit {
        return load_settings(path);
    }
    let implicit: PathBuf = input_dir.join(CONFIG_FILENAME);
    if implicit.is_file() {
        load_settings(&implicit)
    } else {
        tracing::debug!(path = %implicit.display(), "no settings file, using defaults");
        Ok(Settings::default())
    }
}
