use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// Named threshold presets, ordered loosest to strictest.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum ConfigStyle {
    Permissive,
    Moderate,
    Aggressive,
}

/// Threshold bundle for the row filter funnel, plus the loader/writer shape
/// flags. One bundle is shared unchanged across every shard of a run.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Maximum allowed line length.
    pub max_ll: i32,
    /// Minimum allowed file size in bytes.
    pub min_len: i32,
    /// Minimum allowed maximum line length.
    pub min_max_ll: i32,
    /// Maximum allowed file size in kilobytes.
    pub max_size_kbs: i32,
    /// Lower bound (exclusive) on the alphanumeric fraction.
    pub min_alphanum: f32,
    /// Upper bound (exclusive) on the alphanumeric fraction.
    pub max_alphanum: f32,
    /// Lower bound (exclusive) on the average line length.
    pub min_ave_ll: f32,
    /// Minimum estimated line count (`file_size / avg_line_length`).
    pub min_lines: i32,
    /// Input shards are already in the canonical slim schema.
    #[serde(default)]
    pub is_slim: bool,
    /// Carry the original row index into the output tables.
    #[serde(default)]
    pub keep_index: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            max_ll: 600,
            min_len: 50,
            min_max_ll: 25,
            max_size_kbs: 1_000,
            min_alphanum: 0.001,
            max_alphanum: 0.975,
            min_ave_ll: 16.0,
            min_lines: 3,
            is_slim: false,
            keep_index: false,
        }
    }
}

impl FilterConfig {
    /// Builds the threshold bundle for a named preset.
    pub fn from_style(style: ConfigStyle) -> Self {
        match style {
            ConfigStyle::Permissive => FilterConfig {
                max_ll: 1_200,
                min_len: 8,
                min_max_ll: 5,
                max_size_kbs: 1_000,
                min_alphanum: 0.0001,
                max_alphanum: 0.99,
                min_ave_ll: 8.0,
                min_lines: 2,
                ..Default::default()
            },
            ConfigStyle::Moderate => FilterConfig {
                max_ll: 600,
                min_len: 50,
                min_max_ll: 25,
                max_size_kbs: 750,
                min_alphanum: 0.001,
                max_alphanum: 0.975,
                min_ave_ll: 16.0,
                min_lines: 3,
                ..Default::default()
            },
            ConfigStyle::Aggressive => FilterConfig {
                max_ll: 300,
                min_len: 100,
                min_max_ll: 32,
                max_size_kbs: 500,
                min_alphanum: 0.0025,
                max_alphanum: 0.97,
                min_ave_ll: 20.0,
                min_lines: 5,
                ..Default::default()
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_max_ll > self.max_ll {
            return Err(PipelineError::ConfigValidationError(format!(
                "FilterConfig: min_max_ll ({}) must not exceed max_ll ({})",
                self.min_max_ll, self.max_ll
            )));
        }
        if self.min_len < 0 {
            return Err(PipelineError::ConfigValidationError(format!(
                "FilterConfig: min_len ({}) must not be negative",
                self.min_len
            )));
        }
        if self.max_size_kbs <= 0 {
            return Err(PipelineError::ConfigValidationError(format!(
                "FilterConfig: max_size_kbs ({}) must be greater than 0",
                self.max_size_kbs
            )));
        }
        if !(0.0..=1.0).contains(&self.min_alphanum) || !(0.0..=1.0).contains(&self.max_alphanum) {
            return Err(PipelineError::ConfigValidationError(format!(
                "FilterConfig: alphanumeric bounds ({}, {}) must lie in [0, 1]",
                self.min_alphanum, self.max_alphanum
            )));
        }
        if self.min_alphanum >= self.max_alphanum {
            return Err(PipelineError::ConfigValidationError(format!(
                "FilterConfig: min_alphanum ({}) must be below max_alphanum ({})",
                self.min_alphanum, self.max_alphanum
            )));
        }
        if self.min_lines < 0 {
            return Err(PipelineError::ConfigValidationError(format!(
                "FilterConfig: min_lines ({}) must not be negative",
                self.min_lines
            )));
        }
        Ok(())
    }
}
