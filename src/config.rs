use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Presage configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PresageConfig {
    /// I/O settings.
    #[serde(default)]
    pub io: IoToml,

    /// Filter settings.
    #[serde(default)]
    pub filter: FilterToml,
}

impl PresageConfig {
    /// Loads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config: {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    /// Telemetry capture CSV (rows = samples, columns = variables).
    pub input: Option<PathBuf>,
    /// Design matrix / predictions output CSV.
    pub output: Option<PathBuf>,
    /// Filter matrix CSV (rows = output modes, columns = history rows).
    pub matrix: Option<PathBuf>,
    /// Input selection mask CSV. Absent means all variables active.
    pub input_mask: Option<PathBuf>,
    /// Output selection mask CSV for the build stage.
    pub output_mask: Option<PathBuf>,
    /// Output data stream name.
    #[serde(default = "default_out_data")]
    pub out_data_name: String,
    /// Output mask stream name.
    #[serde(default = "default_out_mask")]
    pub out_mask_name: String,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            matrix: None,
            input_mask: None,
            output_mask: None,
            out_data_name: default_out_data(),
            out_mask_name: default_out_mask(),
        }
    }
}

fn default_out_data() -> String {
    "outPF".to_string()
}
fn default_out_mask() -> String {
    "outmask".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterToml {
    /// Colon-delimited GPU device set, e.g. ":2:3:5:". Empty means CPU.
    #[serde(default)]
    pub gpu_set: String,
    /// Predictive filter order (lagged time steps).
    #[serde(default = "default_order")]
    pub order: usize,
    /// Time latency in frames (fractional allowed).
    #[serde(default = "default_latency")]
    pub latency: f32,
    /// SVD cutoff, passed through to the external solver.
    #[serde(default = "default_svd_eps")]
    pub svd_eps: f64,
    /// Regularization coefficient for the penalty block.
    #[serde(default = "default_reg_lambda")]
    pub reg_lambda: f64,
    /// Whether the penalty block is appended to the design matrix.
    #[serde(default)]
    pub regularize: bool,
    /// Whether per-variable time averages are removed before packing.
    #[serde(default = "default_true")]
    pub remove_mean: bool,
    /// Loop gain, consumed downstream of this toolkit.
    #[serde(default = "default_loop_gain")]
    pub loop_gain: f32,
}

impl Default for FilterToml {
    fn default() -> Self {
        Self {
            gpu_set: String::new(),
            order: default_order(),
            latency: default_latency(),
            svd_eps: default_svd_eps(),
            reg_lambda: default_reg_lambda(),
            regularize: false,
            remove_mean: true,
            loop_gain: default_loop_gain(),
        }
    }
}

fn default_order() -> usize {
    10
}
fn default_latency() -> f32 {
    2.7
}
fn default_svd_eps() -> f64 {
    0.001
}
fn default_reg_lambda() -> f64 {
    0.001
}
fn default_true() -> bool {
    true
}
fn default_loop_gain() -> f32 {
    0.2
}
