use anyhow::{anyhow, Context, Result};
use tracing::info;

use presage_design::{build_design_matrix, build_target_matrix, DesignConfig, TelemetryCapture};

use crate::cli::BuildArgs;
use crate::config::PresageConfig;
use crate::matio;

/// Build the regression design matrix (and optionally the paired target
/// matrix) from a recorded telemetry capture.
pub fn run(args: BuildArgs) -> Result<()> {
    let config = PresageConfig::load(&args.config)?;

    let input = args
        .input
        .or(config.io.input)
        .ok_or_else(|| anyhow!("no capture path: set [io].input in config or use --input"))?;
    let output = args
        .output
        .or(config.io.output)
        .ok_or_else(|| anyhow!("no output path: set [io].output in config or use --output"))?;

    let order = args.order.unwrap_or(config.filter.order);
    let latency = args.latency.unwrap_or(config.filter.latency);

    // Solver parameters pass through to the external least-squares stage;
    // logged here so a capture build is traceable to its settings.
    info!(
        latency,
        svd_eps = config.filter.svd_eps,
        reg_lambda = config.filter.reg_lambda,
        loop_gain = config.filter.loop_gain,
        "build parameters"
    );

    let capture = read_capture(&input)?;
    let input_mask = read_mask(config.io.input_mask.as_deref(), capture.ncells())?;
    let output_mask = read_mask(config.io.output_mask.as_deref(), capture.ncells())?;

    let mut design_config = DesignConfig::new(order)
        .with_latency(latency)
        .with_remove_mean(config.filter.remove_mean);
    if config.filter.regularize {
        design_config = design_config.with_regularization(config.filter.reg_lambda);
    }

    let design = build_design_matrix(&capture, input_mask.as_deref(), &design_config)?;
    matio::write_matrix(&output, design.n_rows(), design.n_cols(), design.as_slice())?;
    info!(
        path = %output.display(),
        n_rows = design.n_rows(),
        n_cols = design.n_cols(),
        "design matrix written"
    );

    if let Some(target_path) = args.target {
        let target = build_target_matrix(&capture, output_mask.as_deref(), &design_config)?;
        matio::write_matrix(
            &target_path,
            target.n_rows(),
            target.n_cols(),
            target.as_slice(),
        )?;
        info!(
            path = %target_path.display(),
            n_rows = target.n_rows(),
            n_cols = target.n_cols(),
            "target matrix written"
        );
    }

    Ok(())
}

/// Reads a capture CSV: rows are samples, columns are variables.
pub fn read_capture(path: &std::path::Path) -> Result<TelemetryCapture> {
    let m = matio::read_matrix(path)?;
    TelemetryCapture::from_2d(m.n_cols, m.n_rows, m.data)
        .with_context(|| format!("invalid capture in {}", path.display()))
}

/// Reads an optional selection mask CSV and flattens it row-major.
pub fn read_mask(path: Option<&std::path::Path>, ncells: usize) -> Result<Option<Vec<f32>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let m = matio::read_matrix(path)?;
    if m.data.len() != ncells {
        anyhow::bail!(
            "{}: mask has {} cells, capture has {}",
            path.display(),
            m.data.len(),
            ncells
        );
    }
    Ok(Some(m.data))
}
