use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use presage_filter::{
    parse_gpu_set, resolve_output_binding, CycleCompute, DenseCpuMultiply, FilterApplyEngine,
    FilterMatrix, IndexMap,
};
use presage_stream::StreamStore;

use crate::build_cmd::{read_capture, read_mask};
use crate::cli::ApplyArgs;
use crate::config::PresageConfig;
use crate::matio;

/// Replay a telemetry capture through a predictive filter, cycle by
/// cycle, and write one prediction row per sample.
pub fn run(args: ApplyArgs) -> Result<()> {
    let config = PresageConfig::load(&args.config)?;

    let input = args
        .input
        .or(config.io.input)
        .ok_or_else(|| anyhow!("no capture path: set [io].input in config or use --input"))?;
    let matrix_path = args
        .matrix
        .or(config.io.matrix)
        .ok_or_else(|| anyhow!("no filter matrix path: set [io].matrix or use --matrix"))?;
    let output = args
        .output
        .or(config.io.output)
        .ok_or_else(|| anyhow!("no output path: set [io].output in config or use --output"))?;

    // This replay host carries no GPU executor. A configured device set
    // selects the GPU path, and a missing backend on that path is a fatal
    // configuration error, not a silent CPU fallback.
    let devices = parse_gpu_set(&config.filter.gpu_set);
    if !devices.is_empty() {
        bail!(
            "GPU device set {:?} configured, but `presage apply` has no GPU executor; \
             clear [filter].gpu_set to use the CPU path",
            config.filter.gpu_set
        );
    }

    let capture = read_capture(&input)?;
    let input_mask = read_mask(config.io.input_mask.as_deref(), capture.ncells())?;

    let m = matio::read_matrix(&matrix_path)
        .with_context(|| format!("failed to read filter matrix {}", matrix_path.display()))?;
    // Filter matrix CSV: one row per output mode, one column per history slot.
    let matrix = FilterMatrix::new(m.n_cols, m.n_rows, m.data)?;

    let map = IndexMap::select(capture.grid_shape(), input_mask.as_deref())?;
    let mut engine = FilterApplyEngine::new(matrix, map, Box::new(DenseCpuMultiply::new()))?;
    let n_out = engine.n_out();

    let mut store = StreamStore::new();
    let binding = resolve_output_binding(
        &mut store,
        &config.io.out_data_name,
        &config.io.out_mask_name,
        n_out,
    )?;

    let mut predictions = Vec::with_capacity(capture.nbspl() * n_out);
    for t in 0..capture.nbspl() {
        let out = store.resolve_mut(&binding.data)?;
        engine.compute_cycle(capture.sample(t), out)?;
        predictions.extend_from_slice(&out.as_slice()[..n_out]);
    }

    matio::write_matrix(&output, capture.nbspl(), n_out, &predictions)?;
    info!(
        path = %output.display(),
        cycles = capture.nbspl(),
        n_out,
        "predictions written"
    );
    Ok(())
}
