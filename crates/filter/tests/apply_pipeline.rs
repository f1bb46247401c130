//! End-to-end filter application over a short replay.

use presage_filter::{
    resolve_output_binding, CycleCompute, DenseCpuMultiply, FilterApplyEngine, FilterMatrix,
    GridShape, IndexMap,
};
use presage_stream::StreamStore;

/// Two active inputs, order K=3, one output, all-ones 1x6 filter.
/// Feeding [1,1], [2,2], [3,3] yields 2, 6, 12.
#[test]
fn three_cycle_warmup_scenario() {
    let map = IndexMap::select(GridShape::new(2, 1), None).unwrap();
    let matrix = FilterMatrix::new(6, 1, vec![1.0; 6]).unwrap();
    let mut engine =
        FilterApplyEngine::new(matrix, map, Box::new(DenseCpuMultiply::new())).unwrap();
    assert_eq!(engine.n_steps(), 3);

    let mut store = StreamStore::new();
    let binding = resolve_output_binding(&mut store, "outPF", "outmask", 1).unwrap();

    let inputs = [[1.0f32, 1.0], [2.0, 2.0], [3.0, 3.0]];
    let expected = [2.0f32, 6.0, 12.0];
    for (input, want) in inputs.iter().zip(expected) {
        let out = store.resolve_mut(&binding.data).unwrap();
        engine.compute_cycle(input, out).unwrap();
        assert_eq!(out.as_slice()[0], want);
    }

    let out = store.resolve(&binding.data).unwrap();
    assert_eq!(out.update_count(), 3);
    assert_eq!(out.post_count(), 3);
    assert!(!out.is_writing());
}

/// Masked inputs: only the selected grid positions feed the window.
#[test]
fn masked_replay() {
    // 2x2 grid, only positions 1 and 2 active.
    let mask = [0.0, 1.0, 1.0, 0.0];
    let map = IndexMap::select(GridShape::new(2, 2), Some(&mask)).unwrap();
    assert_eq!(map.len(), 2);

    // K = 1: prediction is a plain weighted sum of the current sample.
    let matrix = FilterMatrix::new(2, 2, vec![1.0, 0.0, 0.0, 1.0]).unwrap();
    let mut engine =
        FilterApplyEngine::new(matrix, map, Box::new(DenseCpuMultiply::new())).unwrap();

    let mut store = StreamStore::new();
    let binding = resolve_output_binding(&mut store, "outPF", "outmask", 2).unwrap();
    let out = store.resolve_mut(&binding.data).unwrap();

    engine.compute_cycle(&[9.0, 10.0, 11.0, 12.0], out).unwrap();
    assert_eq!(&out.as_slice()[..2], &[10.0, 11.0]);
}

/// Steady-state check past warm-up: the window holds exactly the last K
/// samples and the prediction tracks them.
#[test]
fn steady_state_tracks_last_k_samples() {
    let map = IndexMap::select(GridShape::new(1, 1), None).unwrap();
    // K = 4, weights 1, 10, 100, 1000 by age.
    let matrix = FilterMatrix::new(4, 1, vec![1.0, 10.0, 100.0, 1000.0]).unwrap();
    let mut engine =
        FilterApplyEngine::new(matrix, map, Box::new(DenseCpuMultiply::new())).unwrap();

    let mut store = StreamStore::new();
    let binding = resolve_output_binding(&mut store, "outPF", "outmask", 1).unwrap();

    let mut last = 0.0;
    for i in 1..=10 {
        let out = store.resolve_mut(&binding.data).unwrap();
        engine.compute_cycle(&[i as f32], out).unwrap();
        last = out.as_slice()[0];
    }
    // Cycle 10: window is [10, 9, 8, 7] under weights [1, 10, 100, 1000].
    assert_eq!(last, 10.0 + 90.0 + 800.0 + 7000.0);
}
