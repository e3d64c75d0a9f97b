use rusty_stitch::config::StitchOptions;
use rusty_stitch::stitch::{stitch, MergeStrategy, OverlapPolicy, RawWindow, SampleSequence, StitchPipeline};
use rusty_stitch::SpectrumError;

fn options(strategy: MergeStrategy, overlap: OverlapPolicy) -> StitchOptions {
    StitchOptions {
        strategy,
        overlap,
        allow_gaps: false,
    }
}

/// Range scan on one shared pixel grid: window `w` covers x in
/// `[4w, 4w + 7]` at unit pitch, samples stored in descending order.
fn grid_scan(n: usize) -> Vec<RawWindow> {
    (0..n)
        .map(|w| {
            let pts: Vec<(f64, f64)> = (0..8)
                .rev()
                .map(|i| {
                    let x = (4 * w + i) as f64;
                    (x, 100.0 + x * 0.5)
                })
                .collect();
            RawWindow::from_points(&pts)
        })
        .collect()
}

#[test]
fn every_strategy_reconstructs_a_consistent_scan() {
    // all windows sample the same underlying line, so any blend reproduces it
    let windows = grid_scan(5);
    for strategy in [MergeStrategy::LinearAverage, MergeStrategy::WeightedRamp, MergeStrategy::SimpleCut] {
        let out = stitch(&windows, options(strategy, OverlapPolicy::BoundaryValue)).unwrap();
        assert_eq!(out.x(), (0..24).map(f64::from).collect::<Vec<_>>().as_slice(), "{strategy}");
        for (x, y) in out.points() {
            assert!((y - (100.0 + x * 0.5)).abs() < 1e-9, "{strategy} at {x}: {y}");
        }
    }
}

#[test]
fn anchored_policy_keeps_output_ascending() {
    let windows = grid_scan(4);
    for strategy in [MergeStrategy::LinearAverage, MergeStrategy::SimpleCut] {
        let out = stitch(&windows, options(strategy, OverlapPolicy::IndexAnchored)).unwrap();
        assert_eq!(out.x().len(), out.y().len());
        assert!(out.x().windows(2).all(|w| w[0] <= w[1]), "{strategy}");
        assert_eq!(out.last_x(), 19.0);
    }
}

#[test]
fn anchored_ramp_reports_uneven_overlap() {
    let err = stitch(&grid_scan(2), options(MergeStrategy::WeightedRamp, OverlapPolicy::IndexAnchored)).unwrap_err();
    assert_eq!(err, SpectrumError::MergeArity { left: 5, right: 4 });
}

#[test]
fn ramp_rejects_windows_of_different_density() {
    let windows = [
        RawWindow::from_points(&[(1.0, 1.0), (2.0, 1.0), (3.0, 1.0)]),
        RawWindow::from_points(&[(2.0, 2.0), (2.5, 2.0), (3.0, 2.0), (4.0, 2.0)]),
    ];
    let err = stitch(&windows, options(MergeStrategy::WeightedRamp, OverlapPolicy::BoundaryValue)).unwrap_err();
    assert_eq!(err, SpectrumError::MergeArity { left: 2, right: 3 });
}

#[test]
fn stitching_does_not_touch_caller_windows() {
    let windows = grid_scan(3);
    let before = windows.clone();
    stitch(&windows, StitchOptions::default()).unwrap();
    assert_eq!(windows, before);
}

#[test]
fn incremental_pipeline_matches_batch_stitch() {
    let windows = grid_scan(6);
    let opts = StitchOptions::default();

    let mut pipeline = StitchPipeline::new(opts);
    for w in &windows {
        pipeline.push(SampleSequence::from_window(w).unwrap()).unwrap();
    }
    assert_eq!(pipeline.windows(), 6);
    assert_eq!(pipeline.finish().unwrap(), stitch(&windows, opts).unwrap());
}

#[test]
fn first_error_aborts_the_fold() {
    let mut windows = grid_scan(3);
    windows.push(RawWindow::from_points(&[(100.0, 1.0), (101.0, 1.0)]));
    windows.extend(grid_scan(1));
    let err = stitch(&windows, StitchOptions::default()).unwrap_err();
    assert!(matches!(err, SpectrumError::NoOverlap { right_min, .. } if right_min == 100.0));
}
