mod fixtures;

use fixtures::{assert_near, assert_series_matches, load_ref_values, reference_test};
use quantedge_analysis::{Sma, SmaConfig};
use std::num::NonZero;

use crate::fixtures::load_reference_bars;

const REF_PATH: &str = "tests/fixtures/data/sma-20-close.csv";

/// Tolerance: 1e-6.
/// SMA is pure arithmetic over a fixed window, no accumulated drift.
const TOLERANCE: f64 = 1e-6;

#[test]
fn sma_20_close_matches_reference() {
    let bars = load_reference_bars();
    let reference = load_ref_values(REF_PATH);

    let config = SmaConfig::close(NonZero::new(20).unwrap());
    let mut sma = Sma::new(config);

    let mut ref_idx = 0;
    for bar in &bars {
        sma.compute(bar);

        if ref_idx < reference.len() && bar.date == reference[ref_idx].date {
            let value = sma
                .value()
                .unwrap_or_else(|| panic!("SMA returned None at {}", bar.date));
            assert_near(
                value,
                reference[ref_idx].expected,
                TOLERANCE,
                &format!("SMA(20) at bar {ref_idx} ({})", bar.date),
            );
            ref_idx += 1;
        }
    }

    assert_eq!(
        ref_idx,
        reference.len(),
        "not all reference values checked: {ref_idx}/{}",
        reference.len()
    );
}

reference_test!(sma_short_series, sma_short, "tests/fixtures/data/sma-20-close.csv", TOLERANCE);
reference_test!(sma_long_series, sma_long, "tests/fixtures/data/sma-50-close.csv", TOLERANCE);
