mod fixtures;

use fixtures::{
    RefBbValue, assert_near, assert_series_matches, load_bb_ref, load_ref_values, reference_test,
};
use quantedge_analysis::{Bb, BbConfig, IndicatorSeries, IndicatorSet};
use std::num::NonZero;

use crate::fixtures::load_reference_bars;

const BB_REF_PATH: &str = "tests/fixtures/data/bb-20-2-close.csv";

/// Tolerance: 1e-6.
/// BB involves sqrt which adds minor FP noise beyond the SMA middle.
const TOLERANCE: f64 = 1e-6;

#[test]
fn bb_20_2_close_matches_reference() {
    let bars = load_reference_bars();
    let reference = load_bb_ref(BB_REF_PATH);

    let mut bb = Bb::new(BbConfig::close(NonZero::new(20).unwrap()));

    let mut ref_idx = 0;
    for bar in &bars {
        bb.compute(bar);

        if ref_idx < reference.len() && bar.date == reference[ref_idx].date {
            let value = bb
                .value()
                .unwrap_or_else(|| panic!("BB returned None at {}", bar.date));
            let ctx = format!("BB(20,2) at bar {ref_idx} ({})", bar.date);
            let expected = &reference[ref_idx];

            assert_near(value.upper(), expected.upper, TOLERANCE, &format!("{ctx} upper"));
            assert_near(value.middle(), expected.middle, TOLERANCE, &format!("{ctx} middle"));
            assert_near(value.lower(), expected.lower, TOLERANCE, &format!("{ctx} lower"));
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

#[test]
fn bb_series_columns_match_reference() {
    let bars = load_reference_bars();
    let series = IndicatorSeries::compute(&bars, &IndicatorSet::default());
    let reference = load_bb_ref(BB_REF_PATH);

    let check = |column: &str, actual: &[Option<f64>], pick: fn(&RefBbValue) -> f64| {
        let expected: Vec<_> = reference.iter().map(|r| (r.date, pick(r))).collect();
        assert_series_matches(column, &bars, actual, &expected, TOLERANCE);
    };

    check("bb_upper", &series.bb_upper, |r| r.upper);
    check("bb_middle", &series.bb_middle, |r| r.middle);
    check("bb_lower", &series.bb_lower, |r| r.lower);
    assert_eq!(series.bb_middle, series.sma_short);
}

reference_test!(atr_14_series, atr, "tests/fixtures/data/atr-14.csv", TOLERANCE);
