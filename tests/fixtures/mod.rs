#![allow(dead_code)]

use chrono::NaiveDate;
use quantedge_analysis::PriceBar;
use serde::{Deserialize, de::DeserializeOwned};

/// Reference value keyed by bar date.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub date: NaiveDate,
    pub expected: f64,
}

#[derive(Debug, Deserialize)]
pub struct RefBbValue {
    pub date: NaiveDate,
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

#[derive(Debug, Deserialize)]
pub struct RefMacdValue {
    pub date: NaiveDate,
    pub macd: f64,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RefStochValue {
    pub date: NaiveDate,
    pub k: f64,
    pub d: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RefLevel {
    pub kind: String,
    pub price: f64,
    pub touch_count: usize,
    pub origin: String,
}

#[derive(Debug, Deserialize)]
pub struct RefSummary {
    pub as_of: NaiveDate,
    pub current_price: f64,
    pub high_52w: f64,
    pub low_52w: f64,
    pub avg_volume: f64,
    pub change_1d: f64,
}

const BARS_PATH: &str = "tests/fixtures/data/daily-bars.csv";

/// Two years of synthetic weekday bars.
pub fn load_reference_bars() -> Vec<PriceBar> {
    load_records(BARS_PATH, "invalid bar record")
}

/// Load single-value reference data (SMA, EMA, RSI, ATR, OBV).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

pub fn load_bb_ref(path: &str) -> Vec<RefBbValue> {
    load_records(path, "invalid BB reference record")
}

pub fn load_macd_ref(path: &str) -> Vec<RefMacdValue> {
    load_records(path, "invalid MACD reference record")
}

pub fn load_stoch_ref(path: &str) -> Vec<RefStochValue> {
    load_records(path, "invalid Stochastic reference record")
}

pub fn load_levels_ref(path: &str) -> Vec<RefLevel> {
    load_records(path, "invalid level reference record")
}

pub fn load_summary_ref(path: &str) -> RefSummary {
    load_records(path, "invalid summary record")
        .into_iter()
        .next()
        .expect("summary reference is empty")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Checks a positional series against date-keyed reference rows.
///
/// Every bar before the first reference date must be `None`, every bar from
/// it on must be `Some` and match.
pub fn assert_series_matches(
    name: &str,
    bars: &[PriceBar],
    actual: &[Option<f64>],
    reference: &[(NaiveDate, f64)],
    tolerance: f64,
) {
    assert_eq!(actual.len(), bars.len(), "{name}: series length");
    let first = bars
        .iter()
        .position(|bar| Some(bar.date) == reference.first().map(|r| r.0))
        .unwrap_or_else(|| panic!("{name}: first reference date not in bars"));

    assert!(
        actual[..first].iter().all(Option::is_none),
        "{name}: defined before {}",
        bars[first].date
    );
    assert_eq!(bars.len() - first, reference.len(), "{name}: reference row count");

    for ((bar, value), &(date, expected)) in bars[first..].iter().zip(&actual[first..]).zip(reference) {
        assert_eq!(bar.date, date, "{name}: reference out of step");
        let value = value.unwrap_or_else(|| panic!("{name} returned None at {date}"));
        assert_near(value, expected, tolerance, &format!("{name} at {date}"));
    }
}

/// Generate a reference test for a single-value series of [`IndicatorSeries`].
///
/// Usage: `reference_test!(sma_20, sma_short, "tests/fixtures/data/sma-20-close.csv", 1e-6);`
///
/// [`IndicatorSeries`]: quantedge_analysis::IndicatorSeries
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $column:ident, $ref_path:expr, $tolerance:expr) => {
        #[test]
        fn $name() {
            use quantedge_analysis::{IndicatorSeries, IndicatorSet};

            let bars = load_reference_bars();
            let series = IndicatorSeries::compute(&bars, &IndicatorSet::default());
            let reference: Vec<_> = load_ref_values($ref_path)
                .into_iter()
                .map(|r| (r.date, r.expected))
                .collect();

            assert_series_matches(stringify!($name), &bars, &series.$column, &reference, $tolerance);
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
