use std::num::NonZero;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    Atr, AtrConfig, Bb, BbConfig, Ema, Macd, MacdConfig, Obv, ObvConfig, Ohlcv, Price, Rsi,
    RsiConfig, Sma, SmaConfig, Stoch, StochConfig, indicator::series,
};

/// Typed configuration of every indicator the engine evaluates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSet {
    pub sma_short: SmaConfig,
    pub sma_long: SmaConfig,
    /// Also supplies the lengths of the exposed fast and slow EMA series.
    pub macd: MacdConfig,
    pub rsi: RsiConfig,
    pub bb: BbConfig,
    pub stoch: StochConfig,
    pub atr: AtrConfig,
}

const DEFAULT_SMA_SHORT: NonZero<usize> = NonZero::new(20).unwrap();
const DEFAULT_SMA_LONG: NonZero<usize> = NonZero::new(50).unwrap();
const DEFAULT_WILDER: NonZero<usize> = NonZero::new(14).unwrap();

impl Default for IndicatorSet {
    /// SMA 20/50, MACD 12/26/9, RSI 14, BB 20/2, Stochastic 14/3, ATR 14.
    fn default() -> Self {
        Self {
            sma_short: SmaConfig::close(DEFAULT_SMA_SHORT),
            sma_long: SmaConfig::close(DEFAULT_SMA_LONG),
            macd: MacdConfig::default(),
            rsi: RsiConfig::close(DEFAULT_WILDER),
            bb: BbConfig::builder().build(),
            stoch: StochConfig::default(),
            atr: AtrConfig::new(DEFAULT_WILDER),
        }
    }
}

/// Every indicator evaluated over one history.
///
/// Each vector is positionally aligned with the input bars and has the same
/// length; `None` marks positions where the indicator is not yet defined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub dates: Vec<NaiveDate>,
    pub close: Vec<Price>,
    pub volume: Vec<f64>,
    pub sma_short: Vec<Option<Price>>,
    pub sma_long: Vec<Option<Price>>,
    pub ema_fast: Vec<Option<Price>>,
    pub ema_slow: Vec<Option<Price>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_histogram: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<Price>>,
    pub bb_middle: Vec<Option<Price>>,
    pub bb_lower: Vec<Option<Price>>,
    pub stoch_k: Vec<Option<f64>>,
    pub stoch_d: Vec<Option<f64>>,
    pub obv: Vec<Option<f64>>,
    pub atr: Vec<Option<Price>>,
}

fn project<T: Copy>(values: &[Option<T>], field: impl Fn(T) -> Option<f64>) -> Vec<Option<f64>> {
    values.iter().map(|value| value.and_then(&field)).collect()
}

impl IndicatorSeries {
    /// Evaluates the whole indicator set over `bars`, one indicator at a time.
    pub fn compute<B: Ohlcv>(bars: &[B], set: &IndicatorSet) -> Self {
        let macd = series::<Macd, _>(set.macd, bars);
        let bb = series::<Bb, _>(set.bb, bars);
        let stoch = series::<Stoch, _>(set.stoch, bars);

        Self {
            dates: bars.iter().map(Ohlcv::date).collect(),
            close: bars.iter().map(Ohlcv::close).collect(),
            volume: bars.iter().map(Ohlcv::volume).collect(),
            sma_short: series::<Sma, _>(set.sma_short, bars),
            sma_long: series::<Sma, _>(set.sma_long, bars),
            ema_fast: series::<Ema, _>(set.macd.fast_ema(), bars),
            ema_slow: series::<Ema, _>(set.macd.slow_ema(), bars),
            macd_signal: project(&macd, |v| v.signal()),
            macd_histogram: project(&macd, |v| v.histogram()),
            macd: project(&macd, |v| Some(v.macd())),
            rsi: series::<Rsi, _>(set.rsi, bars),
            bb_upper: project(&bb, |v| Some(v.upper())),
            bb_middle: project(&bb, |v| Some(v.middle())),
            bb_lower: project(&bb, |v| Some(v.lower())),
            stoch_k: project(&stoch, |v| Some(v.k())),
            stoch_d: project(&stoch, |v| v.d()),
            obv: series::<Obv, _>(ObvConfig, bars),
            atr: series::<Atr, _>(set.atr, bars),
        }
    }

    /// Number of bars the series cover.
    #[must_use]
    pub fn len(&self) -> usize {
        self.close.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

/// Value of `values` at `back` bars before the last one, if defined.
pub(crate) fn back_from_last(values: &[Option<f64>], back: usize) -> Option<f64> {
    let index = values.len().checked_sub(back + 1)?;
    values[index]
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{Bar, bars_from_closes, day};

    fn wavy(n: i32) -> Vec<f64> {
        (0..n).map(|i| 50.0 + (f64::from(i) * 0.21).sin() * 6.0 + f64::from(i) * 0.05).collect()
    }

    fn first_defined(values: &[Option<f64>]) -> Option<usize> {
        values.iter().position(Option::is_some)
    }

    mod alignment {
        use super::*;

        #[test]
        fn every_series_matches_bar_count() {
            let bars = bars_from_closes(&wavy(120));
            let s = IndicatorSeries::compute(&bars, &IndicatorSet::default());
            for column in [
                &s.sma_short, &s.sma_long, &s.ema_fast, &s.ema_slow, &s.macd, &s.macd_signal,
                &s.macd_histogram, &s.rsi, &s.bb_upper, &s.bb_middle, &s.bb_lower, &s.stoch_k,
                &s.stoch_d, &s.obv, &s.atr,
            ] {
                assert_eq!(column.len(), 120);
            }
            assert_eq!(s.len(), 120);
            assert_eq!(s.dates.len(), 120);
            assert_eq!(s.volume.len(), 120);
        }

        #[test]
        fn first_defined_indices() {
            let bars = bars_from_closes(&wavy(120));
            let s = IndicatorSeries::compute(&bars, &IndicatorSet::default());
            assert_eq!(first_defined(&s.sma_short), Some(19));
            assert_eq!(first_defined(&s.sma_long), Some(49));
            assert_eq!(first_defined(&s.ema_fast), Some(11));
            assert_eq!(first_defined(&s.ema_slow), Some(25));
            assert_eq!(first_defined(&s.macd), Some(25));
            assert_eq!(first_defined(&s.macd_signal), Some(33));
            assert_eq!(first_defined(&s.macd_histogram), Some(33));
            assert_eq!(first_defined(&s.rsi), Some(14));
            assert_eq!(first_defined(&s.bb_middle), Some(19));
            assert_eq!(first_defined(&s.stoch_k), Some(13));
            assert_eq!(first_defined(&s.stoch_d), Some(15));
            assert_eq!(first_defined(&s.obv), Some(0));
            assert_eq!(first_defined(&s.atr), Some(14));
        }

        #[test]
        fn empty_history_gives_empty_series() {
            let bars: Vec<Bar> = Vec::new();
            let s = IndicatorSeries::compute(&bars, &IndicatorSet::default());
            assert!(s.is_empty());
            assert!(s.rsi.is_empty());
        }
    }

    mod columns {
        use super::*;

        #[test]
        fn bb_middle_matches_sma_short() {
            let bars = bars_from_closes(&wavy(80));
            let s = IndicatorSeries::compute(&bars, &IndicatorSet::default());
            assert_eq!(s.bb_middle, s.sma_short);
        }

        #[test]
        fn macd_is_fast_minus_slow() {
            let bars = bars_from_closes(&wavy(80));
            let s = IndicatorSeries::compute(&bars, &IndicatorSet::default());
            for i in 25..80 {
                assert_eq!(s.macd[i], Some(s.ema_fast[i].unwrap() - s.ema_slow[i].unwrap()));
            }
        }

        #[test]
        fn raw_columns_copy_the_bars() {
            let bars = bars_from_closes(&[3.0, 4.0, 5.0]);
            let s = IndicatorSeries::compute(&bars, &IndicatorSet::default());
            assert_eq!(s.close, vec![3.0, 4.0, 5.0]);
            assert_eq!(s.dates, vec![day(0), day(1), day(2)]);
            assert_eq!(s.volume, vec![1_000.0; 3]);
        }
    }

    #[test]
    fn back_from_last_indexes_from_the_end() {
        let values = [Some(1.0), None, Some(3.0), Some(4.0)];
        assert_eq!(back_from_last(&values, 0), Some(4.0));
        assert_eq!(back_from_last(&values, 2), None);
        assert_eq!(back_from_last(&values, 3), Some(1.0));
        assert_eq!(back_from_last(&values, 4), None);
    }
}
