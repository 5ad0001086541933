use chrono::{Months, NaiveDate};
use serde::Serialize;
use tracing::{debug, debug_span};

use crate::{
    AnalysisConfig, Error, IndicatorSeries, LatestValues, Levels, MacdSignal,
    Ohlcv, Price, Result, RsiSignal, Trend, classifier, engine::back_from_last, levels,
};

/// Headline figures for the last bar of a history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Date of the last bar.
    pub as_of: NaiveDate,
    pub current_price: Price,
    /// Highest high over the trailing 52 weeks.
    pub high_52w: Price,
    /// Lowest low over the trailing 52 weeks.
    pub low_52w: Price,
    /// Mean volume over the trailing 52 weeks.
    pub avg_volume: f64,
    pub change_1d: Option<Price>,
    pub change_pct_1d: Option<f64>,
    pub trend: Trend,
    pub rsi: Option<f64>,
    pub rsi_signal: RsiSignal,
    pub macd_signal: Option<MacdSignal>,
    pub sma_short: Option<Price>,
    pub sma_short_length: usize,
    pub sma_long: Option<Price>,
    pub sma_long_length: usize,
    pub atr: Option<Price>,
}

/// Everything derived from one price history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub summary: Summary,
    pub levels: Levels,
    pub series: IndicatorSeries,
}

/// Checks every bar and returns the last one.
fn validate_bars<B: Ohlcv>(bars: &[B]) -> Result<&B> {
    let Some(last) = bars.last() else {
        return Err(Error::InsufficientData);
    };

    for (index, bar) in bars.iter().enumerate() {
        let prices = [
            (bar.open(), "open is not finite"),
            (bar.high(), "high is not finite"),
            (bar.low(), "low is not finite"),
            (bar.close(), "close is not finite"),
        ];
        if let Some(&(_, reason)) = prices.iter().find(|(price, _)| !price.is_finite()) {
            return Err(Error::InvalidBar { index, reason });
        }

        let volume = bar.volume();
        if !volume.is_finite() {
            return Err(Error::InvalidBar {
                index,
                reason: "volume is not finite",
            });
        }
        if volume < 0.0 {
            return Err(Error::InvalidBar {
                index,
                reason: "volume is negative",
            });
        }

        if index > 0 && bar.date() <= bars[index - 1].date() {
            return Err(Error::UnorderedBars { index });
        }
    }

    Ok(last)
}

/// Bars dated within one calendar year of `last`.
fn trailing_year<'a, B: Ohlcv>(bars: &'a [B], last: &B) -> &'a [B] {
    let Some(cutoff) = last.date().checked_sub_months(Months::new(12)) else {
        return bars;
    };
    &bars[bars.partition_point(|bar| bar.date() <= cutoff)..]
}

fn summarize<B: Ohlcv>(
    bars: &[B],
    last: &B,
    series: &IndicatorSeries,
    latest: &LatestValues,
    config: &AnalysisConfig,
) -> Summary {
    let year = trailing_year(bars, last);

    let high_52w = year.iter().map(Ohlcv::high).fold(f64::NEG_INFINITY, f64::max);
    let low_52w = year.iter().map(Ohlcv::low).fold(f64::INFINITY, f64::min);
    #[allow(clippy::cast_precision_loss)]
    let avg_volume = year.iter().map(Ohlcv::volume).sum::<f64>() / year.len() as f64;

    let previous = bars.len().checked_sub(2).map(|i| bars[i].close());
    let change_1d = previous.map(|prev| last.close() - prev);
    let change_pct_1d = previous
        .zip(change_1d)
        .filter(|&(prev, _)| prev != 0.0)
        .map(|(prev, change)| change / prev * 100.0);

    Summary {
        as_of: last.date(),
        current_price: last.close(),
        high_52w,
        low_52w,
        avg_volume,
        change_1d,
        change_pct_1d,
        trend: classifier::trend(latest),
        rsi: latest.rsi,
        rsi_signal: classifier::rsi_signal(latest.rsi),
        macd_signal: classifier::macd_signal(latest.macd, latest.macd_signal),
        sma_short: latest.sma_short,
        sma_short_length: config.sma_lengths.short,
        sma_long: latest.sma_long,
        sma_long_length: config.sma_lengths.long,
        atr: back_from_last(&series.atr, 0),
    }
}

/// Analyzes one price history: indicator series, a summary with trend and
/// momentum labels, and support/resistance levels around the last close.
///
/// The configuration is validated before any computation. A history shorter
/// than an indicator's lookback is not an error; the affected values are
/// `None` and the level lists may be empty.
///
/// # Errors
///
/// - [`Error::InvalidConfiguration`] when `config` fails
///   [`validate`](AnalysisConfig::validate).
/// - [`Error::InsufficientData`] for an empty history.
/// - [`Error::InvalidBar`] for a non-finite price or a negative or
///   non-finite volume.
/// - [`Error::UnorderedBars`] when dates are not strictly increasing.
///
/// # Example
///
/// ```
/// use chrono::{Days, NaiveDate};
/// use quantedge_analysis::{AnalysisConfig, PriceBar, Trend, analyze};
///
/// let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
/// let bars: Vec<PriceBar> = (0..120u32)
///     .map(|i| {
///         let close = 100.0 + f64::from(i);
///         PriceBar::new(start + Days::new(u64::from(i)), close, close + 1.0, close - 1.0, close, 1_000.0)
///     })
///     .collect();
///
/// let result = analyze(&bars, &AnalysisConfig::default()).unwrap();
/// assert_eq!(result.summary.current_price, 219.0);
/// assert_eq!(result.summary.trend, Trend::StrongUptrend);
/// assert_eq!(result.series.close.len(), 120);
/// ```
pub fn analyze<B: Ohlcv>(bars: &[B], config: &AnalysisConfig) -> Result<AnalysisResult> {
    let span = debug_span!("analyze", bars = bars.len());
    let _guard = span.enter();

    let resolved = config.validate()?;
    let last = validate_bars(bars)?;

    let series = IndicatorSeries::compute(bars, &resolved.indicators);
    debug!(
        first = ?series.dates.first(),
        last = ?series.dates.last(),
        "indicator series computed"
    );

    let latest = LatestValues::at_close(last.close(), &series);
    let levels = levels::detect(&series.close, latest.close, &resolved.levels);
    let summary = summarize(bars, last, &series, &latest, config);

    debug!(
        trend = %summary.trend,
        rsi_signal = %summary.rsi_signal,
        support = levels.support.len(),
        resistance = levels.resistance.len(),
        "analysis complete"
    );

    Ok(AnalysisResult {
        summary,
        levels,
        series,
    })
}
