use std::fmt::Display;

use serde::Serialize;

use crate::{IndicatorSeries, Price, engine::back_from_last};

/// Bars between the two short-SMA readings compared for slope.
const SLOPE_LOOKBACK: usize = 5;

/// Direction of the market from the close and the two SMAs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Trend {
    #[serde(rename = "Strong Uptrend")]
    StrongUptrend,
    Uptrend,
    #[serde(rename = "Strong Downtrend")]
    StrongDowntrend,
    Downtrend,
    Sideways,
}

impl Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::StrongUptrend => "Strong Uptrend",
            Self::Uptrend => "Uptrend",
            Self::StrongDowntrend => "Strong Downtrend",
            Self::Downtrend => "Downtrend",
            Self::Sideways => "Sideways",
        })
    }
}

/// RSI zone at the last bar: 70 and above is overbought, 30 and below oversold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RsiSignal {
    Overbought,
    Oversold,
    Neutral,
}

impl Display for RsiSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Position of the MACD line relative to its signal line at the last bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MacdSignal {
    Bullish,
    Bearish,
}

impl Display for MacdSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Indicator readings at the last bar, as consumed by the classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatestValues {
    pub close: Price,
    pub sma_short: Option<Price>,
    pub sma_long: Option<Price>,
    /// Short SMA five bars before the last one.
    pub sma_short_prev: Option<Price>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
}

impl LatestValues {
    /// Reads the last bar of `series`, or `None` for an empty history.
    #[must_use]
    pub fn from_series(series: &IndicatorSeries) -> Option<Self> {
        series.close.last().map(|&close| Self::at_close(close, series))
    }

    pub(crate) fn at_close(close: Price, series: &IndicatorSeries) -> Self {
        Self {
            close,
            sma_short: back_from_last(&series.sma_short, 0),
            sma_long: back_from_last(&series.sma_long, 0),
            sma_short_prev: back_from_last(&series.sma_short, SLOPE_LOOKBACK),
            rsi: back_from_last(&series.rsi, 0),
            macd: back_from_last(&series.macd, 0),
            macd_signal: back_from_last(&series.macd_signal, 0),
        }
    }
}

/// Classifies the trend; the first matching rule wins.
///
/// ```text
/// close > short > long, short rising over 5 bars   Strong Uptrend
/// close > short > long                             Uptrend
/// close < short < long, short falling over 5 bars  Strong Downtrend
/// close < short < long                             Downtrend
/// anything else, or an SMA undefined               Sideways
/// ```
#[must_use]
pub fn trend(latest: &LatestValues) -> Trend {
    let (Some(short), Some(long)) = (latest.sma_short, latest.sma_long) else {
        return Trend::Sideways;
    };
    let close = latest.close;

    if close > short && short > long {
        match latest.sma_short_prev {
            Some(prev) if short > prev => Trend::StrongUptrend,
            _ => Trend::Uptrend,
        }
    } else if close < short && short < long {
        match latest.sma_short_prev {
            Some(prev) if short < prev => Trend::StrongDowntrend,
            _ => Trend::Downtrend,
        }
    } else {
        Trend::Sideways
    }
}

/// `≥ 70` overbought, `≤ 30` oversold; undefined RSI is neutral.
#[must_use]
pub fn rsi_signal(rsi: Option<f64>) -> RsiSignal {
    match rsi {
        Some(rsi) if rsi >= 70.0 => RsiSignal::Overbought,
        Some(rsi) if rsi <= 30.0 => RsiSignal::Oversold,
        _ => RsiSignal::Neutral,
    }
}

/// Position of the MACD line against its signal line at the last bar.
///
/// `None` while either line is undefined.
#[must_use]
pub fn macd_signal(macd: Option<f64>, signal: Option<f64>) -> Option<MacdSignal> {
    let (macd, signal) = (macd?, signal?);
    Some(if macd > signal {
        MacdSignal::Bullish
    } else {
        MacdSignal::Bearish
    })
}
