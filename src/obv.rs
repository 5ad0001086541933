use std::fmt::Display;

use crate::{Indicator, IndicatorConfig, Ohlcv, Price, PriceSource};

/// Configuration for On-Balance Volume ([`Obv`]). OBV has no lookback; the
/// config only exists so OBV fits the [`Indicator`] interface.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default)]
pub struct ObvConfig;

impl IndicatorConfig for ObvConfig {
    #[inline]
    fn length(&self) -> usize {
        1
    }

    #[inline]
    fn source(&self) -> PriceSource {
        PriceSource::Close
    }
}

impl Display for ObvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObvConfig")
    }
}

/// On-Balance Volume (OBV).
///
/// Cumulative volume signed by the direction of the close:
///
/// ```text
/// OBV[0] = 0
/// OBV[i] = OBV[i-1] + volume[i]   if close[i] > close[i-1]
///        = OBV[i-1] − volume[i]   if close[i] < close[i-1]
///        = OBV[i-1]               otherwise
/// ```
#[derive(Clone, Debug, Default)]
pub struct Obv {
    prev_close: Option<Price>,
    current: Option<f64>,
}

impl Indicator for Obv {
    type Config = ObvConfig;
    type Output = f64;

    fn new(_config: Self::Config) -> Self {
        Self::default()
    }

    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Self::Output> {
        let close = ohlcv.close();

        let next = match (self.prev_close, self.current) {
            (Some(prev), Some(obv)) if close > prev => obv + ohlcv.volume(),
            (Some(prev), Some(obv)) if close < prev => obv - ohlcv.volume(),
            (_, Some(obv)) => obv,
            (_, None) => 0.0,
        };

        self.prev_close = Some(close);
        self.current = Some(next);
        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Display for Obv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OBV")
    }
}
