//! Technical analysis of daily price histories.
//!
//! [`analyze`] turns an ordered history of [`Ohlcv`] bars into aligned
//! indicator series, a summary with trend and momentum labels, and ranked
//! support/resistance levels. Everything is recomputed from the bars on each
//! call; nothing is kept between calls.
//!
//! The indicators are also usable on their own. Each one ([`Sma`], [`Ema`],
//! [`Macd`], [`Rsi`], [`Bb`], [`Stoch`], [`Obv`], [`Atr`]) is fed bars in
//! order and returns `None` until its lookback is satisfied. [`series`]
//! evaluates one over a whole history. [`new`](Sma::new),
//! [`compute`](Sma::compute) and [`value`](Sma::value) are also inherent
//! methods, so no trait import is needed. Import [`Indicator`] only for
//! generic code.
//!
//! # Example
//!
//! ```
//! use chrono::{Days, NaiveDate};
//! use quantedge_analysis::{AnalysisConfig, PriceBar, analyze};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let bars: Vec<PriceBar> = [10.0, 10.5, 10.2, 10.8, 11.1]
//!     .iter()
//!     .zip(0u64..)
//!     .map(|(&close, i)| PriceBar::new(start + Days::new(i), close, close, close, close, 500.0))
//!     .collect();
//!
//! let result = analyze(&bars, &AnalysisConfig::default()).unwrap();
//! assert_eq!(result.series.rsi.len(), 5);
//! assert!(result.series.rsi.iter().all(Option::is_none));
//! ```

mod analysis;
mod atr;
mod bb;
mod classifier;
mod config;
mod ema;
mod engine;
mod error;
mod indicator;
mod levels;
mod macd;
mod obv;
mod ohlcv;
mod price_source;
mod price_window;
mod rsi;
mod sma;
mod stoch;

pub use crate::analysis::{AnalysisResult, Summary, analyze};
pub use crate::classifier::{LatestValues, MacdSignal, RsiSignal, Trend, macd_signal, rsi_signal, trend};
pub use crate::config::{
    AnalysisConfig, BollingerSettings, EmaLengths, ResolvedConfig, SmaLengths, StochasticSettings,
};
pub use crate::engine::{IndicatorSeries, IndicatorSet};
pub use crate::error::{Error, Result};
pub use crate::indicator::{Indicator, IndicatorConfig, series};
pub use crate::levels::{Level, LevelConfig, LevelKind, LevelOrigin, Levels, detect as detect_levels};
pub use crate::ohlcv::{Ohlcv, Price, PriceBar};
pub use crate::price_source::PriceSource;

pub use crate::atr::{Atr, AtrConfig};
pub use crate::bb::{Bb, BbConfig, BbConfigBuilder, BbValue, StdDev};
pub use crate::ema::{Ema, EmaConfig};
pub use crate::macd::{Macd, MacdConfig, MacdValue};
pub use crate::obv::{Obv, ObvConfig};
pub use crate::rsi::{Rsi, RsiConfig};
pub use crate::sma::{Sma, SmaConfig};
pub use crate::stoch::{Stoch, StochConfig, StochValue};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<$output> {
                <Self as Indicator>::compute(self, ohlcv)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<$output> {
                <Self as Indicator>::value(self)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, Price);
impl_indicator_methods!(Ema, EmaConfig, Price);
impl_indicator_methods!(Macd, MacdConfig, MacdValue);
impl_indicator_methods!(Rsi, RsiConfig, f64);
impl_indicator_methods!(Bb, BbConfig, BbValue);
impl_indicator_methods!(Stoch, StochConfig, StochValue);
impl_indicator_methods!(Obv, ObvConfig, f64);
impl_indicator_methods!(Atr, AtrConfig, Price);

#[cfg(test)]
mod test_util;
