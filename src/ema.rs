use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{Indicator, IndicatorConfig, Ohlcv, Price, PriceSource, Sma, SmaConfig};

/// Configuration for the Exponential Moving Average ([`Ema`])
/// indicator.
///
/// # Example
///
/// ```
/// use quantedge_analysis::{EmaConfig, IndicatorConfig};
/// use std::num::NonZero;
///
/// let config = EmaConfig::close(NonZero::new(12).unwrap());
/// assert_eq!(config.length(), 12);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    length: NonZero<usize>,
}

impl IndicatorConfig for EmaConfig {
    #[inline]
    fn length(&self) -> usize {
        self.length.get()
    }

    #[inline]
    fn source(&self) -> PriceSource {
        PriceSource::Close
    }
}

impl EmaConfig {
    /// EMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self { length }
    }

    /// Smoothing factor `k = 2 / (length + 1)`.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let denominator = (self.length.get() + 1) as f64;
        2.0 / denominator
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({}, {})", self.length, self.source())
    }
}

/// Exponential Moving Average (EMA).
///
/// A weighted moving average that gives more weight to recent
/// prices. Uses the standard smoothing factor
/// `k = 2 / (length + 1)`:
///
/// ```text
/// EMA[n-1] = SMA(n)[n-1]
/// EMA[i]   = k × price[i] + (1 − k) × EMA[i-1]
/// ```
///
/// The first `length` bars are collected to compute the SMA
/// seed. After seeding the SMA state is dropped and each bar
/// costs a single fused multiply-add.
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
    sma: Option<Sma>,
    alpha: f64,
    current: Option<Price>,
}

impl Ema {
    /// Feeds a value directly instead of a bar's close.
    ///
    /// Used to smooth derived lines such as the MACD signal.
    #[inline]
    pub(crate) fn update(&mut self, price: Price) -> Option<Price> {
        if let Some(sma) = &mut self.sma {
            self.current = sma.update(price);
        } else if let Some(previous) = self.current {
            self.current = Some(self.alpha.mul_add(price - previous, previous));
        }

        if self.current.is_some() {
            self.sma = None;
        }

        self.current
    }
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            alpha: config.alpha(),
            sma: Some(Sma::new(SmaConfig::close(config.length))),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Price> {
        self.update(ohlcv.close())
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.length, self.config.source())
    }
}
