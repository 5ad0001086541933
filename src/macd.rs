use std::{fmt::Display, num::NonZero};

use crate::{Ema, EmaConfig, Indicator, IndicatorConfig, Ohlcv, Price, PriceSource};

/// Configuration for the Moving Average Convergence Divergence ([`Macd`])
/// indicator.
///
/// The fast length must be strictly shorter than the slow length; the
/// constructor returns `None` otherwise.
///
/// # Example
///
/// ```
/// use quantedge_analysis::{IndicatorConfig, MacdConfig};
///
/// let config = MacdConfig::default();
/// assert_eq!(config.fast(), 12);
/// assert_eq!(config.length(), 26);
/// assert_eq!(config.signal(), 9);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MacdConfig {
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    signal: NonZero<usize>,
}

impl IndicatorConfig for MacdConfig {
    /// The slow EMA length, which bounds the lookback of the MACD line.
    #[inline]
    fn length(&self) -> usize {
        self.slow.get()
    }

    #[inline]
    fn source(&self) -> PriceSource {
        PriceSource::Close
    }
}

impl MacdConfig {
    /// MACD on closing price, or `None` unless `fast < slow`.
    #[must_use]
    pub fn close(fast: NonZero<usize>, slow: NonZero<usize>, signal: NonZero<usize>) -> Option<Self> {
        (fast < slow).then_some(Self { fast, slow, signal })
    }

    /// Fast EMA length.
    #[must_use]
    pub fn fast(&self) -> usize {
        self.fast.get()
    }

    /// Slow EMA length.
    #[must_use]
    pub fn slow(&self) -> usize {
        self.slow.get()
    }

    /// Signal line EMA length.
    #[must_use]
    pub fn signal(&self) -> usize {
        self.signal.get()
    }

    pub(crate) fn fast_ema(&self) -> EmaConfig {
        EmaConfig::close(self.fast)
    }

    pub(crate) fn slow_ema(&self) -> EmaConfig {
        EmaConfig::close(self.slow)
    }
}

const DEFAULT_FAST: NonZero<usize> = NonZero::new(12).unwrap();
const DEFAULT_SLOW: NonZero<usize> = NonZero::new(26).unwrap();
const DEFAULT_SIGNAL: NonZero<usize> = NonZero::new(9).unwrap();

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
            signal: DEFAULT_SIGNAL,
        }
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({}, {}, {}, {})",
            self.fast,
            self.slow,
            self.signal,
            self.source()
        )
    }
}

/// MACD output at one bar.
///
/// The MACD line is defined as soon as both EMAs are; the signal line and
/// histogram need `signal` further MACD values to seed, so they stay `None`
/// for the first `signal - 1` bars of the MACD line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    macd: Price,
    signal: Option<Price>,
}

impl MacdValue {
    /// `EMA(fast) − EMA(slow)`.
    #[inline]
    #[must_use]
    pub fn macd(&self) -> Price {
        self.macd
    }

    /// EMA of the MACD line.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> Option<Price> {
        self.signal
    }

    /// `MACD − signal`.
    #[inline]
    #[must_use]
    pub fn histogram(&self) -> Option<Price> {
        self.signal.map(|signal| self.macd - signal)
    }
}

/// Moving Average Convergence Divergence (MACD).
///
/// ```text
/// macd      = EMA(fast) − EMA(slow)
/// signal    = EMA(signal) of macd, seeded with the SMA of its first values
/// histogram = macd − signal
/// ```
///
/// With the default 12/26/9 the MACD line starts at bar index 25 and the
/// signal line at bar index 33.
#[derive(Clone, Debug)]
pub struct Macd {
    config: MacdConfig,
    fast: Ema,
    slow: Ema,
    signal: Ema,
    current: Option<MacdValue>,
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            fast: Ema::new(config.fast_ema()),
            slow: Ema::new(config.slow_ema()),
            signal: Ema::new(EmaConfig::close(config.signal)),
            current: None,
        }
    }

    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Self::Output> {
        let fast = self.fast.compute(ohlcv);
        let slow = self.slow.compute(ohlcv);

        self.current = match (fast, slow) {
            (Some(fast), Some(slow)) => {
                let macd = fast - slow;
                Some(MacdValue {
                    macd,
                    signal: self.signal.update(macd),
                })
            }
            _ => None,
        };

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {}, {})",
            self.config.fast, self.config.slow, self.config.signal, self.config.source()
        )
    }
}
