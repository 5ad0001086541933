use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, Ohlcv, Price, PriceSource, Sma, SmaConfig,
    price_window::PriceWindow,
};

/// Configuration for the Stochastic Oscillator ([`Stoch`]).
///
/// # Example
///
/// ```
/// use quantedge_analysis::{IndicatorConfig, StochConfig};
/// use std::num::NonZero;
///
/// let config = StochConfig::new(NonZero::new(14).unwrap(), NonZero::new(3).unwrap());
/// assert_eq!(config.length(), 14);
/// assert_eq!(config.d_length(), 3);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct StochConfig {
    k_length: NonZero<usize>,
    d_length: NonZero<usize>,
}

impl IndicatorConfig for StochConfig {
    /// The %K lookback.
    #[inline]
    fn length(&self) -> usize {
        self.k_length.get()
    }

    #[inline]
    fn source(&self) -> PriceSource {
        PriceSource::Close
    }
}

impl StochConfig {
    #[must_use]
    pub fn new(k_length: NonZero<usize>, d_length: NonZero<usize>) -> Self {
        Self { k_length, d_length }
    }

    /// Smoothing length of %D.
    #[must_use]
    pub fn d_length(&self) -> usize {
        self.d_length.get()
    }
}

const DEFAULT_K: NonZero<usize> = NonZero::new(14).unwrap();
const DEFAULT_D: NonZero<usize> = NonZero::new(3).unwrap();

impl Default for StochConfig {
    /// Stochastic(14, 3).
    fn default() -> Self {
        Self::new(DEFAULT_K, DEFAULT_D)
    }
}

impl Display for StochConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StochConfig({}, {})", self.k_length, self.d_length)
    }
}

/// Stochastic output at one bar: %K and, once smoothed, %D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochValue {
    k: Price,
    d: Option<Price>,
}

impl StochValue {
    /// Position of the close in the recent high/low range, 0–100.
    #[inline]
    #[must_use]
    pub fn k(&self) -> Price {
        self.k
    }

    /// SMA of %K.
    #[inline]
    #[must_use]
    pub fn d(&self) -> Option<Price> {
        self.d
    }
}

/// Stochastic Oscillator.
///
/// ```text
/// %K = (close − lowest low) / (highest high − lowest low) × 100
/// %D = SMA(d_length) of %K
/// ```
///
/// The highs and lows span the last `k_length` bars including the current
/// one. A zero-width range yields `%K = 0`.
#[derive(Clone, Debug)]
pub struct Stoch {
    config: StochConfig,
    highs: PriceWindow,
    lows: PriceWindow,
    d: Sma,
    current: Option<StochValue>,
}

impl Indicator for Stoch {
    type Config = StochConfig;
    type Output = StochValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            highs: PriceWindow::new(config.k_length.get()),
            lows: PriceWindow::new(config.k_length.get()),
            d: Sma::new(SmaConfig::close(config.d_length)),
            current: None,
        }
    }

    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Self::Output> {
        self.highs.push(ohlcv.high());
        self.lows.push(ohlcv.low());

        self.current = match (self.highs.max(), self.lows.min()) {
            (Some(highest), Some(lowest)) => {
                let range = highest - lowest;
                let k = if range == 0.0 {
                    0.0
                } else {
                    (ohlcv.close() - lowest) / range * 100.0
                };

                Some(StochValue {
                    k,
                    d: self.d.update(k),
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

impl Display for Stoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "STOCH({}, {})", self.config.k_length, self.config.d_length)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::series;
    use crate::test_util::{Bar, bars_from_closes, nz};

    fn stoch(k: usize, d: usize) -> Stoch {
        Stoch::new(StochConfig::new(nz(k), nz(d)))
    }

    mod alignment {
        use super::*;

        #[test]
        fn k_at_13_and_d_at_15_by_default() {
            let closes: Vec<f64> = (0..30).map(|i| 10.0 + f64::from(i % 5)).collect();
            let values = series::<Stoch, _>(StochConfig::default(), &bars_from_closes(&closes));
            assert!(values[..13].iter().all(Option::is_none));
            assert!(values[13..].iter().all(Option::is_some));
            assert!(values[13..15].iter().all(|v| v.unwrap().d().is_none()));
            assert!(values[15..].iter().all(|v| v.unwrap().d().is_some()));
        }
    }

    mod values {
        use super::*;

        #[test]
        fn k_locates_close_in_range() {
            let mut stoch = stoch(2, 1);
            stoch.compute(&Bar::new(0.0, 20.0, 10.0, 15.0));
            // low 10, high 30 over two bars; close 25 → 75
            let value = stoch.compute(&Bar::new(0.0, 30.0, 12.0, 25.0)).unwrap();
            assert_eq!(value.k(), 75.0);
            assert_eq!(value.d(), Some(75.0));
        }

        #[test]
        fn zero_range_gives_zero() {
            let values = series::<Stoch, _>(StochConfig::default(), &bars_from_closes(&[42.0; 20]));
            for value in values.into_iter().flatten() {
                assert_eq!(value.k(), 0.0);
                assert_eq!(value.d().unwrap_or(0.0), 0.0);
            }
        }

        #[test]
        fn d_is_mean_of_recent_k() {
            let mut stoch = stoch(1, 3);
            // k_length 1: %K = (close - low) / (high - low) × 100
            stoch.compute(&Bar::new(0.0, 10.0, 0.0, 10.0)); // 100
            stoch.compute(&Bar::new(0.0, 10.0, 0.0, 5.0)); // 50
            let value = stoch.compute(&Bar::new(0.0, 10.0, 0.0, 0.0)).unwrap(); // 0
            assert_eq!(value.k(), 0.0);
            assert_eq!(value.d(), Some(50.0));
        }

        #[test]
        fn stays_within_bounds() {
            let closes: Vec<f64> = (0..60).map(|i| 30.0 + (f64::from(i) * 0.9).sin() * 4.0).collect();
            let values = series::<Stoch, _>(StochConfig::default(), &bars_from_closes(&closes));
            for value in values.into_iter().flatten() {
                assert!((0.0..=100.0).contains(&value.k()));
            }
        }
    }

    #[test]
    fn display() {
        assert_eq!(stoch(14, 3).to_string(), "STOCH(14, 3)");
    }
}
