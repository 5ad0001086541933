use std::{fmt::Display, num::NonZero};

use crate::{Indicator, IndicatorConfig, Ohlcv, Price, PriceSource};

/// Configuration for the Average True Range ([`Atr`]).
///
/// # Example
///
/// ```
/// use quantedge_analysis::{AtrConfig, IndicatorConfig};
/// use std::num::NonZero;
///
/// let config = AtrConfig::new(NonZero::new(14).unwrap());
/// assert_eq!(config.length(), 14);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct AtrConfig {
    length: NonZero<usize>,
}

impl IndicatorConfig for AtrConfig {
    #[inline]
    fn length(&self) -> usize {
        self.length.get()
    }

    #[inline]
    fn source(&self) -> PriceSource {
        PriceSource::TrueRange
    }
}

impl AtrConfig {
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self { length }
    }
}

impl Display for AtrConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AtrConfig({})", self.length)
    }
}

#[derive(Clone, Debug)]
enum AtrPhase {
    Seeding { sum: f64, seen: usize },
    Active { atr: f64 },
}

/// Average True Range (ATR) with Wilder's smoothing.
///
/// True range needs the previous close, so the first bar contributes
/// nothing. The first `length` true ranges (bars `1..=length`) are averaged
/// into the seed, which lands on bar index `length`:
///
/// ```text
/// ATR[length] = mean(TR[1..=length])
/// ATR[i]      = (ATR[i-1] × (length − 1) + TR[i]) / length
/// ```
#[derive(Clone, Debug)]
pub struct Atr {
    config: AtrConfig,
    prev_close: Option<Price>,
    phase: AtrPhase,
    current: Option<Price>,
}

impl Indicator for Atr {
    type Config = AtrConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            prev_close: None,
            phase: AtrPhase::Seeding { sum: 0.0, seen: 0 },
            current: None,
        }
    }

    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Self::Output> {
        let true_range = PriceSource::TrueRange.extract(ohlcv, self.prev_close);
        self.prev_close = Some(ohlcv.close());

        let Some(true_range) = true_range else {
            return self.current;
        };

        let length = self.config.length.get();
        #[allow(clippy::cast_precision_loss)]
        let length_f = length as f64;

        self.current = match &mut self.phase {
            AtrPhase::Seeding { sum, seen } => {
                *sum += true_range;
                *seen += 1;

                if *seen == length {
                    let atr = *sum / length_f;
                    self.phase = AtrPhase::Active { atr };
                    Some(atr)
                } else {
                    None
                }
            }
            AtrPhase::Active { atr } => {
                *atr = atr.mul_add(length_f - 1.0, true_range) / length_f;
                Some(*atr)
            }
        };

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Display for Atr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ATR({})", self.config.length)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::series;
    use crate::test_util::{Bar, nz};

    fn candle(high: f64, low: f64, close: f64) -> Bar {
        Bar::new(close, high, low, close)
    }

    mod seeding {
        use super::*;

        #[test]
        fn first_value_at_index_length() {
            let bars: Vec<Bar> = (0..20).map(|_| candle(105.0, 95.0, 100.0)).collect();
            let values = series::<Atr, _>(AtrConfig::new(nz(14)), &bars);
            assert!(values[..14].iter().all(Option::is_none));
            assert_eq!(values[14], Some(10.0));
        }

        #[test]
        fn seed_is_mean_of_first_true_ranges() {
            let mut atr = Atr::new(AtrConfig::new(nz(3)));
            assert_eq!(atr.compute(&candle(102.0, 98.0, 101.0)), None);
            // TR: 5, 6, 6
            atr.compute(&candle(104.0, 99.0, 103.0));
            atr.compute(&candle(106.0, 100.0, 105.0));
            assert_eq!(atr.compute(&candle(108.0, 102.0, 107.0)), Some(17.0 / 3.0));
        }
    }

    mod smoothing {
        use super::*;

        #[test]
        fn wilder_recurrence() {
            let mut atr = Atr::new(AtrConfig::new(nz(2)));
            atr.compute(&candle(10.0, 10.0, 10.0));
            atr.compute(&candle(12.0, 10.0, 11.0)); // TR 2
            assert_eq!(atr.compute(&candle(15.0, 11.0, 14.0)), Some(3.0)); // TR 4
            // (3 × 1 + 1) / 2
            assert_eq!(atr.compute(&candle(14.5, 13.5, 14.0)), Some(2.0));
        }

        #[test]
        fn gap_counts_towards_range() {
            let mut atr = Atr::new(AtrConfig::new(nz(1)));
            atr.compute(&candle(100.0, 95.0, 95.0));
            // |115 - 95| = 20 beats the bar's own range of 7
            assert_eq!(atr.compute(&candle(115.0, 108.0, 112.0)), Some(20.0));
        }
    }

    #[test]
    fn display() {
        assert_eq!(Atr::new(AtrConfig::new(nz(14))).to_string(), "ATR(14)");
    }
}
