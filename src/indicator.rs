use crate::{Ohlcv, PriceSource};

use std::fmt::{Debug, Display};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters
/// (lengths, multipliers). Configs are value types: cheap to
/// copy, compare, and hash. Lengths are [`NonZero`](std::num::NonZero) at
/// construction, so a config that exists is a config that can run.
pub trait IndicatorConfig: Sized + Copy + PartialEq + Eq + Display + Debug {
    /// Main lookback length (number of bars).
    fn length(&self) -> usize;

    /// Price source extracted from each bar.
    fn source(&self) -> PriceSource;
}

/// A technical indicator evaluated bar by bar over a closed history.
///
/// `compute` is fed the bars of one history in order and returns the value
/// for the bar just fed, or `None` while the lookback is not yet satisfied.
/// Instances are created per history and dropped afterwards; use
/// [`series`] to evaluate a whole history at once.
///
/// # Example
///
/// ```
/// use quantedge_analysis::{Indicator, Sma, SmaConfig, PriceBar};
/// use chrono::NaiveDate;
/// use std::num::NonZero;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// let bars: Vec<PriceBar> = [10.0, 20.0, 30.0]
///     .iter()
///     .enumerate()
///     .map(|(i, &c)| PriceBar::new(day + chrono::Days::new(i as u64), c, c, c, c, 0.0))
///     .collect();
///
/// let mut sma = Sma::new(SmaConfig::close(NonZero::new(3).unwrap()));
///
/// assert_eq!(sma.compute(&bars[0]), None);
/// assert_eq!(sma.compute(&bars[1]), None);
/// assert_eq!(sma.compute(&bars[2]), Some(20.0));
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. `f64` for simple indicators,
    /// a struct for composite ones (e.g. Bollinger Bands).
    type Output: Copy + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// Feeds the next bar and returns the indicator value at that bar,
    /// or `None` if the lookback is not yet satisfied.
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Self::Output>;

    /// Returns the last computed value without advancing state.
    fn value(&self) -> Option<Self::Output>;
}

/// Evaluates an indicator over a whole history.
///
/// The result is positionally aligned with `bars`: `result.len() == bars.len()`
/// and `result[i]` is the value at bar `i`, `None` where undefined.
pub fn series<I, B>(config: I::Config, bars: &[B]) -> Vec<Option<I::Output>>
where
    I: Indicator,
    B: Ohlcv,
{
    let mut indicator = I::new(config);
    bars.iter().map(|bar| indicator.compute(bar)).collect()
}
