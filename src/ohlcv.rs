use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// OHLCV bar data used as input to every indicator and to [`analyze`](crate::analyze).
///
/// Implement this on your own candle type to avoid copying into
/// [`PriceBar`]. Bars are expected in trading-day order with strictly
/// increasing [`date`](Ohlcv::date) values; calendar gaps (weekends,
/// holidays) are normal and carry no meaning.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use quantedge_analysis::{Ohlcv, Price};
///
/// struct MyCandle {
///     day: NaiveDate,
///     o: f64, h: f64, l: f64, c: f64, v: f64,
/// }
///
/// impl Ohlcv for MyCandle {
///     fn date(&self) -> NaiveDate { self.day }
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn volume(&self) -> f64 { self.v }
/// }
/// ```
pub trait Ohlcv {
    /// Trading day the bar covers.
    fn date(&self) -> NaiveDate;

    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Traded volume. Defaults to `0.0`.
    ///
    /// Only volume-dependent indicators (OBV) and the volume summary read it.
    fn volume(&self) -> f64 {
        0.0
    }
}

/// A daily price bar as delivered by the market-data collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: f64,
}

impl PriceBar {
    #[must_use]
    pub fn new(date: NaiveDate, open: Price, high: Price, low: Price, close: Price, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl Ohlcv for PriceBar {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}

impl<T: Ohlcv> Ohlcv for &T {
    fn date(&self) -> NaiveDate {
        (*self).date()
    }

    fn open(&self) -> Price {
        (*self).open()
    }

    fn high(&self) -> Price {
        (*self).high()
    }

    fn low(&self) -> Price {
        (*self).low()
    }

    fn close(&self) -> Price {
        (*self).close()
    }

    fn volume(&self) -> f64 {
        (*self).volume()
    }
}
