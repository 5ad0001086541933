use crate::{Ohlcv, Price};

use std::fmt::{Debug, Display};

/// Price extracted from an [`Ohlcv`] bar before it is fed into an indicator.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum PriceSource {
    /// Closing price.
    #[default]
    Close,
    /// True range: `max(high - low, |high - prev_close|, |low - prev_close|)`.
    ///
    /// Undefined on the first bar of a history, there is no previous close
    /// to measure the gap against.
    TrueRange,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl PriceSource {
    /// Extracts the configured price, or `None` when the source needs a
    /// previous bar that does not exist yet.
    #[inline]
    pub(crate) fn extract(self, ohlcv: &impl Ohlcv, prev_close: Option<Price>) -> Option<Price> {
        match self {
            Self::Close => Some(ohlcv.close()),
            Self::TrueRange => prev_close.map(|prev_close| {
                let hl = ohlcv.high() - ohlcv.low();
                let hc = (ohlcv.high() - prev_close).abs();
                let lc = (ohlcv.low() - prev_close).abs();
                hl.max(hc).max(lc)
            }),
        }
    }
}
