use crate::Price;
use std::collections::VecDeque;

/// Fixed-size trailing window over already-extracted prices.
///
/// Statistics are `None` until `size` values have been pushed.
#[derive(Clone, Debug)]
pub(crate) struct PriceWindow {
    size: usize,
    window: VecDeque<Price>,
    /// Running sum of values in the window. Maintained incrementally via
    /// add/subtract, may accumulate FP rounding drift over very long runs,
    /// but negligible for daily histories.
    sum: Price,
}

impl PriceWindow {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            window: VecDeque::with_capacity(size),
            sum: 0.0,
        }
    }

    #[inline]
    pub fn push(&mut self, price: Price) {
        if self.is_ready()
            && let Some(old) = self.window.pop_front()
        {
            self.sum -= old;
        }

        self.window.push_back(price);
        self.sum += price;
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.window.len() == self.size
    }

    #[inline]
    pub fn sum(&self) -> Option<Price> {
        self.is_ready().then_some(self.sum)
    }

    /// Arithmetic mean of the window.
    #[inline]
    pub fn mean(&self) -> Option<Price> {
        #[allow(clippy::cast_precision_loss)]
        let n = self.size as f64;
        self.sum().map(|sum| sum / n)
    }

    /// Population variance of the window.
    ///
    /// Deviations are taken from the oldest stored value before squaring,
    /// which keeps cancellation small and makes a constant window exactly
    /// zero.
    pub fn variance(&self) -> Option<f64> {
        if !self.is_ready() {
            return None;
        }

        let shift = *self.window.front()?;
        let (sum, sum_of_squares) = self
            .window
            .iter()
            .fold((0.0, 0.0), |(sum, squares), price| {
                let deviation = price - shift;
                (sum + deviation, deviation.mul_add(deviation, squares))
            });

        #[allow(clippy::cast_precision_loss)]
        let n = self.size as f64;
        let mean = sum / n;

        Some((sum_of_squares / n - mean * mean).max(0.0))
    }

    pub fn min(&self) -> Option<Price> {
        self.is_ready()
            .then(|| self.window.iter().copied().fold(f64::INFINITY, f64::min))
    }

    pub fn max(&self) -> Option<Price> {
        self.is_ready()
            .then(|| self.window.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }
}
