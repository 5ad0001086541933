use std::{fmt::Display, num::NonZero};

use serde::Serialize;
use tracing::{debug, trace};

use crate::Price;

/// Settings for support/resistance detection.
///
/// # Example
///
/// ```
/// use quantedge_analysis::LevelConfig;
/// use std::num::NonZero;
///
/// let config = LevelConfig::new(NonZero::new(10).unwrap(), 0.02, NonZero::new(3).unwrap()).unwrap();
/// assert_eq!(config.window(), 10);
/// assert!(LevelConfig::new(NonZero::new(10).unwrap(), 0.0, NonZero::new(3).unwrap()).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    window: NonZero<usize>,
    threshold: f64,
    max_levels: NonZero<usize>,
}

impl LevelConfig {
    /// Returns `None` unless `threshold` is positive and finite.
    #[must_use]
    pub fn new(window: NonZero<usize>, threshold: f64, max_levels: NonZero<usize>) -> Option<Self> {
        (threshold.is_finite() && threshold > 0.0).then_some(Self {
            window,
            threshold,
            max_levels,
        })
    }

    /// Bars on each side a local extremum must dominate.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window.get()
    }

    /// Relative price gap below which two levels merge.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Maximum number of levels kept per side.
    #[must_use]
    pub fn max_levels(&self) -> usize {
        self.max_levels.get()
    }
}

const DEFAULT_WINDOW: NonZero<usize> = NonZero::new(15).unwrap();
const DEFAULT_MAX_LEVELS: NonZero<usize> = NonZero::new(5).unwrap();

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            threshold: 0.03,
            max_levels: DEFAULT_MAX_LEVELS,
        }
    }
}

/// Side of the current close a level sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LevelKind {
    Support,
    Resistance,
}

impl Display for LevelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Kind of local extremum a level was clustered from.
///
/// A `Maxima` level below the current close is a former resistance now
/// acting as support, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LevelOrigin {
    Minima,
    Maxima,
}

/// A price where the close has repeatedly turned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Level {
    /// Mean of the merged extremum prices.
    pub price: Price,
    pub kind: LevelKind,
    /// Number of local extrema merged into this level, at least 1.
    pub touch_count: usize,
    pub origin: LevelOrigin,
}

/// Detected levels, each side ordered nearest to the current close first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Levels {
    pub support: Vec<Level>,
    pub resistance: Vec<Level>,
}

impl Levels {
    /// True when neither side has a level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.support.is_empty() && self.resistance.is_empty()
    }
}

/// Local extrema of `closes`: a bar at least `window` bars from either end
/// that is no higher (lower) than every bar within `window` of it and
/// strictly lower (higher) than at least one of them.
fn extrema(closes: &[Price], window: usize) -> Vec<(Price, LevelOrigin)> {
    let n = closes.len();
    if n < 2 * window + 1 {
        return Vec::new();
    }

    (window..n - window)
        .filter_map(|i| {
            let price = closes[i];
            let neighbors = closes[i - window..=i + window]
                .iter()
                .enumerate()
                .filter(|&(offset, _)| offset != window)
                .map(|(_, &other)| other);

            let (mut lowest, mut highest, mut below_some, mut above_some) = (true, true, false, false);
            for other in neighbors {
                lowest &= price <= other;
                highest &= price >= other;
                below_some |= price < other;
                above_some |= price > other;
            }

            if lowest && below_some {
                Some((price, LevelOrigin::Minima))
            } else if highest && above_some {
                Some((price, LevelOrigin::Maxima))
            } else {
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cluster {
    sum: f64,
    count: usize,
}

impl Cluster {
    fn single(price: Price) -> Self {
        Self { sum: price, count: 1 }
    }

    #[allow(clippy::cast_precision_loss)]
    fn price(&self) -> Price {
        self.sum / self.count as f64
    }

    fn absorb(&mut self, other: Self) {
        self.sum += other.sum;
        self.count += other.count;
    }
}

/// Merges price-sorted clusters until no two neighbors lie within
/// `threshold` of the lower one.
///
/// Each round merges the closest qualifying pair (relative gap, lowest index
/// on ties). A merged price lies between its parts, so sort order holds and
/// checking neighbors is enough.
fn merge(mut clusters: Vec<Cluster>, threshold: f64) -> Vec<Cluster> {
    loop {
        let mut closest: Option<(usize, f64)> = None;

        for (i, pair) in clusters.windows(2).enumerate() {
            let (lower, upper) = (pair[0].price(), pair[1].price());
            let gap = upper - lower;
            if gap < threshold * lower {
                let relative = gap / lower;
                if closest.is_none_or(|(_, best)| relative < best) {
                    closest = Some((i, relative));
                }
            }
        }

        let Some((i, _)) = closest else {
            return clusters;
        };

        let upper = clusters.remove(i + 1);
        trace!(
            lower = clusters[i].price(),
            upper = upper.price(),
            "merging level candidates"
        );
        clusters[i].absorb(upper);
    }
}

/// Clusters the candidates of one origin, in price order.
fn cluster_origin(candidates: &[(Price, LevelOrigin)], origin: LevelOrigin, threshold: f64) -> Vec<Cluster> {
    let mut prices: Vec<Price> = candidates
        .iter()
        .filter(|&&(_, from)| from == origin)
        .map(|&(price, _)| price)
        .collect();
    prices.sort_by(f64::total_cmp);

    merge(prices.into_iter().map(Cluster::single).collect(), threshold)
}

/// Finds support and resistance levels in a close series.
///
/// Local minima and local maxima are clustered by price separately. The
/// merged levels are then split by the current close: below is support,
/// above is resistance, a level exactly at the close is neither. Each side
/// is ordered by distance from the close and cut to
/// [`LevelConfig::max_levels`]. A series shorter than `2 × window + 1` has no
/// candidates and yields empty lists.
#[must_use]
pub fn detect(closes: &[Price], current: Price, config: &LevelConfig) -> Levels {
    let candidates = extrema(closes, config.window());

    let mut levels = Levels::default();
    for origin in [LevelOrigin::Minima, LevelOrigin::Maxima] {
        let clusters = cluster_origin(&candidates, origin, config.threshold());
        debug!(?origin, clusters = clusters.len(), "level candidates clustered");

        for cluster in clusters {
            let price = cluster.price();
            let (side, kind) = if price < current {
                (&mut levels.support, LevelKind::Support)
            } else if price > current {
                (&mut levels.resistance, LevelKind::Resistance)
            } else {
                continue;
            };

            side.push(Level {
                price,
                kind,
                touch_count: cluster.count,
                origin,
            });
        }
    }

    debug!(candidates = candidates.len(), "level detection finished");

    for side in [&mut levels.support, &mut levels.resistance] {
        side.sort_by(|a, b| (a.price - current).abs().total_cmp(&(b.price - current).abs()));
        side.truncate(config.max_levels());
    }

    levels
}
