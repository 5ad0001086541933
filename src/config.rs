use std::{fs, num::NonZero, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    AtrConfig, BbConfig, Error, IndicatorSet, LevelConfig, MacdConfig, Result, RsiConfig,
    SmaConfig, StdDev, StochConfig,
};

/// Short and long simple moving average lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmaLengths {
    pub short: usize,
    pub long: usize,
}

impl Default for SmaLengths {
    fn default() -> Self {
        Self { short: 20, long: 50 }
    }
}

/// MACD fast, slow and signal EMA lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaLengths {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for EmaLengths {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// Bollinger Bands window length and standard deviation multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerSettings {
    pub length: usize,
    pub multiplier: f64,
}

impl Default for BollingerSettings {
    fn default() -> Self {
        Self {
            length: 20,
            multiplier: 2.0,
        }
    }
}

/// Stochastic %K lookback and %D smoothing lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticSettings {
    pub k_length: usize,
    pub d_length: usize,
}

impl Default for StochasticSettings {
    fn default() -> Self {
        Self {
            k_length: 14,
            d_length: 3,
        }
    }
}

/// Caller-facing analysis settings.
///
/// Plain numbers so the record can be written by hand or loaded from JSON;
/// every field is optional on load and falls back to its default.
/// [`validate`](Self::validate) turns it into typed indicator configs.
///
/// # Example
///
/// ```
/// use quantedge_analysis::AnalysisConfig;
///
/// let config = AnalysisConfig::from_json_str(r#"{ "rsi_length": 10 }"#).unwrap();
/// assert_eq!(config.rsi_length, 10);
/// assert_eq!(config.level_window, 15);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub sma_lengths: SmaLengths,
    pub ema_lengths: EmaLengths,
    pub rsi_length: usize,
    pub bollinger: BollingerSettings,
    pub atr_length: usize,
    pub stochastic: StochasticSettings,
    pub level_window: usize,
    pub level_threshold: f64,
    pub max_levels: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sma_lengths: SmaLengths::default(),
            ema_lengths: EmaLengths::default(),
            rsi_length: 14,
            bollinger: BollingerSettings::default(),
            atr_length: 14,
            stochastic: StochasticSettings::default(),
            level_window: 15,
            level_threshold: 0.03,
            max_levels: 5,
        }
    }
}

/// Validated settings: every length non-zero, every multiplier usable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedConfig {
    pub indicators: IndicatorSet,
    pub levels: LevelConfig,
}

fn positive(value: usize, field: &'static str) -> Result<NonZero<usize>> {
    NonZero::new(value).ok_or(Error::config(field, "must be positive"))
}

impl AnalysisConfig {
    /// Parses a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] on malformed input.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, [`Error::Json`] if it does
    /// not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;

        debug!(path = %path.display(), "analysis config loaded");
        Ok(config)
    }

    /// Checks every setting and builds the typed configs.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] naming the first offending field:
    /// a zero length or window, a MACD fast length not shorter than the slow
    /// one, a non-positive or non-finite Bollinger multiplier or level
    /// threshold, or `max_levels == 0`.
    pub fn validate(&self) -> Result<ResolvedConfig> {
        let sma_short = positive(self.sma_lengths.short, "sma_lengths.short")?;
        let sma_long = positive(self.sma_lengths.long, "sma_lengths.long")?;

        let macd = MacdConfig::close(
            positive(self.ema_lengths.fast, "ema_lengths.fast")?,
            positive(self.ema_lengths.slow, "ema_lengths.slow")?,
            positive(self.ema_lengths.signal, "ema_lengths.signal")?,
        )
        .ok_or(Error::config("ema_lengths.fast", "must be shorter than ema_lengths.slow"))?;

        let rsi = positive(self.rsi_length, "rsi_length")?;

        let std_dev = StdDev::new(self.bollinger.multiplier).ok_or(Error::config(
            "bollinger.multiplier",
            "must be positive and finite",
        ))?;
        let bb = BbConfig::builder()
            .length(positive(self.bollinger.length, "bollinger.length")?)
            .std_dev(std_dev)
            .build();

        let stoch = StochConfig::new(
            positive(self.stochastic.k_length, "stochastic.k_length")?,
            positive(self.stochastic.d_length, "stochastic.d_length")?,
        );

        let atr = positive(self.atr_length, "atr_length")?;

        let levels = LevelConfig::new(
            positive(self.level_window, "level_window")?,
            self.level_threshold,
            positive(self.max_levels, "max_levels")?,
        )
        .ok_or(Error::config("level_threshold", "must be positive and finite"))?;

        Ok(ResolvedConfig {
            indicators: IndicatorSet {
                sma_short: SmaConfig::close(sma_short),
                sma_long: SmaConfig::close(sma_long),
                macd,
                rsi: RsiConfig::close(rsi),
                bb,
                stoch,
                atr: AtrConfig::new(atr),
            },
            levels,
        })
    }
}
