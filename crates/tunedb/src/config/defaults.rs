use super::logger::{LogLevel, LoggerConfig};
use crate::defaults::Sentinels;

/// Configuration of the defaults computation.
#[derive(Default, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DefaultsConfig {
    /// Where and how much to log.
    #[serde(default)]
    pub logger: LoggerConfig<DefaultsLogLevel>,
    /// The strategy used for the device type/vendor defaults.
    #[serde(default)]
    pub strategy: DefaultsStrategy,
    /// Values stamped on the derived defaults.
    #[serde(default)]
    pub sentinels: Sentinels,
}

/// How the device type/vendor defaults are selected.
///
/// Defaults over all device types always use the smallest best.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DefaultsStrategy {
    /// The best parameters measured on every device, falling back to the smallest best.
    #[default]
    #[serde(rename = "common-best")]
    CommonBest,
    /// The column-wise minimum of the best parameters of every device.
    #[serde(rename = "smallest-best")]
    SmallestBest,
}

impl DefaultsStrategy {
    /// Whether this is the common best strategy.
    pub fn use_common_best(&self) -> bool {
        matches!(self, DefaultsStrategy::CommonBest)
    }
}

/// Verbosity of the defaults logger.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DefaultsLogLevel {
    /// Nothing is logged.
    #[serde(rename = "disabled")]
    Disabled,
    /// Diagnostics and a summary of each run are logged.
    #[default]
    #[serde(rename = "minimal")]
    Minimal,
    /// Every group decision is logged as well.
    #[serde(rename = "full")]
    Full,
}

impl LogLevel for DefaultsLogLevel {}
