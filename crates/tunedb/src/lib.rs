#![warn(missing_docs)]

//! Derives fallback tuning-parameter defaults from a kernel tuning database.
//!
//! A tuning database holds one [record](record::Record) per measurement: a device, a kernel,
//! its arguments, the tuned parameters and the measured time. Devices that were never tuned
//! need a reasonable default configuration, which the
//! [defaults aggregator](defaults::DefaultsAggregator) derives per device type/vendor and
//! over all devices.

#[macro_use]
extern crate derive_new;

/// Best record selection module.
pub mod best;
/// Configuration module.
pub mod config;
/// Defaults computation module.
pub mod defaults;
/// Error types.
pub mod error;
/// Record and table module.
pub mod record;
/// Grouping vocabulary module.
pub mod schema;

pub use defaults::{Defaults, DefaultsAggregator, Diagnostic};
pub use error::{ConfigError, DefaultsError};
pub use record::{AttributeValue, Device, Record, Table};
