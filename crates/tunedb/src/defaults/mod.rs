mod aggregator;
mod common;
mod consistency;
mod output;
mod sentinel;
mod smallest;

pub use aggregator::*;
pub use common::*;
pub use consistency::*;
pub use output::*;
pub use sentinel::*;
pub use smallest::*;

use crate::error::DefaultsError;
use crate::record::Record;
use crate::schema::GroupKey;

/// A way to derive a single default record out of a group of measurements.
pub trait DefaultStrategy: Send + Sync {
    /// A short name used in logs.
    fn name(&self) -> &'static str;

    /// Compute the default of a group. The key is only used for diagnostics.
    fn compute(&self, group: &[&Record], key: &GroupKey) -> Result<Record, DefaultsError>;
}
