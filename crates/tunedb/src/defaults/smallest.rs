use super::DefaultStrategy;
use crate::best::BestSelector;
use crate::error::DefaultsError;
use crate::record::Record;
use crate::schema::{GroupKey, Schema, group_by};

/// Takes the column-wise minimum of the best record of every device in a group.
///
/// The result is conservative: each value is known to work on at least one device, even
/// though the combination may never have been measured.
#[derive(new, Debug, Clone)]
pub struct SmallestBest<S> {
    selector: S,
}

impl<S: BestSelector> SmallestBest<S> {
    /// The selector used to find the best record(s) of each device.
    pub fn selector(&self) -> &S {
        &self.selector
    }
}

impl<S: BestSelector> DefaultStrategy for SmallestBest<S> {
    fn name(&self) -> &'static str {
        "smallest-best"
    }

    fn compute(&self, group: &[&Record], key: &GroupKey) -> Result<Record, DefaultsError> {
        let devices = group_by(group.iter().copied(), &Schema::device_columns());
        let mut bests = devices
            .values()
            .flat_map(|records| self.selector.best(records));

        let first = bests.next().ok_or_else(|| DefaultsError::EmptyGroup {
            group: key.to_string(),
        })?;

        Ok(bests.fold(first.clone(), |acc, record| acc.column_min(record)))
    }
}
