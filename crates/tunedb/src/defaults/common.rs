use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashSet;

use super::{DefaultStrategy, SmallestBest};
use crate::best::BestSelector;
use crate::error::DefaultsError;
use crate::record::Record;
use crate::schema::{GroupKey, Schema, group_by};

/// Selects the parameters with the lowest total time among the parameters measured on every
/// device of a group.
///
/// When no parameter combination was measured on all devices, the computation falls back to
/// [SmallestBest].
#[derive(new, Debug, Clone)]
pub struct CommonBest<S> {
    fallback: SmallestBest<S>,
}

impl<S: BestSelector> CommonBest<S> {
    /// The strategy used when no parameters are shared by all devices.
    pub fn fallback(&self) -> &SmallestBest<S> {
        &self.fallback
    }
}

impl<S: BestSelector> DefaultStrategy for CommonBest<S> {
    fn name(&self) -> &'static str {
        "common-best"
    }

    fn compute(&self, group: &[&Record], key: &GroupKey) -> Result<Record, DefaultsError> {
        let num_devices = group
            .iter()
            .map(|record| &record.device)
            .collect::<HashSet<_>>()
            .len();

        // Parameters without any value in the group are never part of the map keys, so they
        // are dropped here by construction.
        let parameter_names = group
            .iter()
            .flat_map(|record| record.parameters.keys())
            .map(String::as_str)
            .collect::<BTreeSet<_>>();

        let mut partitions = BTreeMap::<Vec<i64>, Vec<&Record>>::new();
        for record in group.iter().copied() {
            // Records missing one of the group parameters can't be compared.
            let values = parameter_names
                .iter()
                .map(|name| record.parameters.get(*name).copied())
                .collect::<Option<Vec<_>>>();

            if let Some(values) = values {
                partitions.entry(values).or_default().push(record);
            }
        }

        let mut best: Option<(f64, Vec<&Record>)> = None;
        let mut num_common = 0;
        let mut num_ties = 0;

        // Partitions iterate in lexicographic parameter order, the first one wins ties.
        'partitions: for records in partitions.values() {
            let devices = group_by(records.iter().copied(), &Schema::device_columns());
            if devices.len() != num_devices {
                continue;
            }

            // Repeated measurements of a device only count through its best one.
            let mut selected = Vec::new();
            let mut group_time = 0.0;
            for device_records in devices.values() {
                let bests = self.fallback.selector().best(device_records);
                let Some(time) = bests.iter().map(|record| record.time).min_by(f64::total_cmp)
                else {
                    continue 'partitions;
                };
                group_time += time;
                selected.extend(bests);
            }
            num_common += 1;

            match best.as_ref().map(|(best_time, _)| *best_time) {
                Some(best_time) if group_time > best_time => {}
                Some(best_time) if group_time == best_time => num_ties += 1,
                _ => {
                    best = Some((group_time, selected));
                    num_ties = 0;
                }
            }
        }

        let Some((group_time, records)) = best else {
            log::debug!(
                "No parameters shared by all {num_devices} devices of [{key}], falling back to {}",
                self.fallback.name()
            );
            return self.fallback.compute(group, key);
        };

        if num_ties > 0 {
            log::debug!(
                "{} parameter combinations of [{key}] share the best total time {group_time}, keeping the first",
                num_ties + 1
            );
        }
        log::trace!(
            "[{key}] selected out of {num_common} common parameter combinations over {num_devices} devices"
        );

        let mut configurations = Vec::<&Record>::new();
        for record in records {
            if !configurations
                .iter()
                .any(|config| config.same_configuration(record))
            {
                configurations.push(record);
            }
        }

        match configurations.as_slice() {
            [config] => Ok((*config).clone()),
            _ => Err(DefaultsError::InconsistentCommonBest {
                group: key.to_string(),
                configurations: configurations.len(),
            }),
        }
    }
}
