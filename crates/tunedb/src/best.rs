use crate::record::Record;
use crate::schema::{Schema, group_by};

/// Selects the best record(s) out of records believed to be comparable.
///
/// Implementations receive records sharing the same discriminating attributes (same device,
/// kernel and arguments) that possibly differ in their parameters. The input is never empty.
pub trait BestSelector: Send + Sync {
    /// Returns the record(s) with the minimal execution time.
    fn best<'a>(&self, records: &[&'a Record]) -> Vec<&'a Record>;
}

/// Keeps the fastest record(s) of every measurement identity.
///
/// Records are first split by every identity column of the [schema](Schema), so feeding
/// records of multiple devices or arguments returns the best of each of them. Ties are kept.
#[derive(new, Debug, Clone, Default)]
pub struct MinTimeSelector {
    schema: Schema,
}

impl BestSelector for MinTimeSelector {
    fn best<'a>(&self, records: &[&'a Record]) -> Vec<&'a Record> {
        let groups = group_by(records.iter().copied(), &self.schema.identity_columns());
        let mut bests = Vec::with_capacity(groups.len());

        for (_, group) in groups {
            let best_time = group
                .iter()
                .map(|record| record.time)
                .fold(f64::INFINITY, f64::min);

            bests.extend(group.into_iter().filter(|record| record.time == best_time));
        }

        bests
    }
}
