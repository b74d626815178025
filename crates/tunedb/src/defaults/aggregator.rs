use super::{CommonBest, DefaultStrategy, Defaults, Sentinels, SmallestBest, check_consistency};
use crate::best::{BestSelector, MinTimeSelector};
use crate::config::{Logger, TuneDbConfig, defaults::DefaultsLogLevel};
use crate::error::DefaultsError;
use crate::record::{Record, Table};
use crate::schema::{Column, Schema, group_by};

/// Derives fallback defaults from a tuning database.
///
/// Two tiers of defaults are computed:
///
/// 1. One default per device type/vendor, kernel and arguments, using either the
///    [common best](CommonBest) or the [smallest best](SmallestBest) strategy.
/// 2. One default per kernel and arguments over all device types and vendors, always using
///    the smallest best.
///
/// Derived records have their device identity and time replaced by [sentinels](Sentinels).
pub struct DefaultsAggregator<S: BestSelector = MinTimeSelector> {
    schema: Schema,
    sentinels: Sentinels,
    use_common_best: bool,
    strategy: CommonBest<S>,
    log_level: DefaultsLogLevel,
    logger: spin::Mutex<Logger>,
}

impl DefaultsAggregator {
    /// Create an aggregator from the [global configuration](TuneDbConfig::get).
    pub fn new() -> Self {
        Self::with_config(&TuneDbConfig::get())
    }

    /// Create an aggregator from the provided configuration.
    pub fn with_config(config: &TuneDbConfig) -> Self {
        Self::with_selector(config, MinTimeSelector::new(config.schema.clone()))
    }
}

impl Default for DefaultsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BestSelector> DefaultsAggregator<S> {
    /// Create an aggregator using a custom [best selector](BestSelector).
    pub fn with_selector(config: &TuneDbConfig, selector: S) -> Self {
        Self {
            schema: config.schema.clone(),
            sentinels: config.defaults.sentinels.clone(),
            use_common_best: config.defaults.strategy.use_common_best(),
            strategy: CommonBest::new(SmallestBest::new(selector)),
            log_level: config.defaults.logger.level,
            logger: spin::Mutex::new(Logger::from_config(config)),
        }
    }

    /// Compute the defaults with the configured strategy.
    pub fn compute_configured(&self, database: &Table) -> Result<Defaults, DefaultsError> {
        self.compute(database, self.use_common_best)
    }

    /// Compute both tiers of defaults.
    ///
    /// The device type/vendor tier uses the [common best](CommonBest) strategy when
    /// `use_common_best` is set, the [smallest best](SmallestBest) otherwise.
    ///
    /// Kernels with more than one device type/vendor default are reported as
    /// [diagnostics](super::Diagnostic) without failing the computation.
    pub fn compute(
        &self,
        database: &Table,
        use_common_best: bool,
    ) -> Result<Defaults, DefaultsError> {
        let strategy: &dyn DefaultStrategy = if use_common_best {
            &self.strategy
        } else {
            self.strategy.fallback()
        };

        let tier1 = self.compute_tier(
            database,
            &self.schema.type_vendor_grouping(),
            strategy,
            |record| self.sentinels.stamp_default(record),
        )?;

        let diagnostics = check_consistency(&tier1, &self.schema);

        let tier2 = self.compute_tier(
            database,
            &self.schema.global_grouping(),
            self.strategy.fallback(),
            |record| self.sentinels.stamp_global(record),
        )?;

        let mut logger = self.logger.lock();
        for diagnostic in diagnostics.iter() {
            logger.log_warning(diagnostic);
        }
        if !matches!(self.log_level, DefaultsLogLevel::Disabled) {
            logger.log_defaults(&format!(
                "Computed {} device type/vendor defaults and {} global defaults out of {} records using {} ({} warnings)",
                tier1.len(),
                tier2.len(),
                database.len(),
                strategy.name(),
                diagnostics.len(),
            ));
        }

        Ok(Defaults::new(tier1, tier2, diagnostics))
    }

    fn compute_tier<F: Fn(Record) -> Record>(
        &self,
        database: &Table,
        columns: &[Column],
        strategy: &dyn DefaultStrategy,
        stamp: F,
    ) -> Result<Table, DefaultsError> {
        let groups = group_by(database, columns);
        let mut defaults = Table::default();

        for (key, group) in groups {
            let default = strategy.compute(&group, &key)?;

            if let DefaultsLogLevel::Full = self.log_level {
                self.logger.lock().log_defaults(&format!(
                    "[{key}] {} over {} records: {:?}",
                    strategy.name(),
                    group.len(),
                    default.parameters,
                ));
            }
            log::debug!("Default of [{key}] computed over {} records", group.len());

            defaults.push(stamp(default));
        }

        Ok(defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{DEVICE_NAME_DEFAULT, DEVICE_TYPE_DEFAULT, VENDOR_DEFAULT};
    use crate::record::{Attributes, Device};

    fn record(device: &str, vendor: &str, mwg: i64, time: f64) -> Record {
        Record::new(
            Device::new(device.to_string(), 16, 1000),
            vendor.to_string(),
            "GPU".to_string(),
            "Xgemm".to_string(),
            Attributes::from([("precision".to_string(), "32".into())]),
            Attributes::new(),
            [("MWG".to_string(), mwg)].into(),
            time,
        )
    }

    #[test]
    fn computes_both_tiers() {
        let database = Table::new(vec![
            record("Tahiti", "AMD", 64, 1.0),
            record("Hawaii", "AMD", 32, 2.0),
            record("Tesla K40m", "NVIDIA", 128, 1.0),
        ]);
        let aggregator = DefaultsAggregator::with_config(&TuneDbConfig::default());

        let defaults = aggregator.compute(&database, false).unwrap();

        assert_eq!(defaults.tier1.len(), 2);
        assert_eq!(defaults.tier2.len(), 1);
        assert!(defaults.diagnostics.is_empty());

        let amd = &defaults.tier1.records()[0];
        assert_eq!(amd.device_vendor, "AMD");
        assert_eq!(amd.parameters["MWG"], 32);

        let global = &defaults.tier2.records()[0];
        assert_eq!(global.device.name, DEVICE_NAME_DEFAULT);
        assert_eq!(global.device_vendor, VENDOR_DEFAULT);
        assert_eq!(global.device_type, DEVICE_TYPE_DEFAULT);
        assert_eq!(global.parameters["MWG"], 32);
        assert_eq!(global.time, 0.0);
    }

    #[test]
    fn inconsistent_database_aborts() {
        let mut lhs = record("Tahiti", "AMD", 64, 1.0);
        let mut rhs = record("Hawaii", "AMD", 64, 1.0);
        lhs.kernel_attributes
            .insert("layout".to_string(), "row-major".into());
        rhs.kernel_attributes
            .insert("layout".to_string(), "col-major".into());
        let aggregator = DefaultsAggregator::with_config(&TuneDbConfig::default());

        let result = aggregator.compute(&Table::new(vec![lhs, rhs]), true);

        assert!(matches!(
            result,
            Err(DefaultsError::InconsistentCommonBest {
                configurations: 2,
                ..
            })
        ));
    }
}
