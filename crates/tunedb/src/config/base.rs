use super::defaults::{DefaultsConfig, DefaultsLogLevel, DefaultsStrategy};
use crate::error::ConfigError;
use crate::schema::Schema;
use std::path::Path;
use std::sync::Arc;

/// Static mutex holding the global configuration, initialized as `None`.
static TUNEDB_GLOBAL_CONFIG: spin::Mutex<Option<Arc<TuneDbConfig>>> = spin::Mutex::new(None);

/// Represents the global configuration, combining the database schema and the defaults settings.
#[derive(Default, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TuneDbConfig {
    /// Attribute sets of the tuning database.
    #[serde(default)]
    pub schema: Schema,

    /// Configuration of the defaults computation.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl TuneDbConfig {
    /// Retrieves the current global configuration, loading it from the current directory if not set.
    ///
    /// If no configuration is set, it attempts to load one from `tunedb.toml` or `TuneDB.toml` in the
    /// current directory or its parents. If no file is found, a default configuration is used.
    /// Environment variables are applied on top of the loaded configuration.
    pub fn get() -> Arc<Self> {
        let mut state = TUNEDB_GLOBAL_CONFIG.lock();
        state
            .get_or_insert_with(|| Arc::new(Self::from_current_dir().override_from_env()))
            .clone()
    }

    /// Sets the global configuration to the provided value.
    ///
    /// # Panics
    /// Panics if the configuration has already been set or read, as it cannot be overridden.
    ///
    /// # Warning
    /// This method must be called at the start of the program, before any calls to `get`.
    pub fn set(config: Self) {
        let mut state = TUNEDB_GLOBAL_CONFIG.lock();
        if state.is_some() {
            panic!("Cannot set the global configuration multiple times.");
        }
        *state = Some(Arc::new(config));
    }

    /// Save the current global configuration to the provided file path.
    pub fn save_default<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
        let config = Self::get();
        let content = toml::to_string_pretty(config.as_ref())?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Overrides configuration fields based on environment variables.
    pub fn override_from_env(self) -> Self {
        self.override_from_vars(|name| std::env::var(name).ok())
    }

    /// Overrides configuration fields based on the variables returned by `var`.
    ///
    /// - `TUNEDB_DEBUG_LOG`: `stdout`, `stderr`, `1`/`true` for `/tmp/tunedb.log`, `0`/`false`
    ///   to disable logging, any other value is a log file path.
    /// - `TUNEDB_DEFAULTS_STRATEGY`: `common-best` or `smallest-best`.
    pub fn override_from_vars<F: Fn(&str) -> Option<String>>(mut self, var: F) -> Self {
        if let Some(val) = var("TUNEDB_DEBUG_LOG") {
            let logger = &mut self.defaults.logger;
            logger.level = DefaultsLogLevel::Full;

            match val.as_str() {
                "stdout" => logger.stdout = true,
                "stderr" => logger.stderr = true,
                "1" | "true" => logger.file = Some("/tmp/tunedb.log".into()),
                "0" | "false" => logger.level = DefaultsLogLevel::Disabled,
                file_path => logger.file = Some(file_path.into()),
            }
        }

        if let Some(val) = var("TUNEDB_DEFAULTS_STRATEGY") {
            match val.as_str() {
                "common-best" | "common" => self.defaults.strategy = DefaultsStrategy::CommonBest,
                "smallest-best" | "smallest" => {
                    self.defaults.strategy = DefaultsStrategy::SmallestBest
                }
                _ => log::warn!("Unknown defaults strategy '{val}', keeping the configured one"),
            }
        }

        self
    }

    // Loads configuration from `tunedb.toml` or `TuneDB.toml` in the current directory or its parents.
    //
    // Traverses up the directory tree until a valid configuration file is found or the root is reached.
    // Returns a default configuration if no file is found.
    fn from_current_dir() -> Self {
        let Ok(mut dir) = std::env::current_dir() else {
            return Self::default();
        };

        loop {
            for name in ["tunedb.toml", "TuneDB.toml"] {
                match Self::from_file_path(dir.join(name)) {
                    Ok(config) => return config,
                    Err(ConfigError::Io(_)) => {}
                    Err(err) => log::warn!("Ignoring configuration {:?} ({err})", dir.join(name)),
                }
            }

            if !dir.pop() {
                break;
            }
        }

        Self::default()
    }

    /// Loads configuration from the given file path.
    pub fn from_file_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(entries: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = entries
            .iter()
            .map(|(key, val)| (key.to_string(), val.to_string()))
            .collect::<HashMap<_, _>>();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn parses_partial_config() {
        let config: TuneDbConfig = toml::from_str(
            r#"
            [schema]
            argument_attributes = ["arg_m", "arg_n"]

            [defaults]
            strategy = "smallest-best"

            [defaults.sentinels]
            device_type = "Any"
            "#,
        )
        .unwrap();

        assert_eq!(config.schema.argument_attributes, vec!["arg_m", "arg_n"]);
        assert_eq!(config.schema.kernel_attributes, vec!["precision", "kernel_family"]);
        assert_eq!(config.defaults.strategy, DefaultsStrategy::SmallestBest);
        assert_eq!(config.defaults.sentinels.device_type, "Any");
        assert_eq!(config.defaults.sentinels.device_name, "default");
        assert_eq!(config.defaults.logger.level, DefaultsLogLevel::Minimal);
    }

    #[test]
    fn env_overrides_strategy_and_logger() {
        let config = TuneDbConfig::default().override_from_vars(vars(&[
            ("TUNEDB_DEBUG_LOG", "stderr"),
            ("TUNEDB_DEFAULTS_STRATEGY", "smallest-best"),
        ]));

        assert_eq!(config.defaults.strategy, DefaultsStrategy::SmallestBest);
        assert_eq!(config.defaults.logger.level, DefaultsLogLevel::Full);
        assert!(config.defaults.logger.stderr);
    }

    #[test]
    fn env_can_disable_logging() {
        let config =
            TuneDbConfig::default().override_from_vars(vars(&[("TUNEDB_DEBUG_LOG", "false")]));

        assert_eq!(config.defaults.logger.level, DefaultsLogLevel::Disabled);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = TuneDbConfig::default();

        let content = toml::to_string_pretty(&config).unwrap();
        let parsed: TuneDbConfig = toml::from_str(&content).unwrap();

        assert_eq!(parsed.schema, config.schema);
        assert_eq!(parsed.defaults.sentinels, config.defaults.sentinels);
    }
}
