use thiserror::Error;

/// An error that aborts the computation of defaults.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefaultsError {
    /// A group had no record to select a default from.
    #[error("No record to compute a default from in group [{group}]")]
    EmptyGroup {
        /// The offending group.
        group: String,
    },

    /// The best parameter combination shared by all devices of a group maps to more than one
    /// configuration, which means the parameters don't fully discriminate the database entries.
    #[error(
        "The best common parameters of group [{group}] map to {configurations} distinct configurations, the database is inconsistent"
    )]
    InconsistentCommonBest {
        /// The offending group.
        group: String,
        /// The number of distinct configurations found.
        configurations: usize,
    },
}

/// An error while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file couldn't be read or written.
    #[error("Unable to access the configuration file\nCaused by:\n  {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file doesn't have the right format.
    #[error("The configuration file doesn't have the right format\nCaused by:\n  {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration couldn't be serialized.
    #[error("Unable to serialize the configuration\nCaused by:\n  {0}")]
    Serialize(#[from] toml::ser::Error),
}
