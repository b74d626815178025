use super::TuneDbConfig;
use super::defaults::DefaultsLogLevel;
use core::fmt::Display;
use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Configuration for logging, parameterized by a log level type.
///
/// Note that you can use multiple loggers at the same time.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(bound = "")]
pub struct LoggerConfig<L: LogLevel> {
    /// Path to the log file, if file logging is enabled.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Whether to append to the log file (true) or overwrite it (false). Defaults to true.
    #[serde(default = "append_default")]
    pub append: bool,

    /// Whether to log to standard output.
    #[serde(default)]
    pub stdout: bool,

    /// Whether to log to standard error.
    #[serde(default)]
    pub stderr: bool,

    /// Optional crate-level logging configuration (e.g., info, debug, trace).
    #[serde(default)]
    pub log: Option<LogCrateLevel>,

    /// The log level for this logger, determining verbosity.
    #[serde(default)]
    pub level: L,
}

impl<L: LogLevel> Default for LoggerConfig<L> {
    fn default() -> Self {
        Self {
            file: None,
            append: true,
            stdout: false,
            stderr: false,
            log: None,
            level: L::default(),
        }
    }
}

/// Log levels using the `log` crate.
#[derive(
    Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, Hash, PartialEq, Eq,
)]
pub enum LogCrateLevel {
    /// Logs informational messages.
    #[default]
    #[serde(rename = "info")]
    Info,

    /// Logs debugging messages.
    #[serde(rename = "debug")]
    Debug,

    /// Logs trace-level messages.
    #[serde(rename = "trace")]
    Trace,
}

fn append_default() -> bool {
    true
}

/// Trait for types that can be used as log levels in `LoggerConfig`.
pub trait LogLevel:
    serde::de::DeserializeOwned + serde::Serialize + Clone + Copy + core::fmt::Debug + Default
{
}

/// Logger for the defaults computation, writing to every configured output.
#[derive(Debug)]
pub struct Logger {
    loggers: Vec<LoggerKind>,
}

impl Logger {
    /// Creates a new `Logger` instance based on the provided configuration.
    ///
    /// A log file that can't be opened is skipped with a warning.
    pub fn from_config(config: &TuneDbConfig) -> Self {
        let kind = &config.defaults.logger;
        let mut loggers = Vec::new();

        if let DefaultsLogLevel::Disabled = kind.level {
            return Self { loggers };
        }

        if let Some(file) = &kind.file {
            match FileLogger::new(file, kind.append) {
                Ok(logger) => loggers.push(LoggerKind::File(logger)),
                Err(err) => {
                    log::warn!("Unable to open log file {file:?} ({err}), file logging is skipped")
                }
            }
        }

        if kind.stdout {
            loggers.push(LoggerKind::Stdout);
        }

        if kind.stderr {
            loggers.push(LoggerKind::Stderr);
        }

        if let Some(level) = kind.log {
            loggers.push(LoggerKind::Log(level));
        }

        Self { loggers }
    }

    /// Logs a message to every configured output.
    pub fn log_defaults<S: Display>(&mut self, msg: &S) {
        if self.loggers.len() > 1 {
            let msg = msg.to_string();
            for logger in self.loggers.iter_mut() {
                logger.log(&msg);
            }
        } else if let Some(logger) = self.loggers.first_mut() {
            logger.log(msg);
        }
    }

    /// Reports a warning through `log::warn!` and to every other configured output.
    pub fn log_warning<S: Display>(&mut self, msg: &S) {
        log::warn!("{msg}");

        for logger in self.loggers.iter_mut() {
            if !matches!(logger, LoggerKind::Log(_)) {
                logger.log(&format_args!("[WARNING] {msg}"));
            }
        }
    }
}

/// Represents different types of loggers.
#[derive(Debug)]
enum LoggerKind {
    /// Logs to a file.
    File(FileLogger),

    /// Logs to standard output.
    Stdout,

    /// Logs to standard error.
    Stderr,

    /// Logs using the `log` crate at the given level.
    Log(LogCrateLevel),
}

impl LoggerKind {
    fn log<S: Display>(&mut self, msg: &S) {
        match self {
            LoggerKind::File(file_logger) => file_logger.log(msg),
            LoggerKind::Stdout => println!("{msg}"),
            LoggerKind::Stderr => eprintln!("{msg}"),
            LoggerKind::Log(level) => match level {
                LogCrateLevel::Info => log::info!("{msg}"),
                LogCrateLevel::Debug => log::debug!("{msg}"),
                LogCrateLevel::Trace => log::trace!("{msg}"),
            },
        }
    }
}

/// Logger that writes messages to a file.
#[derive(Debug)]
struct FileLogger {
    writer: BufWriter<File>,
}

impl FileLogger {
    // Creates a new file logger.
    fn new(path: &Path, append: bool) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .append(append)
            .truncate(!append)
            .create(true)
            .open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    // Logs a message to the file, flushing the buffer to ensure immediate write.
    fn log<S: Display>(&mut self, msg: &S) {
        let result = writeln!(self.writer, "{msg}").and_then(|_| self.writer.flush());
        if let Err(err) = result {
            log::warn!("Unable to write to the defaults log file ({err})");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_logger_has_no_output() {
        let mut config = TuneDbConfig::default();
        config.defaults.logger.stdout = true;
        config.defaults.logger.level = DefaultsLogLevel::Disabled;

        let logger = Logger::from_config(&config);

        assert!(logger.loggers.is_empty());
    }

    #[test]
    fn file_logger_writes_messages() {
        let path = std::env::temp_dir().join(format!("tunedb-logger-{}.log", std::process::id()));
        let mut config = TuneDbConfig::default();
        config.defaults.logger.file = Some(path.clone());
        config.defaults.logger.append = false;
        config.defaults.logger.log = Some(LogCrateLevel::Debug);

        let mut logger = Logger::from_config(&config);
        logger.log_defaults(&"first message");
        logger.log_defaults(&"second message");
        drop(logger);

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(content, "first message\nsecond message\n");
    }

    #[test]
    fn warnings_skip_the_log_crate_output() {
        let path =
            std::env::temp_dir().join(format!("tunedb-warnings-{}.log", std::process::id()));
        let mut config = TuneDbConfig::default();
        config.defaults.logger.file = Some(path.clone());
        config.defaults.logger.append = false;
        config.defaults.logger.log = Some(LogCrateLevel::Info);

        let mut logger = Logger::from_config(&config);
        logger.log_warning(&"ambiguous defaults");
        drop(logger);

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(content, "[WARNING] ambiguous defaults\n");
    }
}
