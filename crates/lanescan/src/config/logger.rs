use super::lowering::LoweringLogLevel;
use core::fmt::Display;
use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::PathBuf,
};

/// Outputs of the lowering log. Any combination of them can be enabled at once.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LoggerConfig {
    /// Log file path.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Keep the previous content of `file`.
    #[serde(default = "keep_previous_logs")]
    pub append: bool,

    #[serde(default)]
    pub stdout: bool,

    #[serde(default)]
    pub stderr: bool,

    /// Forward the messages to the `log` facade at this level.
    #[serde(default)]
    pub log: Option<LogCrateLevel>,

    #[serde(default)]
    pub level: LoweringLogLevel,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            file: None,
            append: keep_previous_logs(),
            stdout: false,
            stderr: false,
            log: None,
            level: LoweringLogLevel::default(),
        }
    }
}

fn keep_previous_logs() -> bool {
    true
}

/// Level of the `log` records emitted for lowering messages.
#[derive(
    Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, Hash, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum LogCrateLevel {
    #[default]
    Info,
    Debug,
    Trace,
}

/// Sends lowering messages to every configured output.
#[derive(Debug)]
pub struct Logger {
    loggers: Vec<LoggerKind>,
    level: LoweringLogLevel,
}

impl Logger {
    /// Creates a new `Logger` writing to the outputs of the given settings.
    ///
    /// Note that creating a logger opens the log file, if any.
    pub fn from_config(settings: &LoggerConfig) -> Self {
        let mut loggers = Vec::new();

        if settings.level != LoweringLogLevel::Disabled {
            if let Some(file) = &settings.file {
                match FileLogger::new(file, settings.append) {
                    Ok(logger) => loggers.push(LoggerKind::File(logger)),
                    Err(err) => log::warn!("Can't open log file {}: {err}", file.display()),
                }
            }
            if settings.stdout {
                loggers.push(LoggerKind::Stdout);
            }
            if settings.stderr {
                loggers.push(LoggerKind::Stderr);
            }
            if let Some(level) = settings.log {
                loggers.push(LoggerKind::Log(level));
            }
        }

        Self {
            loggers,
            level: settings.level,
        }
    }

    /// Logs a lowering message to all configured outputs.
    pub fn log_lowering<S: Display>(&mut self, msg: &S) {
        match self.loggers.as_mut_slice() {
            [] => {}
            [logger] => logger.log(msg),
            loggers => {
                let msg = msg.to_string();
                for logger in loggers {
                    logger.log(&msg);
                }
            }
        }
    }

    /// Returns the lowering log level, [Disabled](LoweringLogLevel::Disabled) when no output
    /// is configured.
    pub fn log_level_lowering(&self) -> LoweringLogLevel {
        if self.loggers.is_empty() {
            LoweringLogLevel::Disabled
        } else {
            self.level
        }
    }
}

#[derive(Debug)]
enum LoggerKind {
    File(FileLogger),
    Stdout,
    Stderr,
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

#[derive(Debug)]
struct FileLogger {
    writer: BufWriter<File>,
}

impl FileLogger {
    fn new(path: &PathBuf, append: bool) -> std::io::Result<Self> {
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

    fn log<S: Display>(&mut self, msg: &S) {
        let result = writeln!(self.writer, "{msg}").and_then(|_| self.writer.flush());
        if let Err(err) = result {
            log::warn!("Failed to write to the lowering log file: {err}");
        }
    }
}
