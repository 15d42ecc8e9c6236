use super::lowering::{LoweringConfig, LoweringLogLevel};
use std::sync::Arc;

/// Static mutex holding the global configuration, initialized as `None`.
static LANESCAN_GLOBAL_CONFIG: spin::Mutex<Option<Arc<GlobalConfig>>> = spin::Mutex::new(None);

/// Represents the global configuration of lanescan.
#[derive(Default, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GlobalConfig {
    /// Configuration of the scan lowering.
    #[serde(default)]
    pub lowering: LoweringConfig,
}

impl GlobalConfig {
    /// Retrieves the current global configuration, loading it from the current directory if not set.
    ///
    /// If no configuration is set, it attempts to load one from `lanescan.toml` in the current
    /// directory or its parents, then applies the environment overrides. If no file is found, a
    /// default configuration is used.
    pub fn get() -> Arc<Self> {
        let mut state = LANESCAN_GLOBAL_CONFIG.lock();
        let config =
            state.get_or_insert_with(|| Arc::new(Self::from_current_dir().override_from_env()));

        config.clone()
    }

    /// Sets the global configuration to the provided value.
    ///
    /// # Panics
    /// Panics if the configuration has already been set or read, as it cannot be overridden.
    pub fn set(config: Self) {
        let mut state = LANESCAN_GLOBAL_CONFIG.lock();
        if state.is_some() {
            panic!("Cannot set the global configuration multiple times.");
        }
        *state = Some(Arc::new(config));
    }

    /// Overrides configuration fields based on environment variables.
    ///
    /// - `LANESCAN_DEBUG_LOG`: `stdout`, `stderr`, `1`/`true` (log to `/tmp/lanescan.log`),
    ///   `0`/`false` (disable), or any other value as a log file path.
    /// - `LANESCAN_WARP_SIZE`: number of lanes per warp.
    pub fn override_from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("LANESCAN_DEBUG_LOG") {
            let logger = &mut self.lowering.logger;
            logger.level = LoweringLogLevel::Full;

            match val.as_str() {
                "stdout" => logger.stdout = true,
                "stderr" => logger.stderr = true,
                "1" | "true" => logger.file = Some("/tmp/lanescan.log".into()),
                "0" | "false" => logger.level = LoweringLogLevel::Disabled,
                file_path => logger.file = Some(file_path.into()),
            }
        }

        if let Ok(val) = std::env::var("LANESCAN_WARP_SIZE") {
            match val.parse::<u32>() {
                Ok(warp_size) if warp_size.is_power_of_two() => {
                    self.lowering.warp_size = warp_size
                }
                _ => log::warn!("Ignoring invalid LANESCAN_WARP_SIZE={val}"),
            }
        }

        self
    }

    // Loads configuration from `lanescan.toml` in the current directory or its parents.
    fn from_current_dir() -> Self {
        let Ok(mut dir) = std::env::current_dir() else {
            return Self::default();
        };

        loop {
            if let Ok(content) = Self::from_file_path(dir.join("lanescan.toml")) {
                return content;
            }

            if !dir.pop() {
                break;
            }
        }

        Self::default()
    }

    /// Loads configuration from a specified file path.
    ///
    /// # Panics
    /// Panics if the file exists but isn't a valid configuration.
    pub fn from_file_path<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = match toml::from_str(&content) {
            Ok(val) => val,
            Err(err) => panic!("The file provided doesn't have the right format => {err:?}"),
        };

        Ok(config)
    }
}
