use super::logger::LoggerConfig;

/// Warp size assumed when nothing else is configured.
pub const DEFAULT_WARP_SIZE: u32 = 32;

/// Configuration of the scan lowering.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LoweringConfig {
    /// Number of lanes per warp on the target.
    #[serde(default = "warp_size_default")]
    pub warp_size: u32,

    /// Where and how much of the lowering to log.
    #[serde(default)]
    pub logger: LoggerConfig,
}

impl Default for LoweringConfig {
    fn default() -> Self {
        Self {
            warp_size: DEFAULT_WARP_SIZE,
            logger: LoggerConfig::default(),
        }
    }
}

impl LoweringConfig {
    /// Same configuration with another warp size.
    pub fn with_warp_size(mut self, warp_size: u32) -> Self {
        self.warp_size = warp_size;
        self
    }
}

fn warp_size_default() -> u32 {
    DEFAULT_WARP_SIZE
}

/// Verbosity of the lowering logger.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LoweringLogLevel {
    /// Nothing is logged.
    #[default]
    #[serde(rename = "disabled")]
    Disabled,

    /// The chosen strategy and geometry of every lowered scan.
    #[serde(rename = "basic")]
    Basic,

    /// Everything in [Basic](LoweringLogLevel::Basic), plus the emitted program.
    #[serde(rename = "full")]
    Full,
}
