use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub interpolation: InterpolationConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub cli: CliConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterpolationConfig {
    /// Build output in a per-thread scratch buffer instead of a fresh one per call
    #[serde(default = "default_reuse_buffer")]
    pub reuse_buffer: bool,
    /// Extra bytes reserved beyond the template length
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    /// Scratch buffers larger than this are shrunk after use
    #[serde(default = "default_max_retained_capacity")]
    pub max_retained_capacity: usize,
}

fn default_reuse_buffer() -> bool {
    true
}

fn default_initial_capacity() -> usize {
    256
}

fn default_max_retained_capacity() -> usize {
    64 * 1024 // 64 KiB
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Fallback filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON log lines instead of human-readable text
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Template used when none is given on the command line
    pub template: Option<String>,
    /// Log and skip lines that are not valid events instead of aborting
    #[serde(default = "default_skip_invalid")]
    pub skip_invalid: bool,
}

fn default_skip_invalid() -> bool {
    true
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("interpolation.reuse_buffer", default_reuse_buffer())?
            .set_default("interpolation.initial_capacity", default_initial_capacity() as u64)?
            .set_default(
                "interpolation.max_retained_capacity",
                default_max_retained_capacity() as u64,
            )?
            .set_default("log.level", default_log_level())?
            .set_default("log.json", false)?
            .set_default("cli.skip_invalid", default_skip_invalid())?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // INTERPOLATE__LOG__LEVEL, INTERPOLATE__CLI__TEMPLATE, etc.
            .add_source(
                Environment::with_prefix("INTERPOLATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            reuse_buffer: default_reuse_buffer(),
            initial_capacity: default_initial_capacity(),
            max_retained_capacity: default_max_retained_capacity(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            template: None,
            skip_invalid: default_skip_invalid(),
        }
    }
}
