mod settings;

pub use settings::{CliConfig, InterpolationConfig, LogConfig, Settings};
