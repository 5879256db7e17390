// Shared infrastructure
pub mod config;
pub mod error;
pub mod telemetry;

// Event model and formatting collaborators
pub mod event;
pub mod format;

// Interpolation core
pub mod template;

// Line-oriented rendering
pub mod stream;

pub use error::{InterpolationError, Result};
pub use event::{Event, JsonEvent, Timestamp, Value};
pub use template::{evaluate, Interpolator};
