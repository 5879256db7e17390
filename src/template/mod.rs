//! `%{...}` string interpolation against events.
//!
//! Three kinds of placeholder are recognised, checked in this order:
//! - `%{+%s}` renders the event timestamp as whole seconds since the epoch
//! - `%{+<pattern>}` renders the event timestamp with a date/time pattern in UTC
//! - `%{<field>}` renders the value of a field reference
//!
//! A missing timestamp renders as the empty string. A missing field leaves
//! its placeholder in the output untouched. Unterminated placeholders are
//! literal text.
//!
//! # Example
//!
//! ```
//! use event_interpolation::event::{JsonEvent, Timestamp};
//! use event_interpolation::template::evaluate;
//!
//! let event = JsonEvent::new()
//!     .with_field("host", "web-1")
//!     .with_field("tags", vec!["a", "b"])
//!     .with_timestamp(Timestamp::from_epoch_millis(1_500_000_000_123).unwrap());
//!
//! let rendered = evaluate(&event, "%{host} [%{tags}] at %{+%s} in %{region}").unwrap();
//! assert_eq!(rendered, "web-1 [a,b] at 1500000000 in %{region}");
//! ```

mod buffer;
mod directive;

use std::borrow::Cow;

use crate::config::InterpolationConfig;
use crate::error::Result;
use crate::event::{join, Event, Value};
use crate::format::format_timestamp;

pub use directive::{
    has_placeholders, placeholders, Directive, Placeholder, Placeholders, EPOCH_SECONDS,
};

/// Separator placed between list elements.
pub const LIST_SEPARATOR: &str = ",";

/// Renders templates against events.
///
/// Holds no per-call state; output is built in a thread-local scratch
/// buffer (or a fresh one, see [`InterpolationConfig::reuse_buffer`]).
#[derive(Debug, Clone, Default)]
pub struct Interpolator {
    config: InterpolationConfig,
}

impl Interpolator {
    pub fn new(config: InterpolationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InterpolationConfig {
        &self.config
    }

    /// Substitute every placeholder in `template` with values from `event`.
    ///
    /// Borrows the template unchanged when it holds no placeholder. Fails
    /// only when a map-valued field cannot be serialized to JSON.
    pub fn evaluate<'t, E>(&self, event: &E, template: &'t str) -> Result<Cow<'t, str>>
    where
        E: Event + ?Sized,
    {
        if !has_placeholders(template) {
            return Ok(Cow::Borrowed(template));
        }

        let reserve = template.len() + self.config.initial_capacity;
        let rendered = if self.config.reuse_buffer {
            buffer::with_scratch(reserve, self.config.max_retained_capacity, |out| {
                render(event, template, out).map(|()| out.as_str().to_owned())
            })?
        } else {
            let mut out = String::with_capacity(reserve);
            render(event, template, &mut out)?;
            out
        };

        Ok(Cow::Owned(rendered))
    }
}

/// Evaluate `template` against `event` with the default configuration.
pub fn evaluate<'t, E>(event: &E, template: &'t str) -> Result<Cow<'t, str>>
where
    E: Event + ?Sized,
{
    Interpolator::default().evaluate(event, template)
}

fn render<E>(event: &E, template: &str, out: &mut String) -> Result<()>
where
    E: Event + ?Sized,
{
    let mut pos = 0;

    for placeholder in placeholders(template) {
        out.push_str(&template[pos..placeholder.open]);

        match placeholder.directive {
            Directive::EpochSeconds => match event.timestamp() {
                Some(ts) => out.push_str(&ts.epoch_seconds().to_string()),
                None => tracing::trace!("Event has no timestamp, rendering %{{+%s}} as empty"),
            },
            Directive::Pattern(pattern) => match event.timestamp() {
                Some(ts) => out.push_str(&format_timestamp(&ts, pattern)),
                None => tracing::trace!(pattern, "Event has no timestamp, rendering pattern as empty"),
            },
            Directive::Field(path) => write_field(event, path, out)?,
        }

        pos = placeholder.close + 1;
    }

    out.push_str(&template[pos..]);
    Ok(())
}

fn write_field<E>(event: &E, path: &str, out: &mut String) -> Result<()>
where
    E: Event + ?Sized,
{
    match event.get_field(path) {
        None | Some(Value::Null) => {
            tracing::trace!(field = path, "Field not present, keeping placeholder");
            out.push_str("%{");
            out.push_str(path);
            out.push('}');
        }
        Some(Value::List(items)) => join(items, LIST_SEPARATOR, out)?,
        Some(map @ Value::Map(_)) => {
            let json = map.to_json().map_err(|e| {
                tracing::debug!(field = path, error = %e, "Failed to serialize map field");
                e
            })?;
            out.push_str(&json);
        }
        Some(scalar) => scalar.write_to(out)?,
    }
    Ok(())
}
