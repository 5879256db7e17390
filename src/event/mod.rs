//! Event model consumed by the interpolator.
//!
//! This module provides:
//! - The [`Event`] trait, the only view of an event the interpolator needs
//! - [`Value`], the sum type of field values
//! - [`Timestamp`], a UTC instant
//! - [`JsonEvent`], an event decoded from a JSON object with `[a][b]` field references

mod field_ref;
mod json;
mod timestamp;
mod value;

pub use json::{JsonEvent, TIMESTAMP_FIELD};
pub use timestamp::Timestamp;
pub use value::{join, Value};

/// Read access to a structured event.
pub trait Event {
    /// Look up a field by reference path. `None` when the field is absent.
    fn get_field(&self, path: &str) -> Option<&Value>;

    /// The event's designated timestamp, if it has one.
    fn timestamp(&self) -> Option<Timestamp>;
}

impl<E: Event + ?Sized> Event for &E {
    fn get_field(&self, path: &str) -> Option<&Value> {
        (**self).get_field(path)
    }

    fn timestamp(&self) -> Option<Timestamp> {
        (**self).timestamp()
    }
}
