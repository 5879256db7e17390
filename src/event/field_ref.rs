//! Field reference paths.
//!
//! A path is either a bare top-level key (`host`) or a sequence of bracketed
//! segments (`[http][request][0]`). Numeric segments index into lists;
//! negative indices count from the end.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use super::value::Value;

/// Split a field reference into its segments.
///
/// Anything that is not a well-formed bracket path is one literal key.
pub fn segments(path: &str) -> SmallVec<[&str; 4]> {
    let mut out = SmallVec::new();
    if let Some(inner) = path
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        for segment in inner.split("][") {
            if segment.is_empty() || segment.contains(|c: char| c == '[' || c == ']') {
                out.clear();
                out.push(path);
                return out;
            }
            out.push(segment);
        }
        return out;
    }
    out.push(path);
    out
}

/// Resolve `path` against a field map.
pub fn resolve<'v>(fields: &'v BTreeMap<String, Value>, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return None;
    }
    let segments = segments(path);
    let (first, rest) = segments.split_first()?;
    let mut current = fields.get(*first)?;
    for segment in rest {
        current = match current {
            Value::Map(map) => map.get(*segment)?,
            Value::List(items) => index(items, segment)?,
            _ => return None,
        };
    }
    Some(current)
}

fn index<'v>(items: &'v [Value], segment: &str) -> Option<&'v Value> {
    let i: isize = segment.parse().ok()?;
    let position = if i < 0 {
        items.len().checked_sub(i.unsigned_abs())?
    } else {
        i.unsigned_abs()
    };
    items.get(position)
}
