//! String, number and boolean handlers.
//!
//! All three follow the same order: default (unless `removeEmpty`), then the
//! provided value if it is valid for the kind, then nothing.

use serde_json::Value;
use tracing::trace;

use super::Resolved;
use crate::schema::SchemaNode;

pub(super) fn is_valid_string(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.is_empty())
}

/// JSON numbers are never NaN, so any number passes.
pub(super) fn is_valid_number(value: &Value) -> bool {
    value.is_number()
}

pub(super) fn is_valid_boolean(value: &Value) -> bool {
    value.is_boolean()
}

pub(super) fn resolve(
    schema: &SchemaNode,
    value: &Value,
    use_default: bool,
    is_valid: fn(&Value) -> bool,
    path: &str,
) -> Resolved {
    let remove_empty = schema.remove_empty();

    // removeEmpty has priority over the default.
    let result = if use_default && !remove_empty {
        trace!(path, "substituting default");
        schema.default_value()
    } else if is_valid(value) {
        Some(value.clone())
    } else {
        if use_default {
            trace!(path, "default suppressed by removeEmpty");
        }
        None
    };

    Resolved::signalled(result, remove_empty)
}
