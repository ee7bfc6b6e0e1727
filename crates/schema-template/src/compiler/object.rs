//! Object handler.
//!
//! Only declared properties are visited; undeclared input keys never reach
//! the output.

use serde_json::{Map, Value};
use tracing::trace;

use super::SchemaCompiler;
use crate::error::{Result, TemplateError};
use crate::schema::ObjectNode;

pub(super) fn compile_object(
    compiler: &SchemaCompiler,
    node: &ObjectNode,
    data: &Value,
    path: &str,
) -> Result<Option<Value>> {
    if node.properties.is_empty() {
        return Err(TemplateError::missing_properties(path));
    }

    // Non-object input is read as an object with no keys.
    let empty = Map::new();
    let input = match data {
        Value::Object(map) => map,
        _ => &empty,
    };

    let mut result = Map::new();
    for (key, child) in &node.properties {
        let child_path = format!("{}.{}", path, key);
        let entry = input.get(key);

        // Array input skips the type comparison and goes straight to recursion.
        let use_default = match entry {
            None => true,
            Some(value) => child.mismatches(value) && !value.is_array() && child.has_default(),
        };

        if use_default && !child.remove_empty() {
            if let Some(default) = child.default_value() {
                trace!(path = %child_path, "substituting default");
                result.insert(key.clone(), default);
            }
        } else if let Some(value) = entry {
            let resolved = compiler.dispatch(child, value, &child_path)?;
            if resolved.keeps_key() {
                if let Some(value) = resolved.value {
                    result.insert(key.clone(), value);
                }
            } else {
                trace!(path = %child_path, "omitting key");
            }
        }
    }

    Ok(Some(Value::Object(result)))
}
