//! Array handler.

use serde_json::Value;
use tracing::{debug, trace};

use super::SchemaCompiler;
use crate::error::{Result, TemplateError};
use crate::schema::{runtime_type_name, ArrayNode, Items};

pub(super) fn compile_array(
    compiler: &SchemaCompiler,
    node: &ArrayNode,
    data: &Value,
    path: &str,
) -> Result<Option<Value>> {
    let Some(items) = &node.items else {
        return Err(TemplateError::missing_items(path));
    };

    let use_default = data.as_array().map_or(true, Vec::is_empty);
    if use_default && !node.remove_empty {
        trace!(path, "array missing or empty, substituting default");
        return Ok(node.default.clone().map(Value::Array));
    }

    let Some(elements) = data.as_array() else {
        trace!(path, "default suppressed by removeEmpty");
        return Ok(None);
    };

    let mut result = Vec::with_capacity(elements.len());
    match items {
        Items::Tuple(nodes) => {
            for (i, element) in elements.iter().enumerate() {
                let element_path = format!("{}[{}]", path, i);
                let type_name = runtime_type_name(element);
                match nodes.iter().find(|n| n.type_name() == Some(type_name)) {
                    Some(item) => {
                        let resolved = compiler.dispatch(item, element, &element_path)?;
                        push_element(compiler, &mut result, resolved.value);
                    }
                    None => {
                        debug!(path = %element_path, type_name, "no item schema for element type, dropping");
                    }
                }
            }
        }
        Items::Single(item) => {
            for (i, element) in elements.iter().enumerate() {
                let element_path = format!("{}[{}]", path, i);
                let resolved = compiler.dispatch(item, element, &element_path)?;
                push_element(compiler, &mut result, resolved.value);
            }
        }
        Items::Malformed => {
            debug!(path, "`_items` is neither a schema nor a list of schemas");
            return Ok(None);
        }
    }

    Ok(Some(Value::Array(result)))
}

/// Undefined elements become holes (`null`) unless pruning is enabled.
fn push_element(compiler: &SchemaCompiler, result: &mut Vec<Value>, value: Option<Value>) {
    match value {
        Some(value) => result.push(value),
        None if compiler.options().prune_array_holes => {}
        None => result.push(Value::Null),
    }
}
