//! Schema compiler
//!
//! Walks a [`SchemaNode`] tree and the data value side by side. Each node
//! either substitutes its default, passes the provided value through, or
//! resolves to nothing. Primitive nodes also report their `removeEmpty` flag
//! (the omit signal) so an enclosing object can drop the key.

mod array;
mod object;
mod primitive;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::options::CompileOptions;
use crate::schema::SchemaNode;

/// Outcome of compiling one node
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Resolved value; `None` means undefined
    pub value: Option<Value>,
    /// `removeEmpty` of the node, present only for primitive nodes
    pub remove_empty: Option<bool>,
}

impl Resolved {
    pub(crate) fn plain(value: Option<Value>) -> Self {
        Self {
            value,
            remove_empty: None,
        }
    }

    pub(crate) fn signalled(value: Option<Value>, remove_empty: bool) -> Self {
        Self {
            value,
            remove_empty: Some(remove_empty),
        }
    }

    /// True when the result carries the `(value, removeEmpty)` pair
    pub fn is_signalled(&self) -> bool {
        self.remove_empty.is_some()
    }

    /// Whether an enclosing object keeps this result under its key
    pub fn keeps_key(&self) -> bool {
        self.value.is_some() && self.remove_empty != Some(true)
    }

    pub fn into_value(self) -> Option<Value> {
        self.value
    }

    /// Drop the omit signal, keeping only the value
    pub fn into_plain(self) -> Self {
        Self::plain(self.value)
    }
}

/// Reusable compiler holding a set of [`CompileOptions`]
#[derive(Debug, Clone, Default)]
pub struct SchemaCompiler {
    options: CompileOptions,
}

impl SchemaCompiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile `data` against `schema`, returning only the resolved value
    pub fn compile(&self, schema: &SchemaNode, data: &Value) -> Result<Option<Value>> {
        self.resolve(schema, data).map(Resolved::into_value)
    }

    /// Compile `data` against `schema`.
    ///
    /// The omit signal is kept on primitive roots only when
    /// `should_return_array` is set.
    pub fn resolve(&self, schema: &SchemaNode, data: &Value) -> Result<Resolved> {
        let span = tracing::debug_span!("compile_schema", root_type = ?schema.type_name());
        let _guard = span.enter();

        let resolved = self.dispatch(schema, data, "$")?;
        if self.options.should_return_array {
            Ok(resolved)
        } else {
            Ok(resolved.into_plain())
        }
    }

    /// Route a node to its handler. Primitive handlers always return the
    /// signalled form; composite and unrecognized nodes never do.
    pub(crate) fn dispatch(&self, schema: &SchemaNode, data: &Value, path: &str) -> Result<Resolved> {
        match schema {
            SchemaNode::String(node) => {
                let use_default = !primitive::is_valid_string(data) && node.has_default();
                Ok(primitive::resolve(schema, data, use_default, primitive::is_valid_string, path))
            }
            SchemaNode::Number(node) => {
                let use_default = !primitive::is_valid_number(data) && node.has_default();
                Ok(primitive::resolve(schema, data, use_default, primitive::is_valid_number, path))
            }
            SchemaNode::Boolean(node) => {
                let use_default = !primitive::is_valid_boolean(data) && node.has_default();
                Ok(primitive::resolve(schema, data, use_default, primitive::is_valid_boolean, path))
            }
            SchemaNode::Object(node) => {
                object::compile_object(self, node, data, path).map(Resolved::plain)
            }
            SchemaNode::Array(node) => {
                array::compile_array(self, node, data, path).map(Resolved::plain)
            }
            SchemaNode::Unrecognized(node) => {
                debug!(path, type_name = ?node.type_name, "unrecognized schema type, producing nothing");
                Ok(Resolved::plain(None))
            }
        }
    }
}
