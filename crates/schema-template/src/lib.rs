//! Schema Template
//!
//! Fills default values into JSON-shaped data and drops undeclared fields,
//! driven by a declarative schema template.
//!
//! ## Template grammar
//!
//! A template node is an object using reserved keys:
//!
//! - `_type`: `string`, `number`, `boolean`, `object` or `array`
//! - `_default`: value substituted when the input is missing or has the wrong type
//! - `_removeEmpty`: omit the field instead of substituting the default
//! - `_properties`: (objects) field name to child node; required, non-empty
//! - `_items`: (arrays) one node for every element, or a list of nodes matched
//!   by element type; required
//!
//! ## Example
//!
//! ```rust
//! use schema_template::{compile, SchemaNode};
//! use serde_json::json;
//!
//! let schema = SchemaNode::from_value(&json!({
//!     "_type": "object",
//!     "_properties": {
//!         "name": {"_type": "string", "_default": "anon"},
//!         "age": {"_type": "number", "_default": 0, "_removeEmpty": true}
//!     }
//! }));
//!
//! let out = compile(&schema, &json!({"extra": true})).unwrap();
//! assert_eq!(out, Some(json!({"name": "anon"})));
//! ```

pub mod compiler;
pub mod error;
pub mod options;
pub mod schema;

pub use compiler::{Resolved, SchemaCompiler};
pub use error::{Result, TemplateError};
pub use options::CompileOptions;
pub use schema::{
    ArrayNode, BooleanNode, Items, NumberNode, ObjectNode, SchemaNode, SchemaType, StringNode,
    UnrecognizedNode,
};

use serde_json::Value;

/// Compile `data` against `schema`. `None` means the result is undefined.
pub fn compile(schema: &SchemaNode, data: &Value) -> Result<Option<Value>> {
    SchemaCompiler::default().compile(schema, data)
}

/// Compile `data` against `schema`, keeping the `(value, removeEmpty)` pair
/// for primitive roots.
pub fn compile_with_omit_signal(schema: &SchemaNode, data: &Value) -> Result<Resolved> {
    compile_with_options(schema, data, &CompileOptions::new().with_omit_signal(true))
}

/// Compile with explicit [`CompileOptions`]
pub fn compile_with_options(
    schema: &SchemaNode,
    data: &Value,
    options: &CompileOptions,
) -> Result<Resolved> {
    SchemaCompiler::new(*options).resolve(schema, data)
}
