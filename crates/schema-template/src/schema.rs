//! Schema template grammar
//!
//! A template is a plain nested structure using the reserved keys `_type`,
//! `_default`, `_removeEmpty`, `_properties` and `_items`. It is parsed once
//! into a [`SchemaNode`] tree so the compiler can match on node kinds instead
//! of looking keys up on every call.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::str::FromStr;

use tracing::warn;

use crate::error::{Result, TemplateError};

pub const TYPE_KEY: &str = "_type";
pub const DEFAULT_KEY: &str = "_default";
pub const REMOVE_EMPTY_KEY: &str = "_removeEmpty";
pub const PROPERTIES_KEY: &str = "_properties";
pub const ITEMS_KEY: &str = "_items";

/// Node kinds understood by the compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
        }
    }

    /// Parse a `_type` value; unknown names yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(SchemaType::String),
            "number" => Some(SchemaType::Number),
            "boolean" => Some(SchemaType::Boolean),
            "object" => Some(SchemaType::Object),
            "array" => Some(SchemaType::Array),
            _ => None,
        }
    }
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `typeof`-style type name of a data value.
///
/// Arrays and `null` both report `"object"`, so an `object` item schema in a
/// heterogeneous array matches them.
pub fn runtime_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
    }
}

/// Truthiness of a data value as a dynamic language would see it
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringNode {
    pub default: Option<String>,
    pub remove_empty: bool,
}

impl StringNode {
    /// An empty string default does not count as configured
    pub fn has_default(&self) -> bool {
        self.default.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberNode {
    pub default: Option<Number>,
    pub remove_empty: bool,
}

impl NumberNode {
    /// Zero counts as a configured default
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooleanNode {
    pub default: Option<bool>,
    pub remove_empty: bool,
}

impl BooleanNode {
    /// Only a `true` default counts as configured
    pub fn has_default(&self) -> bool {
        self.default == Some(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectNode {
    /// Declared fields, in template order. Must be non-empty at compile time.
    pub properties: IndexMap<String, SchemaNode>,
    pub default: Option<Map<String, Value>>,
    pub remove_empty: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayNode {
    /// Element schema(s). `None` is a configuration error at compile time.
    pub items: Option<Items>,
    pub default: Option<Vec<Value>>,
    pub remove_empty: bool,
}

/// Node whose `_type` is missing or not one of the known kinds.
///
/// Compiles to nothing, but a parent object can still substitute its default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnrecognizedNode {
    pub type_name: Option<String>,
    pub default: Option<Value>,
    pub remove_empty: bool,
}

/// Element schema of an array node
#[derive(Debug, Clone, PartialEq)]
pub enum Items {
    /// Every element is compiled against the same node
    Single(Box<SchemaNode>),
    /// Each element is compiled against the first node of matching type
    Tuple(Vec<SchemaNode>),
    /// `_items` was neither an object nor an array
    Malformed,
}

/// One position in a schema template
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    String(StringNode),
    Number(NumberNode),
    Boolean(BooleanNode),
    Object(ObjectNode),
    Array(ArrayNode),
    Unrecognized(UnrecognizedNode),
}

impl SchemaNode {
    /// Parse a template from its plain JSON form.
    ///
    /// Never fails: shape problems surface at compile time, and a `_default`
    /// of the wrong type is logged and dropped.
    pub fn from_value(value: &Value) -> Self {
        parse_node(value, "$")
    }

    pub fn schema_type(&self) -> Option<SchemaType> {
        match self {
            SchemaNode::String(_) => Some(SchemaType::String),
            SchemaNode::Number(_) => Some(SchemaType::Number),
            SchemaNode::Boolean(_) => Some(SchemaType::Boolean),
            SchemaNode::Object(_) => Some(SchemaType::Object),
            SchemaNode::Array(_) => Some(SchemaType::Array),
            SchemaNode::Unrecognized(_) => None,
        }
    }

    /// Declared `_type` as written in the template
    pub fn type_name(&self) -> Option<&str> {
        match self {
            SchemaNode::Unrecognized(node) => node.type_name.as_deref(),
            other => other.schema_type().map(|t| t.as_str()),
        }
    }

    pub fn remove_empty(&self) -> bool {
        match self {
            SchemaNode::String(node) => node.remove_empty,
            SchemaNode::Number(node) => node.remove_empty,
            SchemaNode::Boolean(node) => node.remove_empty,
            SchemaNode::Object(node) => node.remove_empty,
            SchemaNode::Array(node) => node.remove_empty,
            SchemaNode::Unrecognized(node) => node.remove_empty,
        }
    }

    /// The `_default` of this node as a data value
    pub fn default_value(&self) -> Option<Value> {
        match self {
            SchemaNode::String(node) => node.default.clone().map(Value::String),
            SchemaNode::Number(node) => node.default.clone().map(Value::Number),
            SchemaNode::Boolean(node) => node.default.map(Value::Bool),
            SchemaNode::Object(node) => node.default.clone().map(Value::Object),
            SchemaNode::Array(node) => node.default.clone().map(Value::Array),
            SchemaNode::Unrecognized(node) => node.default.clone(),
        }
    }

    /// Whether the default is considered configured when input has the
    /// wrong type.
    pub fn has_default(&self) -> bool {
        match self {
            SchemaNode::String(node) => node.has_default(),
            SchemaNode::Number(node) => node.has_default(),
            SchemaNode::Boolean(node) => node.has_default(),
            SchemaNode::Object(node) => node.default.is_some(),
            SchemaNode::Array(node) => node.default.is_some(),
            SchemaNode::Unrecognized(node) => node.default.as_ref().is_some_and(is_truthy),
        }
    }

    /// True when the declared type differs from the data's runtime type
    pub(crate) fn mismatches(&self, value: &Value) -> bool {
        self.type_name() != Some(runtime_type_name(value))
    }
}

impl FromStr for SchemaNode {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Ok(SchemaNode::from_value(&value))
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(SchemaNode::from_value(&value))
    }
}

fn parse_node(value: &Value, path: &str) -> SchemaNode {
    let Value::Object(obj) = value else {
        return SchemaNode::Unrecognized(UnrecognizedNode::default());
    };

    let type_name = obj.get(TYPE_KEY).and_then(Value::as_str);
    let remove_empty = obj.get(REMOVE_EMPTY_KEY).is_some_and(is_truthy);
    // An explicit `null` default is the same as none at all.
    let default = obj.get(DEFAULT_KEY).filter(|v| !v.is_null());

    match type_name.and_then(SchemaType::from_name) {
        Some(SchemaType::String) => SchemaNode::String(StringNode {
            default: typed_default(default, path, SchemaType::String, |v| {
                v.as_str().map(str::to_string)
            }),
            remove_empty,
        }),
        Some(SchemaType::Number) => SchemaNode::Number(NumberNode {
            default: typed_default(default, path, SchemaType::Number, |v| match v {
                Value::Number(n) => Some(n.clone()),
                _ => None,
            }),
            remove_empty,
        }),
        Some(SchemaType::Boolean) => SchemaNode::Boolean(BooleanNode {
            default: typed_default(default, path, SchemaType::Boolean, Value::as_bool),
            remove_empty,
        }),
        Some(SchemaType::Object) => {
            let mut properties = IndexMap::new();
            if let Some(Value::Object(props)) = obj.get(PROPERTIES_KEY) {
                for (key, child) in props {
                    let child_path = format!("{}.{}", path, key);
                    properties.insert(key.clone(), parse_node(child, &child_path));
                }
            }
            SchemaNode::Object(ObjectNode {
                properties,
                default: typed_default(default, path, SchemaType::Object, |v| {
                    v.as_object().cloned()
                }),
                remove_empty,
            })
        }
        Some(SchemaType::Array) => {
            let items = match obj.get(ITEMS_KEY) {
                None | Some(Value::Null) => None,
                Some(single) if single.is_object() => {
                    let item_path = format!("{}[*]", path);
                    Some(Items::Single(Box::new(parse_node(single, &item_path))))
                }
                Some(Value::Array(nodes)) => {
                    let tuple = nodes
                        .iter()
                        .enumerate()
                        .map(|(i, node)| parse_node(node, &format!("{}[{}]", path, i)))
                        .collect();
                    Some(Items::Tuple(tuple))
                }
                Some(_) => Some(Items::Malformed),
            };
            SchemaNode::Array(ArrayNode {
                items,
                default: typed_default(default, path, SchemaType::Array, |v| {
                    v.as_array().cloned()
                }),
                remove_empty,
            })
        }
        None => SchemaNode::Unrecognized(UnrecognizedNode {
            type_name: type_name.map(str::to_string),
            default: default.cloned(),
            remove_empty,
        }),
    }
}

fn typed_default<T>(
    default: Option<&Value>,
    path: &str,
    expected: SchemaType,
    extract: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let value = default?;
    let extracted = extract(value);
    if extracted.is_none() {
        warn!(
            path,
            expected = %expected,
            found = runtime_type_name(value),
            "ignoring `_default` of the wrong type"
        );
    }
    extracted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_type_display() {
        assert_eq!(SchemaType::String.to_string(), "string");
        assert_eq!(SchemaType::Boolean.to_string(), "boolean");
        assert_eq!(SchemaType::from_name("array"), Some(SchemaType::Array));
        assert_eq!(SchemaType::from_name("date"), None);
    }

    #[test]
    fn test_runtime_type_name() {
        assert_eq!(runtime_type_name(&json!("a")), "string");
        assert_eq!(runtime_type_name(&json!(1.5)), "number");
        assert_eq!(runtime_type_name(&json!(false)), "boolean");
        assert_eq!(runtime_type_name(&json!(null)), "object");
        assert_eq!(runtime_type_name(&json!([1])), "object");
        assert_eq!(runtime_type_name(&json!({})), "object");
    }

    #[test]
    fn test_parse_nested_template() {
        let schema = SchemaNode::from_value(&json!({
            "_type": "object",
            "_properties": {
                "name": {"_type": "string", "_default": "anon"},
                "age": {"_type": "number", "_default": 0, "_removeEmpty": true},
                "tags": {"_type": "array", "_items": {"_type": "string"}}
            }
        }));

        let SchemaNode::Object(obj) = schema else {
            panic!("expected object node");
        };
        let keys: Vec<&str> = obj.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "age", "tags"]);
        assert_eq!(
            obj.properties["name"],
            SchemaNode::String(StringNode {
                default: Some("anon".to_string()),
                remove_empty: false,
            })
        );
        assert!(obj.properties["age"].remove_empty());
        assert!(obj.properties["age"].has_default());
        assert!(matches!(
            &obj.properties["tags"],
            SchemaNode::Array(ArrayNode { items: Some(Items::Single(_)), .. })
        ));
    }

    #[test]
    fn test_parse_tuple_and_malformed_items() {
        let tuple = SchemaNode::from_value(&json!({
            "_type": "array",
            "_items": [{"_type": "string"}, {"_type": "number"}]
        }));
        assert!(matches!(
            tuple,
            SchemaNode::Array(ArrayNode { items: Some(Items::Tuple(ref nodes)), .. }) if nodes.len() == 2
        ));

        let malformed = SchemaNode::from_value(&json!({"_type": "array", "_items": "string"}));
        assert!(matches!(
            malformed,
            SchemaNode::Array(ArrayNode { items: Some(Items::Malformed), .. })
        ));

        let missing = SchemaNode::from_value(&json!({"_type": "array"}));
        assert!(matches!(missing, SchemaNode::Array(ArrayNode { items: None, .. })));
    }

    #[test]
    fn test_parse_unrecognized() {
        let node = SchemaNode::from_value(&json!({"_type": "date", "_default": "today"}));
        assert_eq!(node.schema_type(), None);
        assert_eq!(node.type_name(), Some("date"));
        assert_eq!(node.default_value(), Some(json!("today")));

        let node = SchemaNode::from_value(&json!("string"));
        assert_eq!(node, SchemaNode::Unrecognized(UnrecognizedNode::default()));
    }

    #[test]
    fn test_parse_ignores_mismatched_default() {
        let schema = SchemaNode::from_value(&json!({
            "_type": "object",
            "_properties": {
                "age": {"_type": "number", "_default": "ten"},
                "tags": {"_type": "array", "_items": {"_type": "string"}, "_default": {}}
            }
        }));

        let SchemaNode::Object(obj) = schema else {
            panic!("expected object node");
        };
        assert_eq!(obj.properties["age"].default_value(), None);
        assert!(!obj.properties["age"].has_default());
        assert_eq!(obj.properties["tags"].default_value(), None);
    }

    #[test]
    fn test_has_default_truthiness() {
        let empty = SchemaNode::String(StringNode {
            default: Some(String::new()),
            remove_empty: false,
        });
        assert!(!empty.has_default());

        let zero = SchemaNode::from_value(&json!({"_type": "number", "_default": 0}));
        assert!(zero.has_default());

        let falsy = SchemaNode::from_value(&json!({"_type": "boolean", "_default": false}));
        assert!(!falsy.has_default());
        assert_eq!(falsy.default_value(), Some(json!(false)));
    }

    #[test]
    fn test_null_default_is_ignored() {
        let node = SchemaNode::from_value(&json!({"_type": "string", "_default": null}));
        assert_eq!(node.default_value(), None);
    }

    #[test]
    fn test_from_str_and_deserialize() {
        let node: SchemaNode = r#"{"_type": "boolean", "_default": true}"#.parse().unwrap();
        assert_eq!(node.default_value(), Some(json!(true)));

        let node: SchemaNode = serde_json::from_value(json!({"_type": "string"})).unwrap();
        assert_eq!(node.schema_type(), Some(SchemaType::String));

        let node: SchemaNode = serde_json::from_value(json!({"_type": "boolean", "_default": 1})).unwrap();
        assert_eq!(node.default_value(), None);

        assert!("{not json".parse::<SchemaNode>().is_err());
    }
}
