//! Declarative input schemas.
//!
//! An [`InputSchema`] is an ordered list of [`FieldSpec`]s. The gateway uses
//! it three ways: best-effort upcasting of loosely typed client input,
//! validation that reports every violation in declaration order, and
//! rendering a JSON Schema object for `tools/list`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use toolgate_core::FieldError;

/// Primitive type of an input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string.
    String,
    /// Whole number.
    Integer,
    /// Any JSON number.
    Number,
    /// `true` / `false`.
    Boolean,
    /// JSON array.
    List,
    /// JSON object.
    Map,
    /// No type constraint.
    Any,
}

impl FieldType {
    /// Schema name of the type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::Map => "map",
            Self::Any => "any",
        }
    }

    /// JSON Schema `type` keyword for this field type.
    #[must_use]
    pub fn json_type(self) -> Option<&'static str> {
        match self {
            Self::String => Some("string"),
            Self::Integer => Some("integer"),
            Self::Number => Some("number"),
            Self::Boolean => Some("boolean"),
            Self::List => Some("array"),
            Self::Map => Some("object"),
            Self::Any => None,
        }
    }

    /// Whether `value` satisfies this type. `null` never does, except for
    /// [`FieldType::Any`].
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => {
                value.is_i64() || value.is_u64() || value.as_f64().and_then(integral).is_some()
            },
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::List => value.is_array(),
            Self::Map => value.is_object(),
            Self::Any => true,
        }
    }

    /// Coerce `value` towards this type where the intent is unambiguous.
    ///
    /// Values that cannot be coerced are returned unchanged so validation
    /// can report them.
    #[must_use]
    pub fn upcast(self, value: Value) -> Value {
        match self {
            Self::List => match value {
                Value::Array(_) | Value::Null => value,
                Value::String(s) if s.is_empty() => Value::String(s),
                other => Value::Array(vec![other]),
            },
            Self::Boolean => {
                let parsed = match &value {
                    Value::String(s) => parse_bool(s),
                    Value::Number(n) => match n.as_i64() {
                        Some(0) => Some(false),
                        Some(1) => Some(true),
                        _ => None,
                    },
                    _ => None,
                };
                parsed.map_or(value, Value::Bool)
            },
            Self::Integer => {
                let parsed = match &value {
                    Value::String(s) => parse_integer(s),
                    Value::Number(n) if n.is_f64() => n.as_f64().and_then(integral),
                    _ => None,
                };
                parsed.map_or(value, Value::from)
            },
            Self::Number => {
                let parsed = match &value {
                    Value::String(s) => parse_number(s),
                    _ => None,
                };
                parsed.unwrap_or(value)
            },
            Self::String | Self::Map | Self::Any => value,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// 2^63, the first `f64` past `i64::MAX`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// `value` as an `i64` when it has no fractional part and fits.
#[allow(clippy::cast_possible_truncation)]
fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && (-I64_LIMIT..I64_LIMIT).contains(&value))
        .then(|| value as i64)
}

fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(integral))
}

fn parse_number(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(Value::from(n));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

/// Short name for the JSON kind of `value`, used in validation messages.
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// A single declared input field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Argument name.
    pub name: String,
    /// Expected type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the argument must be present.
    #[serde(default)]
    pub required: bool,
    /// Value used when an optional argument is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSpec {
    /// Create an optional field.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            default: None,
            description: None,
        }
    }

    /// Create a required field.
    #[must_use]
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            required: true,
            ..Self::new(name, field_type)
        }
    }

    /// Set the default value.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut property = Map::new();
        if let Some(json_type) = self.field_type.json_type() {
            property.insert("type".to_owned(), Value::from(json_type));
        }
        if let Some(description) = &self.description {
            property.insert("description".to_owned(), Value::from(description.as_str()));
        }
        if let Some(default) = &self.default {
            property.insert("default".to_owned(), default.clone());
        }
        Value::Object(property)
    }
}

/// Ordered set of input fields for one tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSchema {
    fields: Vec<FieldSpec>,
}

impl InputSchema {
    /// Create an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Return a copy of `arguments` with declared fields coerced towards
    /// their types. Undeclared arguments are passed through untouched.
    #[must_use]
    pub fn upcast(&self, arguments: &Map<String, Value>) -> Map<String, Value> {
        let mut out = arguments.clone();
        for spec in &self.fields {
            if let Some(value) = out.get_mut(&spec.name) {
                let raw = value.take();
                *value = spec.field_type.upcast(raw);
            }
        }
        out
    }

    /// Check `arguments` against the schema.
    ///
    /// Every violation is reported, in declaration order. A `null` value
    /// counts as absent.
    #[must_use]
    pub fn validate(&self, arguments: &Map<String, Value>) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for spec in &self.fields {
            match arguments.get(&spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        errors.push(FieldError::new(
                            &spec.name,
                            format!("The required field '{}' is missing.", spec.name),
                        ));
                    }
                },
                Some(value) if !spec.field_type.matches(value) => {
                    errors.push(FieldError::new(
                        &spec.name,
                        format!(
                            "The field '{}' must be of type {}, {} given.",
                            spec.name,
                            spec.field_type,
                            value_kind(value)
                        ),
                    ));
                },
                Some(_) => {},
            }
        }
        errors
    }

    /// Fill absent (or `null`) optional fields with their defaults.
    pub fn apply_defaults(&self, arguments: &mut Map<String, Value>) {
        for spec in &self.fields {
            let Some(default) = &spec.default else {
                continue;
            };
            let absent = arguments.get(&spec.name).is_none_or(Value::is_null);
            if absent {
                arguments.insert(spec.name.clone(), default.clone());
            }
        }
    }

    /// Check the schema itself: names are non-empty and unique, defaults
    /// match their declared types.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn check(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for spec in &self.fields {
            if spec.name.trim().is_empty() {
                return Err("input field with an empty name".to_owned());
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(format!("input field '{}' declared twice", spec.name));
            }
            if let Some(default) = &spec.default
                && !spec.field_type.matches(default)
            {
                return Err(format!(
                    "default for '{}' is not of type {}",
                    spec.name, spec.field_type
                ));
            }
        }
        Ok(())
    }

    /// Render as a JSON Schema object.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|spec| (spec.name.clone(), spec.to_json_schema()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.name.as_str())
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty()
            && let Some(object) = schema.as_object_mut()
        {
            object.insert("required".to_owned(), json!(required));
        }
        schema
    }
}

impl FromIterator<FieldSpec> for InputSchema {
    fn from_iter<I: IntoIterator<Item = FieldSpec>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
