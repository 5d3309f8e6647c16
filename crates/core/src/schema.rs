//! Statically declared output schemas with a validation pass.
//!
//! The generation backend is asked for schema-guided decoding, but a
//! non-deterministic text model is never trusted to honor it: every
//! structured response is re-validated here, independent of whatever
//! typing the backend library claims. Agents declare their contracts as
//! [`Schema`] values, render them onto the wire with [`Schema::to_wire`],
//! and check the returned JSON with [`Schema::validate`] before
//! deserializing into domain types.

use serde::{Deserialize, Serialize};

/// A structural output contract.
///
/// The shape is the OpenAPI subset the generation backend understands:
/// objects with required fields, arrays, strings (optionally restricted
/// to an enum), bounded numbers, integers, and booleans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Schema {
    Object {
        /// Property order is preserved on the wire.
        properties: Vec<(String, Schema)>,
        required: Vec<String>,
    },
    Array {
        items: Box<Schema>,
    },
    String {
        description: Option<String>,
        /// When non-empty, the value must be one of these.
        enum_values: Vec<String>,
    },
    Number {
        description: Option<String>,
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Integer,
    Boolean,
}

impl Schema {
    /// An object schema from `(name, schema)` pairs; every listed
    /// property is required.
    pub fn object(properties: Vec<(&str, Schema)>) -> Self {
        let required = properties.iter().map(|(n, _)| n.to_string()).collect();
        Self::Object {
            properties: properties
                .into_iter()
                .map(|(n, s)| (n.to_string(), s))
                .collect(),
            required,
        }
    }

    pub fn array(items: Schema) -> Self {
        Self::Array {
            items: Box::new(items),
        }
    }

    pub fn string() -> Self {
        Self::String {
            description: None,
            enum_values: Vec::new(),
        }
    }

    pub fn string_described(description: &str) -> Self {
        Self::String {
            description: Some(description.to_string()),
            enum_values: Vec::new(),
        }
    }

    pub fn string_enum(values: &[&str]) -> Self {
        Self::String {
            description: None,
            enum_values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn number_bounded(description: &str, minimum: f64, maximum: f64) -> Self {
        Self::Number {
            description: Some(description.to_string()),
            minimum: Some(minimum),
            maximum: Some(maximum),
        }
    }

    pub fn integer() -> Self {
        Self::Integer
    }

    pub fn boolean() -> Self {
        Self::Boolean
    }

    /// Render the wire representation the backend's schema-guided
    /// decoding expects (uppercase type names, OpenAPI subset).
    pub fn to_wire(&self) -> serde_json::Value {
        match self {
            Self::Object {
                properties,
                required,
            } => {
                let mut props = serde_json::Map::new();
                for (name, schema) in properties {
                    props.insert(name.clone(), schema.to_wire());
                }
                serde_json::json!({
                    "type": "OBJECT",
                    "properties": props,
                    "required": required,
                })
            }
            Self::Array { items } => serde_json::json!({
                "type": "ARRAY",
                "items": items.to_wire(),
            }),
            Self::String {
                description,
                enum_values,
            } => {
                let mut value = serde_json::json!({ "type": "STRING" });
                if let Some(desc) = description {
                    value["description"] = serde_json::json!(desc);
                }
                if !enum_values.is_empty() {
                    value["enum"] = serde_json::json!(enum_values);
                }
                value
            }
            Self::Number {
                description,
                minimum,
                maximum,
            } => {
                let mut value = serde_json::json!({ "type": "NUMBER" });
                if let Some(desc) = description {
                    value["description"] = serde_json::json!(desc);
                }
                if let Some(min) = minimum {
                    value["minimum"] = serde_json::json!(min);
                }
                if let Some(max) = maximum {
                    value["maximum"] = serde_json::json!(max);
                }
                value
            }
            Self::Integer => serde_json::json!({ "type": "INTEGER" }),
            Self::Boolean => serde_json::json!({ "type": "BOOLEAN" }),
        }
    }

    /// Validate a parsed JSON value against this schema.
    ///
    /// Returns the first violation found, with a `$`-rooted path so the
    /// caller's error message points at the offending field.
    pub fn validate(&self, value: &serde_json::Value) -> std::result::Result<(), Violation> {
        self.validate_at(value, "$")
    }

    fn validate_at(
        &self,
        value: &serde_json::Value,
        path: &str,
    ) -> std::result::Result<(), Violation> {
        match self {
            Self::Object {
                properties,
                required,
            } => {
                let map = value.as_object().ok_or_else(|| Violation {
                    path: path.to_string(),
                    message: format!("expected object, got {}", kind_of(value)),
                })?;
                for name in required {
                    if !map.contains_key(name) {
                        return Err(Violation {
                            path: path.to_string(),
                            message: format!("missing required field '{name}'"),
                        });
                    }
                }
                for (name, schema) in properties {
                    if let Some(field) = map.get(name) {
                        schema.validate_at(field, &format!("{path}.{name}"))?;
                    }
                }
                Ok(())
            }
            Self::Array { items } => {
                let elements = value.as_array().ok_or_else(|| Violation {
                    path: path.to_string(),
                    message: format!("expected array, got {}", kind_of(value)),
                })?;
                for (i, element) in elements.iter().enumerate() {
                    items.validate_at(element, &format!("{path}[{i}]"))?;
                }
                Ok(())
            }
            Self::String { enum_values, .. } => {
                let s = value.as_str().ok_or_else(|| Violation {
                    path: path.to_string(),
                    message: format!("expected string, got {}", kind_of(value)),
                })?;
                if !enum_values.is_empty() && !enum_values.iter().any(|v| v == s) {
                    return Err(Violation {
                        path: path.to_string(),
                        message: format!("'{s}' is not one of {enum_values:?}"),
                    });
                }
                Ok(())
            }
            Self::Number {
                minimum, maximum, ..
            } => {
                let n = value.as_f64().ok_or_else(|| Violation {
                    path: path.to_string(),
                    message: format!("expected number, got {}", kind_of(value)),
                })?;
                if let Some(min) = minimum {
                    if n < *min {
                        return Err(Violation {
                            path: path.to_string(),
                            message: format!("{n} is below the minimum {min}"),
                        });
                    }
                }
                if let Some(max) = maximum {
                    if n > *max {
                        return Err(Violation {
                            path: path.to_string(),
                            message: format!("{n} is above the maximum {max}"),
                        });
                    }
                }
                Ok(())
            }
            Self::Integer => {
                if value.as_i64().is_none() && value.as_u64().is_none() {
                    return Err(Violation {
                        path: path.to_string(),
                        message: format!("expected integer, got {}", kind_of(value)),
                    });
                }
                Ok(())
            }
            Self::Boolean => {
                if !value.is_boolean() {
                    return Err(Violation {
                        path: path.to_string(),
                        message: format!("expected boolean, got {}", kind_of(value)),
                    });
                }
                Ok(())
            }
        }
    }
}

/// A single schema violation with the path to the offending value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "at {}: {}", self.path, self.message)
    }
}

impl std::error::Error for Violation {}

fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_schema() -> Schema {
        Schema::object(vec![
            ("title", Schema::string()),
            ("count", Schema::number_bounded("a count", 0.0, 100.0)),
            ("tags", Schema::array(Schema::string())),
            ("level", Schema::string_enum(&["High", "Medium", "Low"])),
            ("done", Schema::boolean()),
        ])
    }

    #[test]
    fn valid_value_passes() {
        let value = json!({
            "title": "ok",
            "count": 42,
            "tags": ["a", "b"],
            "level": "High",
            "done": false,
        });
        assert!(sample_schema().validate(&value).is_ok());
    }

    #[test]
    fn missing_required_field_reports_name() {
        let value = json!({"title": "ok"});
        let violation = sample_schema().validate(&value).unwrap_err();
        assert!(violation.message.contains("required"));
    }

    #[test]
    fn wrong_type_reports_path() {
        let value = json!({
            "title": "ok",
            "count": 42,
            "tags": ["a", 5],
            "level": "High",
            "done": false,
        });
        let violation = sample_schema().validate(&value).unwrap_err();
        assert_eq!(violation.path, "$.tags[1]");
    }

    #[test]
    fn enum_membership_enforced() {
        let value = json!({
            "title": "ok",
            "count": 1,
            "tags": [],
            "level": "Extreme",
            "done": true,
        });
        let violation = sample_schema().validate(&value).unwrap_err();
        assert!(violation.message.contains("Extreme"));
        assert_eq!(violation.path, "$.level");
    }

    #[test]
    fn numeric_bounds_enforced() {
        let value = json!({
            "title": "ok",
            "count": 101,
            "tags": [],
            "level": "Low",
            "done": true,
        });
        let violation = sample_schema().validate(&value).unwrap_err();
        assert!(violation.message.contains("maximum"));
    }

    #[test]
    fn wire_rendering_uses_uppercase_types() {
        let wire = sample_schema().to_wire();
        assert_eq!(wire["type"], "OBJECT");
        assert_eq!(wire["properties"]["title"]["type"], "STRING");
        assert_eq!(wire["properties"]["tags"]["type"], "ARRAY");
        assert_eq!(wire["properties"]["tags"]["items"]["type"], "STRING");
        assert_eq!(wire["properties"]["count"]["minimum"], 0.0);
        assert_eq!(
            wire["required"],
            json!(["title", "count", "tags", "level", "done"])
        );
    }

    #[test]
    fn integer_accepts_only_integers() {
        assert!(Schema::integer().validate(&json!(3)).is_ok());
        assert!(Schema::integer().validate(&json!(3.5)).is_err());
        assert!(Schema::integer().validate(&json!("3")).is_err());
    }
}
