//! Argument validation
//!
//! Models occasionally send arguments that break the declared schema (missing
//! keys, wrong types, malformed JSON turned into `null`). These are caught
//! here so the tool can report the problem back instead of misbehaving.

use serde_json::Value;

use spec_rag_core::{CoreError, CoreResult};
use spec_rag_llm::types::ParameterSchema;

/// Check `args` against an object schema.
///
/// Supports the subset of JSON schema the tools declare: `type`,
/// `properties`, `required`, `enum` and `additionalProperties: false`.
pub fn validate_arguments(schema: &ParameterSchema, args: &Value) -> CoreResult<()> {
    check_value(schema, args, "arguments")
}

fn check_value(schema: &ParameterSchema, value: &Value, path: &str) -> CoreResult<()> {
    let type_ok = match schema.schema_type.as_str() {
        "object" => value.is_object(),
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        _ => true,
    };
    if !type_ok {
        return Err(CoreError::invalid_arguments(format!(
            "`{}` must be of type {}, got {}",
            path,
            schema.schema_type,
            type_name(value)
        )));
    }

    if let (Some(allowed), Some(s)) = (&schema.enum_values, value.as_str()) {
        if !allowed.iter().any(|a| a == s) {
            return Err(CoreError::invalid_arguments(format!(
                "`{}` must be one of {:?}",
                path, allowed
            )));
        }
    }

    if let Some(obj) = value.as_object() {
        for key in schema.required.iter().flatten() {
            if !obj.contains_key(key) {
                return Err(CoreError::invalid_arguments(format!(
                    "missing required argument `{}`",
                    key
                )));
            }
        }

        for (key, item) in obj {
            match schema.properties.as_ref().and_then(|p| p.get(key)) {
                Some(prop) => check_value(prop, item, key)?,
                None if schema.additional_properties == Some(false) => {
                    return Err(CoreError::invalid_arguments(format!(
                        "unexpected argument `{}`",
                        key
                    )));
                }
                None => {}
            }
        }
    }

    if let (Some(items), Some(arr)) = (&schema.items, value.as_array()) {
        for (i, item) in arr.iter().enumerate() {
            check_value(items, item, &format!("{}[{}]", path, i))?;
        }
    }

    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
