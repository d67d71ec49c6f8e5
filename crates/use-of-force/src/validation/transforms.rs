//! Sanitisers attached to form fields.

use serde_json::Value;

use super::metadata::Transform;
use super::values::is_blank_item;

/// Trims text; blank text becomes null.
pub fn trimmed_string() -> Transform {
    Transform::new("trimmed_string", |value| match value {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Value::Null
            } else {
                Value::String(trimmed.to_string())
            }
        }
        other => other,
    })
}

/// Turns the radio values "true"/"false" into booleans.
pub fn to_boolean() -> Transform {
    Transform::new("to_boolean", |value| match value {
        Value::String(text) => match text.trim() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "" => Value::Null,
            _ => Value::String(text),
        },
        other => other,
    })
}

/// Parses whole numbers, leaving anything else for validation to reject.
pub fn to_integer() -> Transform {
    Transform::new("to_integer", |value| match value {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Value::Null;
            }
            match trimmed.parse::<i64>() {
                Ok(number) => Value::from(number),
                Err(_) => Value::String(text),
            }
        }
        other => other,
    })
}

pub fn to_upper() -> Transform {
    Transform::new("to_upper", |value| match value {
        Value::String(text) => Value::String(text.to_uppercase()),
        other => other,
    })
}

/// Drops repeatable-group entries the user left entirely blank.
pub fn remove_empty_items() -> Transform {
    Transform::new("remove_empty_items", |value| match value {
        Value::Array(items) => {
            Value::Array(items.into_iter().filter(|item| !is_blank_item(item)).collect())
        }
        other => other,
    })
}

/// Fills a missing answer with `fallback`.
pub fn default_to(fallback: Value) -> Transform {
    Transform::new("default_to", move |value| match value {
        Value::Null => fallback.clone(),
        other => other,
    })
}
