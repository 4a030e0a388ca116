//! Shared pieces of tool input schemas.

use serde_json::{Value, json};

use crate::config::fields::FieldSet;

pub fn id_property(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

pub fn fields_property(set: FieldSet) -> Value {
    json!({
        "type": "string",
        "description": format!(
            "Comma-separated list of fields to return. Available: {}",
            set.names().join(", ")
        )
    })
}

pub fn search_limit_property() -> Value {
    json!({
        "type": "integer",
        "default": 10,
        "minimum": 1,
        "maximum": 100,
        "description": "Number of results to return (1-100)"
    })
}

pub fn page_limit_property() -> Value {
    json!({
        "type": "integer",
        "default": 100,
        "minimum": 1,
        "description": "Number of results to return (values above 100 are capped at 100)"
    })
}

pub fn offset_property() -> Value {
    json!({
        "type": "integer",
        "default": 0,
        "minimum": 0,
        "description": "Offset for pagination"
    })
}
