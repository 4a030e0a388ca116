//! JSON output formatting for tool results.

use serde_json::{Value, json};

/// Render a result as the indented JSON text sent to the agent.
#[must_use]
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Attach a `_metadata` block describing how a response was obtained.
///
/// Returns `None` when `response` is not a JSON object.
#[must_use]
pub fn with_metadata(mut response: Value, query: &str, parameters: Value, endpoint: &str) -> Option<Value> {
    let obj = response.as_object_mut()?;
    obj.insert(
        "_metadata".to_string(),
        json!({
            "query": query,
            "parameters_used": parameters,
            "api_endpoint": endpoint,
        }),
    );
    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_metadata_on_object() {
        let response = json!({"total": 2, "data": []});
        let out = with_metadata(response, "q", json!({"limit": 3}), "/graph/v1/paper/search").unwrap();

        assert_eq!(out["total"], 2);
        assert_eq!(out["_metadata"]["query"], "q");
        assert_eq!(out["_metadata"]["parameters_used"]["limit"], 3);
        assert_eq!(out["_metadata"]["api_endpoint"], "/graph/v1/paper/search");
    }

    #[test]
    fn test_with_metadata_rejects_arrays() {
        assert!(with_metadata(json!([1, 2]), "q", json!({}), "/x").is_none());
    }

    #[test]
    fn test_pretty_is_indented() {
        let text = pretty(&json!({"a": 1}));
        assert!(text.contains("\n  \"a\": 1"));
    }
}
