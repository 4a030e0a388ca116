//! Removal of the open-access PDF disclaimer from API responses.
//!
//! The API attaches a legal disclaimer string to every `openAccessPdf`
//! object. It carries no information for agents and repeats across every
//! paper in large result sets, so it is dropped before results leave the
//! client.

use serde_json::{Map, Value};

/// Key whose object value carries the disclaimer.
pub const OPEN_ACCESS_PDF_FIELD: &str = "openAccessPdf";

/// Field removed from `openAccessPdf` objects.
pub const DISCLAIMER_FIELD: &str = "disclaimer";

/// Return a copy of `value` with `openAccessPdf.disclaimer` removed at any depth.
///
/// Only a `disclaimer` key directly inside an object stored under
/// `openAccessPdf` is removed; everything else, including array order,
/// is preserved. The input is never modified.
#[must_use]
pub fn strip_disclaimers(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, child)| {
                    let cleaned = match child {
                        Value::Object(pdf) if key == OPEN_ACCESS_PDF_FIELD => {
                            Value::Object(without_disclaimer(pdf))
                        }
                        _ => strip_disclaimers(child),
                    };
                    (key.clone(), cleaned)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_disclaimers).collect()),
        scalar => scalar.clone(),
    }
}

fn without_disclaimer(pdf: &Map<String, Value>) -> Map<String, Value> {
    pdf.iter()
        .filter(|(key, _)| key.as_str() != DISCLAIMER_FIELD)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_strips_nested_disclaimer() {
        let input = json!({
            "total": 1,
            "data": [{
                "paperId": "abc",
                "openAccessPdf": {
                    "url": "https://example.org/a.pdf",
                    "status": "GREEN",
                    "disclaimer": "Notice: ..."
                }
            }]
        });

        let output = strip_disclaimers(&input);

        assert_eq!(
            output["data"][0]["openAccessPdf"],
            json!({"url": "https://example.org/a.pdf", "status": "GREEN"})
        );
        assert_eq!(output["total"], 1);
        // Input untouched
        assert!(input["data"][0]["openAccessPdf"].get("disclaimer").is_some());
    }

    #[test]
    fn test_keeps_disclaimer_elsewhere() {
        let input = json!({
            "disclaimer": "top-level",
            "paper": {"disclaimer": "not under openAccessPdf"}
        });
        assert_eq!(strip_disclaimers(&input), input);
    }

    #[test]
    fn test_non_object_open_access_pdf_passes_through() {
        let input = json!({"openAccessPdf": null, "other": [{"openAccessPdf": "x"}]});
        assert_eq!(strip_disclaimers(&input), input);
    }

    #[test]
    fn test_citation_edges_are_cleaned() {
        let input = json!({
            "data": [{
                "citingPaper": {
                    "openAccessPdf": {"url": "u", "disclaimer": "d"}
                }
            }]
        });
        let output = strip_disclaimers(&input);
        assert_eq!(output["data"][0]["citingPaper"]["openAccessPdf"], json!({"url": "u"}));
    }

    #[test]
    fn test_scalars_unchanged() {
        assert_eq!(strip_disclaimers(&json!(42)), json!(42));
        assert_eq!(strip_disclaimers(&json!("text")), json!("text"));
        assert_eq!(strip_disclaimers(&Value::Null), Value::Null);
    }
}
