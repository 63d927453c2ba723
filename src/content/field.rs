/**
 * Field Extraction
 * Default-substituting accessors for raw document payloads. A missing,
 * null, or mistyped field yields the field kind's documented default so
 * that mapped entities never carry nulls.
 */
use serde_json::Value;

/// String field, defaulting to the empty string.
pub fn text(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Boolean field, defaulting to `false`.
pub fn flag(data: &Value, key: &str) -> bool {
    flag_or(data, key, false)
}

/// Boolean field with an explicit default (e.g. `is_visible` defaults true).
pub fn flag_or(data: &Value, key: &str, default: bool) -> bool {
    data.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
}

/// Integer field, defaulting to 0.
pub fn integer(data: &Value, key: &str) -> i64 {
    data.get(key).and_then(|v| v.as_i64()).unwrap_or(0)
}

/// Numeric field, defaulting to 0.0.
pub fn number(data: &Value, key: &str) -> f64 {
    data.get(key).and_then(|v| v.as_f64()).unwrap_or(0.0)
}

/// String-array field, defaulting to an empty array. Non-string elements
/// are skipped rather than failing the read.
pub fn text_list(data: &Value, key: &str) -> Vec<String> {
    data.get(key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_defaults_to_empty() {
        let data = json!({ "name": "Rust", "nil": null, "num": 3 });
        assert_eq!(text(&data, "name"), "Rust");
        assert_eq!(text(&data, "missing"), "");
        assert_eq!(text(&data, "nil"), "");
        assert_eq!(text(&data, "num"), "");
    }

    #[test]
    fn test_flag_defaults() {
        let data = json!({ "featured": true });
        assert!(flag(&data, "featured"));
        assert!(!flag(&data, "missing"));
        assert!(flag_or(&data, "missing", true));
        assert!(!flag_or(&json!({ "v": false }), "v", true));
    }

    #[test]
    fn test_integer_and_number_defaults() {
        let data = json!({ "likes": 7, "years": 2.5 });
        assert_eq!(integer(&data, "likes"), 7);
        assert_eq!(integer(&data, "missing"), 0);
        assert_eq!(number(&data, "years"), 2.5);
        assert_eq!(number(&data, "missing"), 0.0);
    }

    #[test]
    fn test_text_list_skips_non_strings() {
        let data = json!({ "ids": ["a", 1, "b", null], "scalar": "x" });
        assert_eq!(text_list(&data, "ids"), vec!["a", "b"]);
        assert!(text_list(&data, "missing").is_empty());
        assert!(text_list(&data, "scalar").is_empty());
    }
}
