//! Parsed rows and blank-row filtering.

use indexmap::IndexMap;
use serde_json::Value;

/// One parsed row; column order follows the header
pub type Row = IndexMap<String, Value>;

/// A cell that carries no data
#[inline]
#[must_use]
pub fn is_blank_cell(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// A row whose every cell is blank
#[must_use]
pub fn is_blank_row(row: &Row) -> bool {
    row.values().all(is_blank_cell)
}

/// Drop rows with no data, keeping order
#[must_use]
pub fn filter_blank_rows(rows: Vec<Row>) -> Vec<Row> {
    rows.into_iter().filter(|row| !is_blank_row(row)).collect()
}

/// Text shown for a cell; null renders as empty
#[must_use]
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn drops_only_fully_blank_rows() {
        let rows = vec![
            row(json!({"a": 1, "b": null})),
            row(json!({"a": null, "b": ""})),
            row(json!({"a": "", "b": 0})),
            row(json!({"a": false, "b": null})),
        ];
        let kept = filter_blank_rows(rows);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[1]["b"], json!(0));
    }

    #[test]
    fn cell_text_renders_null_as_empty() {
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&json!("x")), "x");
        assert_eq!(cell_text(&json!(3.5)), "3.5");
        assert_eq!(cell_text(&json!(true)), "true");
    }
}
