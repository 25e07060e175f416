// src/json.rs
//
// Row-oriented JSON: an array of objects keyed by header, keys in column
// order (`preserve_order`). Columns without a header are keyed `col<N>`
// (zero-based); a repeated header gets `_<N>` appended.
use serde_json::{Map, Value};

pub fn to_json_string(headers: &Option<Vec<String>>, rows: &[Vec<String>]) -> serde_json::Result<String> {
    let objects: Vec<Value> = rows
        .iter()
        .map(|row| {
            let mut obj = Map::with_capacity(row.len());
            for (i, cell) in row.iter().enumerate() {
                let key = headers
                    .as_ref()
                    .and_then(|h| h.get(i))
                    .filter(|h| !h.is_empty())
                    .cloned()
                    .unwrap_or_else(|| format!("col{i}"));
                let key = if obj.contains_key(&key) { format!("{key}_{i}") } else { key };
                obj.insert(key, Value::String(cell.clone()));
            }
            Value::Object(obj)
        })
        .collect();
    serde_json::to_string_pretty(&objects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_headers() {
        let headers = Some(row!["Customer Name", "Ratings"]);
        let rows = vec![row!["Ann", "5.0", "extra"]];
        let text = to_json_string(&headers, &rows).unwrap();
        let v: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v[0]["Customer Name"], "Ann");
        assert_eq!(v[0]["Ratings"], "5.0");
        assert_eq!(v[0]["col2"], "extra");
    }

    #[test]
    fn keys_keep_column_order_and_repeats() {
        let headers = Some(row!["Customer Name", "Ratings", "Reviews", "Review Body", "Ratings"]);
        let rows = vec![row!["Ann", "5.0", "T", "B", "4.0"]];
        let text = to_json_string(&headers, &rows).unwrap();

        let v: Value = serde_json::from_str(&text).unwrap();
        let keys: Vec<&str> = v[0].as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Customer Name", "Ratings", "Reviews", "Review Body", "Ratings_4"]);
        assert_eq!(v[0]["Ratings_4"], "4.0");
    }

    #[test]
    fn empty_table_is_empty_array() {
        let text = to_json_string(&None, &[]).unwrap();
        assert_eq!(text.trim(), "[]");
    }
}
