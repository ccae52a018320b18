use std::cmp::Ordering;

use serde_json::Value;

use super::error::FilterError;
use super::types::{FilterOrderInfo, FilterRecord, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    pub fn generate(infos: &[FilterOrderInfo]) -> Result<String, FilterError> {
        if infos.is_empty() { return Ok(String::new()); }
        for info in infos {
            super::filter::Filter::validate_column(&info.column)?;
        }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        Ok(format!("ORDER BY {}", parts.join(", ")))
    }

    /// In-process equivalent of the generated ORDER BY. NULL sorts first, as in SQLite.
    pub fn compare(infos: &[FilterOrderInfo], a: &impl FilterRecord, b: &impl FilterRecord) -> Ordering {
        for info in infos {
            let ordering = compare_values(a.field(&info.column).as_ref(), b.field(&info.column).as_ref());
            let ordering = match info.sort {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        // Byte-wise, matching SQLite's default BINARY collation
        (Some(Value::String(x)), Some(Value::String(y))) => x.as_bytes().cmp(y.as_bytes()),
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x.as_f64().partial_cmp(&y.as_f64()).unwrap_or(Ordering::Equal),
        },
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Row(i64, &'static str);

    impl FilterRecord for Row {
        fn field(&self, column: &str) -> Option<Value> {
            match column {
                "id" => Some(json!(self.0)),
                "name" => Some(json!(self.1)),
                _ => None,
            }
        }
    }

    #[test]
    fn generates_order_clause() {
        let sql = FilterOrder::generate(&[FilterOrderInfo::asc("name"), FilterOrderInfo::asc("id")]).unwrap();
        assert_eq!(sql, "ORDER BY \"name\" ASC, \"id\" ASC");
    }

    #[test]
    fn compare_breaks_ties_on_later_columns() {
        let order = [FilterOrderInfo::asc("name"), FilterOrderInfo::asc("id")];
        assert_eq!(FilterOrder::compare(&order, &Row(2, "Paris"), &Row(1, "Paris")), Ordering::Greater);
        assert_eq!(FilterOrder::compare(&order, &Row(9, "Antwerp"), &Row(1, "Paris")), Ordering::Less);
    }

    #[test]
    fn uppercase_sorts_before_lowercase() {
        let order = [FilterOrderInfo::asc("name")];
        assert_eq!(FilterOrder::compare(&order, &Row(1, "Zurich"), &Row(2, "amsterdam")), Ordering::Less);
    }
}
