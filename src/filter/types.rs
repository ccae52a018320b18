use serde_json::Value;

/// A single predicate over record columns. Rendered to SQL by `FilterWhere::generate`
/// and evaluated in process by `FilterWhere::matches`, so both backends agree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    /// Exact, case-sensitive equality
    Eq { column: String, value: Value },
    /// Case-sensitive substring match; a NULL column never matches
    Contains { column: String, value: String },
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

impl FilterOrderInfo {
    pub fn asc(column: impl Into<String>) -> Self {
        Self { column: column.into(), sort: SortDirection::Asc }
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

/// Column access for in-process evaluation of a filter
pub trait FilterRecord {
    fn field(&self, column: &str) -> Option<Value>;
}

/// Listing filters accepted by the cities collection.
///
/// Blank values are dropped and surrounding whitespace is trimmed, so
/// `?name=%20Paris%20` filters on `Paris`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityFilter {
    pub name: Option<String>,
    pub search_query: Option<String>,
}

impl CityFilter {
    pub fn new(name: Option<&str>, search_query: Option<&str>) -> Self {
        Self {
            name: normalize(name),
            search_query: normalize(search_query),
        }
    }

    /// Combined predicate, or `None` when no filter applies
    pub fn condition(&self) -> Option<FilterCondition> {
        let mut conditions = vec![];

        if let Some(name) = &self.name {
            conditions.push(FilterCondition::Eq {
                column: "name".to_string(),
                value: Value::String(name.clone()),
            });
        }

        if let Some(search) = &self.search_query {
            conditions.push(FilterCondition::Or(vec![
                FilterCondition::Contains { column: "name".to_string(), value: search.clone() },
                FilterCondition::Contains { column: "description".to_string(), value: search.clone() },
            ]));
        }

        match conditions.len() {
            0 => None,
            1 => conditions.pop(),
            _ => Some(FilterCondition::And(conditions)),
        }
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
