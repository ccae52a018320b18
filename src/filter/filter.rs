use std::cmp::Ordering;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterCondition, FilterOrderInfo, FilterRecord, SqlResult};

/// Query description shared by both repository backends: the SQL backend renders it,
/// the in-memory backend evaluates it.
#[derive(Debug, Clone)]
pub struct Filter {
    table_name: String,
    select_columns: Vec<String>,
    where_data: Option<FilterCondition>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            select_columns: vec![],
            where_data: None,
            order_data: vec![],
            limit: None,
            offset: None,
        })
    }

    pub fn select(&mut self, columns: Vec<String>) -> Result<&mut Self, FilterError> {
        Self::validate_select_columns(&columns)?;
        self.select_columns = columns;
        Ok(self)
    }

    pub fn where_clause(&mut self, condition: Option<FilterCondition>) -> Result<&mut Self, FilterError> {
        if let Some(ref c) = condition { FilterWhere::validate(c)?; }
        self.where_data = condition;
        Ok(self)
    }

    pub fn order(&mut self, order: Vec<FilterOrderInfo>) -> Result<&mut Self, FilterError> {
        for info in &order { Self::validate_column(&info.column)?; }
        self.order_data = order;
        Ok(self)
    }

    pub fn limit(&mut self, limit: u64, offset: Option<u64>) -> &mut Self {
        self.limit = Some(limit);
        self.offset = offset;
        self
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let select_clause = self.build_select_clause();
        let (where_clause, params) = self.to_where_parts()?;
        let order_clause = FilterOrder::generate(&self.order_data)?;
        let limit_clause = self.build_limit_clause();

        let query = [
            format!("SELECT {}", select_clause),
            format!("FROM \"{}\"", self.table_name),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            order_clause,
            limit_clause,
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        Ok(SqlResult { query, params })
    }

    /// COUNT(*) over the same WHERE clause, ignoring order and paging
    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = self.to_where_parts()?;
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) AS count FROM \"{}\"", self.table_name)
        } else {
            format!("SELECT COUNT(*) AS count FROM \"{}\" WHERE {}", self.table_name, where_clause)
        };
        Ok(SqlResult { query, params })
    }

    pub fn matches(&self, record: &impl FilterRecord) -> bool {
        self.where_data.as_ref().map_or(true, |c| FilterWhere::matches(c, record))
    }

    pub fn compare(&self, a: &impl FilterRecord, b: &impl FilterRecord) -> Ordering {
        FilterOrder::compare(&self.order_data, a, b)
    }

    /// Filter, order and page records held in memory, mirroring `to_sql`
    pub fn apply<'a, R: FilterRecord>(&self, records: impl IntoIterator<Item = &'a R>) -> Vec<&'a R>
    where
        R: 'a,
    {
        let mut matched: Vec<&R> = records.into_iter().filter(|r| self.matches(*r)).collect();
        matched.sort_by(|a, b| self.compare(*a, *b));

        let offset = usize::try_from(self.offset.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = self.limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        matched.into_iter().skip(offset).take(limit).collect()
    }

    /// Count records held in memory, mirroring `to_count_sql`
    pub fn count<'a, R: FilterRecord + 'a>(&self, records: impl IntoIterator<Item = &'a R>) -> u64 {
        records.into_iter().filter(|r| self.matches(*r)).count() as u64
    }

    fn to_where_parts(&self) -> Result<(String, Vec<serde_json::Value>), FilterError> {
        match self.where_data {
            Some(ref condition) => FilterWhere::generate(condition),
            None => Ok((String::new(), vec![])),
        }
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if name.is_empty() { return Err(FilterError::InvalidTableName("Table name cannot be empty".to_string())); }
        if !Self::is_identifier(name) {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
        }
        Ok(())
    }

    pub(crate) fn validate_column(column: &str) -> Result<(), FilterError> {
        if column.is_empty() { return Err(FilterError::InvalidColumn("Column name cannot be empty".to_string())); }
        if !Self::is_identifier(column) {
            return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", column)));
        }
        Ok(())
    }

    fn validate_select_columns(columns: &[String]) -> Result<(), FilterError> {
        for column in columns {
            if column == "*" { continue; }
            Self::validate_column(column)?;
        }
        Ok(())
    }

    fn is_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }

    fn build_select_clause(&self) -> String {
        if self.select_columns.is_empty() || self.select_columns.iter().any(|c| c == "*") {
            "*".to_string()
        } else {
            self.select_columns.iter().map(|c| format!("\"{}\"", c)).collect::<Vec<_>>().join(", ")
        }
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            // SQLite needs a LIMIT before OFFSET; -1 means unbounded
            (None, Some(o)) => format!("LIMIT -1 OFFSET {}", o),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::CityFilter;
    use serde_json::{json, Value};

    struct Row(i64, &'static str, Option<&'static str>);

    impl FilterRecord for Row {
        fn field(&self, column: &str) -> Option<Value> {
            match column {
                "id" => Some(json!(self.0)),
                "name" => Some(json!(self.1)),
                "description" => self.2.map(|d| json!(d)),
                _ => None,
            }
        }
    }

    fn cities_filter(filter: &CityFilter) -> Filter {
        let mut f = Filter::new("cities").unwrap();
        f.select(vec!["id".into(), "name".into(), "description".into()]).unwrap();
        f.where_clause(filter.condition()).unwrap();
        f.order(vec![FilterOrderInfo::asc("name"), FilterOrderInfo::asc("id")]).unwrap();
        f
    }

    #[test]
    fn renders_select_with_where_order_and_limit() {
        let mut f = cities_filter(&CityFilter::new(Some("Paris"), None));
        f.limit(10, Some(20));
        let sql = f.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT \"id\", \"name\", \"description\" FROM \"cities\" WHERE \"name\" = ? ORDER BY \"name\" ASC, \"id\" ASC LIMIT 10 OFFSET 20"
        );
        assert_eq!(sql.params, vec![json!("Paris")]);
    }

    #[test]
    fn count_sql_shares_the_where_clause() {
        let f = cities_filter(&CityFilter::new(None, Some("tower")));
        let count = f.to_count_sql().unwrap();
        assert_eq!(
            count.query,
            "SELECT COUNT(*) AS count FROM \"cities\" WHERE (instr(\"name\", ?) > 0 OR instr(\"description\", ?) > 0)"
        );
        assert_eq!(count.params.len(), 2);

        let unfiltered = cities_filter(&CityFilter::default()).to_count_sql().unwrap();
        assert_eq!(unfiltered.query, "SELECT COUNT(*) AS count FROM \"cities\"");
    }

    #[test]
    fn apply_orders_then_pages() {
        let rows = vec![Row(1, "Paris", None), Row(2, "Antwerp", None), Row(3, "New York City", None)];
        let mut f = cities_filter(&CityFilter::default());

        f.limit(2, Some(0));
        let first: Vec<i64> = f.apply(&rows).iter().map(|r| r.0).collect();
        f.limit(2, Some(2));
        let second: Vec<i64> = f.apply(&rows).iter().map(|r| r.0).collect();

        assert_eq!(first, vec![2, 3]);
        assert_eq!(second, vec![1]);
        assert_eq!(f.count(&rows), 3);
    }

    #[test]
    fn rejects_invalid_table_names() {
        assert!(Filter::new("").is_err());
        assert!(Filter::new("1cities").is_err());
        assert!(Filter::new("cities\"; --").is_err());
    }
}
