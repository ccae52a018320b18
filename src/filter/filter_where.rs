use serde_json::Value;

use super::error::FilterError;
use super::types::{FilterCondition, FilterRecord};

pub struct FilterWhere {
    param_values: Vec<Value>,
}

impl FilterWhere {
    fn new() -> Self {
        Self { param_values: vec![] }
    }

    /// Render a condition to an SQLite expression with positional `?` parameters.
    /// Parameters are returned in the order their placeholders appear.
    pub fn generate(condition: &FilterCondition) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new();
        let sql = filter_where.build_sql_condition(condition)?;
        Ok((sql, filter_where.param_values))
    }

    pub fn validate(condition: &FilterCondition) -> Result<(), FilterError> {
        match condition {
            FilterCondition::Eq { column, .. } | FilterCondition::Contains { column, .. } => {
                super::filter::Filter::validate_column(column)
            }
            FilterCondition::And(parts) | FilterCondition::Or(parts) => {
                if parts.is_empty() {
                    return Err(FilterError::InvalidWhereClause("Logical operator requires at least one condition".to_string()));
                }
                parts.iter().try_for_each(Self::validate)
            }
        }
    }

    /// Evaluate a condition against a record held in memory
    pub fn matches(condition: &FilterCondition, record: &impl FilterRecord) -> bool {
        match condition {
            FilterCondition::Eq { column, value } => record.field(column).as_ref() == Some(value),
            FilterCondition::Contains { column, value } => match record.field(column) {
                Some(Value::String(s)) => s.contains(value.as_str()),
                _ => false,
            },
            FilterCondition::And(parts) => parts.iter().all(|c| Self::matches(c, record)),
            FilterCondition::Or(parts) => parts.iter().any(|c| Self::matches(c, record)),
        }
    }

    fn build_sql_condition(&mut self, condition: &FilterCondition) -> Result<String, FilterError> {
        match condition {
            FilterCondition::Eq { column, value } => {
                if value.is_null() {
                    return Ok(format!("\"{}\" IS NULL", column));
                }
                self.param_values.push(value.clone());
                Ok(format!("\"{}\" = ?", column))
            }
            FilterCondition::Contains { column, value } => {
                // instr() is case-sensitive where LIKE is not
                self.param_values.push(Value::String(value.clone()));
                Ok(format!("instr(\"{}\", ?) > 0", column))
            }
            FilterCondition::And(parts) => self.build_logical(parts, " AND "),
            FilterCondition::Or(parts) => self.build_logical(parts, " OR "),
        }
    }

    fn build_logical(&mut self, parts: &[FilterCondition], joiner: &str) -> Result<String, FilterError> {
        let mut sql_parts = Vec::with_capacity(parts.len());
        for part in parts {
            sql_parts.push(self.build_sql_condition(part)?);
        }
        Ok(format!("({})", sql_parts.join(joiner)))
    }
}
