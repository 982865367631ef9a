use super::criteria::FilterCriteria;
use super::error::FilterError;
use super::types::{Attribute, SqlResult};

/// Builds the WHERE clause for a company listing.
///
/// Only whitelisted column names ever reach the SQL text; every value is
/// carried as a positional parameter.
pub struct FilterWhere {
    param_values: Vec<String>,
    param_index: usize,
    conditions: Vec<String>,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
            conditions: vec![],
        }
    }

    /// Append `WHERE <predicate>` to `base_query` for the given criteria.
    pub fn generate(base_query: &str, criteria: &FilterCriteria) -> Result<SqlResult, FilterError> {
        let mut filter_where = Self::new(0);
        let where_clause = filter_where.build(criteria)?;
        Ok(SqlResult {
            query: format!("{} WHERE {}", base_query, where_clause),
            params: filter_where.param_values,
        })
    }

    fn build(&mut self, criteria: &FilterCriteria) -> Result<String, FilterError> {
        for (key, value) in criteria.iter() {
            let attribute = Attribute::parse(key)
                .ok_or_else(|| FilterError::UnknownAttribute(key.to_string()))?;
            let placeholder = self.param(value.to_string());
            self.conditions
                .push(format!("\"{}\" = {}", attribute.column(), placeholder));
        }

        if self.conditions.is_empty() {
            Ok("1=1".to_string())
        } else {
            Ok(self.conditions.join(" AND "))
        }
    }

    fn param(&mut self, value: String) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
