use std::cmp::Ordering;

use crate::{
    storage::schema::TableSchema,
    types::{error::DatabaseError, row::Row, value::Value},
};

/// Comparison operators for predicates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    IsNull,
    IsNotNull,
}

/// Logical operators for combining predicates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

/// A predicate expression for filtering rows
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Column comparison: column_name op value
    Comparison {
        column_name: String,
        op: ComparisonOp,
        value: Value,
    },
    /// Column membership in a list of literals (IN / NOT IN)
    InList {
        column_name: String,
        values: Vec<Value>,
        negated: bool,
    },
    /// Logical combination of predicates
    Logical {
        op: LogicalOp,
        left: Box<Predicate>,
        right: Option<Box<Predicate>>, // None for NOT operator
    },
    /// Always true predicate
    True,
    /// Always false predicate
    False,
}

impl Predicate {
    pub fn eq(column_name: impl Into<String>, value: Value) -> Self {
        Self::compare(column_name, ComparisonOp::Equal, value)
    }

    pub fn ne(column_name: impl Into<String>, value: Value) -> Self {
        Self::compare(column_name, ComparisonOp::NotEqual, value)
    }

    pub fn lt(column_name: impl Into<String>, value: Value) -> Self {
        Self::compare(column_name, ComparisonOp::LessThan, value)
    }

    pub fn le(column_name: impl Into<String>, value: Value) -> Self {
        Self::compare(column_name, ComparisonOp::LessThanOrEqual, value)
    }

    pub fn gt(column_name: impl Into<String>, value: Value) -> Self {
        Self::compare(column_name, ComparisonOp::GreaterThan, value)
    }

    pub fn ge(column_name: impl Into<String>, value: Value) -> Self {
        Self::compare(column_name, ComparisonOp::GreaterThanOrEqual, value)
    }

    pub fn is_null(column_name: impl Into<String>) -> Self {
        Self::compare(column_name, ComparisonOp::IsNull, Value::Null)
    }

    pub fn is_not_null(column_name: impl Into<String>) -> Self {
        Self::compare(column_name, ComparisonOp::IsNotNull, Value::Null)
    }

    pub fn in_list(column_name: impl Into<String>, values: Vec<Value>, negated: bool) -> Self {
        Self::InList {
            column_name: column_name.into(),
            values,
            negated,
        }
    }

    pub fn compare(column_name: impl Into<String>, op: ComparisonOp, value: Value) -> Self {
        Self::Comparison {
            column_name: column_name.into(),
            op,
            value,
        }
    }

    pub fn and(left: Predicate, right: Predicate) -> Self {
        Self::Logical {
            op: LogicalOp::And,
            left: Box::new(left),
            right: Some(Box::new(right)),
        }
    }

    pub fn or(left: Predicate, right: Predicate) -> Self {
        Self::Logical {
            op: LogicalOp::Or,
            left: Box::new(left),
            right: Some(Box::new(right)),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(predicate: Predicate) -> Self {
        Self::Logical {
            op: LogicalOp::Not,
            left: Box::new(predicate),
            right: None,
        }
    }

    /// Evaluates the predicate against a decoded row of `schema`.
    ///
    /// Comparisons involving NULL are false, except IS [NOT] NULL.
    pub fn evaluate(&self, row: &Row, schema: &TableSchema) -> Result<bool, DatabaseError> {
        match self {
            Predicate::True => Ok(true),
            Predicate::False => Ok(false),
            Predicate::Comparison {
                column_name,
                op,
                value,
            } => {
                let actual = column_value(row, schema, column_name)?;
                Ok(compare(actual, *op, value))
            }
            Predicate::InList {
                column_name,
                values,
                negated,
            } => {
                let actual = column_value(row, schema, column_name)?;
                if actual.is_null() {
                    return Ok(false);
                }
                let found = values
                    .iter()
                    .any(|candidate| compare(actual, ComparisonOp::Equal, candidate));
                Ok(found != *negated)
            }
            Predicate::Logical { op, left, right } => match op {
                LogicalOp::Not => Ok(!left.evaluate(row, schema)?),
                LogicalOp::And | LogicalOp::Or => {
                    let right = right.as_ref().ok_or_else(|| DatabaseError::ExecutionError {
                        details: format!("{:?} predicate is missing its right operand", op),
                    })?;
                    let left_result = left.evaluate(row, schema)?;
                    match op {
                        LogicalOp::And if !left_result => Ok(false),
                        LogicalOp::Or if left_result => Ok(true),
                        _ => right.evaluate(row, schema),
                    }
                }
            },
        }
    }
}

fn column_value<'a>(row: &'a Row, schema: &TableSchema, column_name: &str) -> Result<&'a Value, DatabaseError> {
    let index = schema.require_column_index(column_name)?;
    row.get_value(index)
        .ok_or(DatabaseError::ColumnIndexOutOfBounds { index })
}

fn compare(actual: &Value, op: ComparisonOp, expected: &Value) -> bool {
    match op {
        ComparisonOp::IsNull => actual.is_null(),
        ComparisonOp::IsNotNull => !actual.is_null(),
        _ if actual.is_null() || expected.is_null() => false,
        _ => {
            let Some(ordering) = actual.partial_cmp(expected) else {
                return false;
            };
            match op {
                ComparisonOp::Equal => ordering == Ordering::Equal,
                ComparisonOp::NotEqual => ordering != Ordering::Equal,
                ComparisonOp::LessThan => ordering == Ordering::Less,
                ComparisonOp::LessThanOrEqual => ordering != Ordering::Greater,
                ComparisonOp::GreaterThan => ordering == Ordering::Greater,
                ComparisonOp::GreaterThanOrEqual => ordering != Ordering::Less,
                ComparisonOp::IsNull | ComparisonOp::IsNotNull => false,
            }
        }
    }
}
