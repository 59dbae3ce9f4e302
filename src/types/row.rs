use serde::{Deserialize, Serialize};

use crate::types::{TupleId, error::DatabaseError, value::Value};

/// A decoded row: one value per column in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub tuple_id: Option<TupleId>,
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            tuple_id: None,
            values,
        }
    }

    pub fn with_tuple_id(tuple_id: TupleId, values: Vec<Value>) -> Self {
        Self {
            tuple_id: Some(tuple_id),
            values,
        }
    }

    pub fn get_value(&self, column_index: usize) -> Option<&Value> {
        self.values.get(column_index)
    }

    pub fn set_value(&mut self, column_index: usize, value: Value) -> Result<(), DatabaseError> {
        if column_index >= self.values.len() {
            return Err(DatabaseError::ColumnIndexOutOfBounds {
                index: column_index,
            });
        }
        self.values[column_index] = value;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keeps only the given columns, in the given order.
    pub fn project(&self, column_indexes: &[usize]) -> Result<Row, DatabaseError> {
        let mut values = Vec::with_capacity(column_indexes.len());
        for &index in column_indexes {
            let value = self
                .get_value(index)
                .ok_or(DatabaseError::ColumnIndexOutOfBounds { index })?;
            values.push(value.clone());
        }
        Ok(Row {
            tuple_id: self.tuple_id,
            values,
        })
    }
}
