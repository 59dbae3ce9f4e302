use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::types::{
    DEFAULT_SCHEMA,
    error::DatabaseError,
    value::DataType,
};

/// Fully qualified table name: `schema.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableName {
    pub schema: String,
    pub name: String,
}

impl TableName {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// A table in the default schema.
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self::new(DEFAULT_SCHEMA, name)
    }

    /// Parses `table` or `schema.table`, stripping identifier quotes.
    pub fn parse(qualified: &str) -> Self {
        let unquote = |part: &str| part.trim().trim_matches(|c| c == '"' || c == '`').to_string();
        match qualified.split_once('.') {
            Some((schema, name)) => Self::new(unquote(schema), unquote(name)),
            None => Self::unqualified(unquote(qualified)),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Represents a column definition in a table schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: DataType,
    pub position: usize,
    pub nullable: bool,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, data_type: DataType, position: usize) -> Self {
        Self {
            name: name.into(),
            data_type,
            position,
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Represents a complete table schema with all column definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: TableName,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn new(name: TableName, columns: Vec<ColumnSchema>) -> Self {
        Self { name, columns }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Resolves a column name to its index or reports it as missing.
    pub fn require_column_index(&self, name: &str) -> Result<usize, DatabaseError> {
        self.column_index(name)
            .ok_or_else(|| DatabaseError::ColumnNotFound {
                name: name.to_string(),
                table: self.name.to_string(),
            })
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Validate column definitions
    pub fn validate(&self) -> Result<(), DatabaseError> {
        if self.columns.is_empty() {
            return Err(DatabaseError::InvalidData {
                details: "Table must have at least one column".to_string(),
            });
        }

        let mut column_names = HashSet::new();
        for column in &self.columns {
            if !column_names.insert(column.name.to_lowercase()) {
                return Err(DatabaseError::InvalidData {
                    details: format!("Duplicate column name: {}", column.name),
                });
            }
            if column.data_type.encoded_width() == 0 {
                return Err(DatabaseError::InvalidData {
                    details: format!("Column '{}' has zero width", column.name),
                });
            }
        }

        // Positions must be 0, 1, 2, ... in declaration order
        for (i, column) in self.columns.iter().enumerate() {
            if column.position != i {
                return Err(DatabaseError::InvalidData {
                    details: format!(
                        "Column positions must be sequential starting from 0, found {} at index {}",
                        column.position, i
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Builder for creating table schemas
pub struct TableSchemaBuilder {
    name: TableName,
    columns: Vec<ColumnSchema>,
}

impl TableSchemaBuilder {
    pub fn new(name: TableName) -> Self {
        Self {
            name,
            columns: Vec::new(),
        }
    }

    pub fn add_column(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        let position = self.columns.len();
        self.columns.push(ColumnSchema::new(name, data_type, position));
        self
    }

    pub fn add_not_null_column(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        let position = self.columns.len();
        self.columns
            .push(ColumnSchema::new(name, data_type, position).not_null());
        self
    }

    pub fn build(self) -> Result<TableSchema, DatabaseError> {
        let schema = TableSchema::new(self.name, self.columns);
        schema.validate()?;
        Ok(schema)
    }
}
