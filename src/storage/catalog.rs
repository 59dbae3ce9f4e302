use std::{collections::HashMap, sync::Arc};

use tracing::info;

use crate::{
    config::StoreConfig,
    storage::{
        schema::{ColumnSchema, TableName, TableSchema},
        table_store::TableStore,
    },
    types::error::{DatabaseError, Result},
};

/// Maps qualified table names to their stores.
///
/// Passed explicitly to whatever needs schema lookup; there is no global
/// instance. Dropping a table drops its store and every tuple group it owns.
pub struct Catalog {
    config: StoreConfig,
    tables: HashMap<TableName, TableStore>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
            tables: HashMap::new(),
        }
    }

    pub fn with_config(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tables: HashMap::new(),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Registers a table and creates its store.
    ///
    /// Returns `false` when the table exists and `if_not_exists` is set.
    pub fn create_table(&mut self, schema: TableSchema, if_not_exists: bool) -> Result<bool> {
        if self.tables.contains_key(&schema.name) {
            if if_not_exists {
                return Ok(false);
            }
            return Err(DatabaseError::TableAlreadyExists {
                name: schema.name.to_string(),
            });
        }

        schema.validate()?;
        let name = schema.name.clone();
        let store = TableStore::new(Arc::new(schema), &self.config)?;
        info!(table = %name, tuple_size = store.layout().tuple_size(), "table created");
        self.tables.insert(name, store);
        Ok(true)
    }

    /// Removes a table and frees its storage.
    ///
    /// Returns `false` when the table is missing and `if_exists` is set.
    pub fn drop_table(&mut self, name: &TableName, if_exists: bool) -> Result<bool> {
        match self.tables.remove(name) {
            Some(store) => {
                info!(table = %name, rows = store.len(), groups = store.group_count(), "table dropped");
                Ok(true)
            }
            None if if_exists => Ok(false),
            None => Err(DatabaseError::TableNotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Drops every table of `schema`, returning how many were removed.
    pub fn drop_schema(&mut self, schema: &str) -> usize {
        let before = self.tables.len();
        self.tables.retain(|name, _| name.schema != schema);
        let dropped = before - self.tables.len();
        info!(schema, dropped, "schema dropped");
        dropped
    }

    pub fn find_schema(&self, schema: &str) -> bool {
        self.tables.keys().any(|name| name.schema == schema)
    }

    pub fn table_exists(&self, name: &TableName) -> bool {
        self.tables.contains_key(name)
    }

    pub fn table(&self, name: &TableName) -> Result<&TableStore> {
        self.tables
            .get(name)
            .ok_or_else(|| DatabaseError::TableNotFound {
                name: name.to_string(),
            })
    }

    pub fn table_mut(&mut self, name: &TableName) -> Result<&mut TableStore> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| DatabaseError::TableNotFound {
                name: name.to_string(),
            })
    }

    pub fn column(&self, table: &TableName, column: &str) -> Result<&ColumnSchema> {
        let schema = self.table(table)?.schema();
        schema
            .column(column)
            .ok_or_else(|| DatabaseError::ColumnNotFound {
                name: column.to_string(),
                table: table.to_string(),
            })
    }

    /// All table names, sorted.
    pub fn table_names(&self) -> Vec<TableName> {
        let mut names: Vec<TableName> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
