use std::sync::Arc;

use crate::{
    config::StoreConfig,
    storage::{
        catalog::Catalog,
        schema::{TableName, TableSchema, TableSchemaBuilder},
        table_store::TableStore,
    },
    types::{
        TupleId,
        error::DatabaseError,
        value::{DataType, Value},
    },
};

/// `main.users (id INT NOT NULL, name VARCHAR(8))`
pub fn users_schema() -> TableSchema {
    TableSchemaBuilder::new(TableName::unqualified("users"))
        .add_not_null_column("id", DataType::Int)
        .add_column("name", DataType::Varchar(8))
        .build()
        .expect("users schema is valid")
}

/// One column of every supported type.
pub fn all_types_schema() -> TableSchema {
    TableSchemaBuilder::new(TableName::unqualified("all_types"))
        .add_column("i", DataType::Int)
        .add_column("l", DataType::Long)
        .add_column("f", DataType::Float)
        .add_column("d", DataType::Double)
        .add_column("c", DataType::Char(4))
        .add_column("v", DataType::Varchar(16))
        .build()
        .expect("all_types schema is valid")
}

pub fn user_row(id: i64, name: &str) -> Vec<Value> {
    vec![Value::Integer(id), Value::Text(name.to_string())]
}

/// Store over [`users_schema`] with rows `(1, "user1") ..= (count, "user{count}")`.
pub fn populated_store(
    count: usize,
    config: &StoreConfig,
) -> Result<(TableStore, Vec<TupleId>), DatabaseError> {
    let mut store = TableStore::new(Arc::new(users_schema()), config)?;
    let mut tuples = Vec::with_capacity(count);
    for i in 1..=count {
        tuples.push(store.insert(&user_row(i as i64, &format!("user{}", i)), None)?);
    }
    Ok((store, tuples))
}

/// Catalog holding an empty `main.users` table.
pub fn users_catalog(config: StoreConfig) -> Result<Catalog, DatabaseError> {
    let mut catalog = Catalog::with_config(config)?;
    catalog.create_table(users_schema(), false)?;
    Ok(catalog)
}
