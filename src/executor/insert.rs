use tracing::debug;

use crate::{
    storage::table_store::TableStore,
    transaction::{Transaction, UndoSink},
    types::{TupleId, error::DatabaseError, row::Row},
};

/// Trait for inserting data into database tables
pub trait Inserter {
    /// Insert a single row into the table
    fn insert(&mut self, row: Row) -> Result<TupleId, DatabaseError>;

    /// Insert multiple rows in a batch operation
    fn insert_batch(&mut self, rows: Vec<Row>) -> Result<Vec<TupleId>, DatabaseError>;

    /// Get the name of the table this inserter operates on
    fn table_name(&self) -> String;
}

/// Inserts rows into one table store, recording undo when a transaction is active.
pub struct TableInserter<'a> {
    store: &'a mut TableStore,
    transaction: &'a mut Transaction,
}

impl<'a> TableInserter<'a> {
    pub fn new(store: &'a mut TableStore, transaction: &'a mut Transaction) -> Self {
        Self { store, transaction }
    }
}

impl Inserter for TableInserter<'_> {
    fn insert(&mut self, row: Row) -> Result<TupleId, DatabaseError> {
        self.store.insert(&row.values, self.transaction.sink())
    }

    fn insert_batch(&mut self, rows: Vec<Row>) -> Result<Vec<TupleId>, DatabaseError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // Validate all rows before starting batch insertion
        for (index, row) in rows.iter().enumerate() {
            if let Err(e) = self.store.layout().encode_row(&row.values) {
                debug!(table = %self.store.name(), row = index, error = %e, "batch insert rejected");
                return Err(e);
            }
        }

        // Undo is recorded only once the whole batch is placed
        let mut tuples = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match self.store.insert(&row.values, None) {
                Ok(tuple) => tuples.push(tuple),
                Err(e) => {
                    debug!(
                        table = %self.store.name(),
                        row = index,
                        error = %e,
                        "batch insert failed, removing placed rows"
                    );
                    for tuple in tuples.into_iter().rev() {
                        self.store.remove_tuple(tuple)?;
                    }
                    return Err(e);
                }
            }
        }

        if let Some(sink) = self.transaction.sink() {
            let table = self.store.name();
            for tuple in &tuples {
                sink.record_insert(table, *tuple);
            }
        }
        Ok(tuples)
    }

    fn table_name(&self) -> String {
        self.store.name().to_string()
    }
}
