use crate::{
    executor::{predicate::Predicate, sequential_scan::SequentialScanner},
    storage::table_store::TableStore,
    transaction::Transaction,
    types::{error::DatabaseError, value::Value},
};

/// Applies `SET column = value` assignments to the rows matching a predicate.
pub struct TableUpdater<'a> {
    store: &'a mut TableStore,
    transaction: &'a mut Transaction,
}

impl<'a> TableUpdater<'a> {
    pub fn new(store: &'a mut TableStore, transaction: &'a mut Transaction) -> Self {
        Self { store, transaction }
    }

    /// Updates every matching row and returns how many were changed.
    ///
    /// Column names and values are checked against the schema before the
    /// first row is touched, so a bad assignment changes nothing.
    pub fn execute(
        &mut self,
        assignments: &[(String, Value)],
        predicate: Option<Predicate>,
    ) -> Result<usize, DatabaseError> {
        let schema = self.store.schema().clone();
        let mut column_indexes = Vec::with_capacity(assignments.len());
        let mut values = Vec::with_capacity(assignments.len());
        for (column, value) in assignments {
            let index = schema.require_column_index(column)?;
            self.store.layout().encode_column(index, value)?;
            column_indexes.push(index);
            values.push(value.clone());
        }

        let targets = {
            let mut scanner = SequentialScanner::over(self.store, None);
            if let Some(predicate) = predicate {
                scanner = scanner.with_predicate(predicate);
            }
            scanner.collect_tuples()?
        };

        for tuple in &targets {
            self.store
                .update(*tuple, &column_indexes, &values, self.transaction.sink())?;
        }
        Ok(targets.len())
    }
}
