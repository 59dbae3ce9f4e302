use crate::{
    executor::{predicate::Predicate, sequential_scan::SequentialScanner},
    storage::table_store::TableStore,
    transaction::Transaction,
    types::error::DatabaseError,
};

/// Deletes the rows of one table that match a predicate.
pub struct TableDeleter<'a> {
    store: &'a mut TableStore,
    transaction: &'a mut Transaction,
}

impl<'a> TableDeleter<'a> {
    pub fn new(store: &'a mut TableStore, transaction: &'a mut Transaction) -> Self {
        Self { store, transaction }
    }

    /// Deletes every matching row and returns how many were removed.
    ///
    /// Targets are collected by a full scan first, then deleted one by one.
    pub fn execute(&mut self, predicate: Option<Predicate>) -> Result<usize, DatabaseError> {
        let targets = {
            let mut scanner = SequentialScanner::over(self.store, None);
            if let Some(predicate) = predicate {
                scanner = scanner.with_predicate(predicate);
            }
            scanner.collect_tuples()?
        };

        for tuple in &targets {
            self.store.delete(*tuple, self.transaction.sink())?;
        }
        Ok(targets.len())
    }
}
