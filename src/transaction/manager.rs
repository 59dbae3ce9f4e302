use tracing::{debug, info, warn};

use crate::{
    storage::catalog::Catalog,
    transaction::undo::{UndoKind, UndoLog, UndoRecord, UndoSink},
    types::{
        TransactionId,
        error::{DatabaseError, Result},
    },
};

#[derive(Debug)]
struct ActiveTransaction {
    id: TransactionId,
    log: UndoLog,
}

/// Explicit transaction manager.
///
/// While a transaction is active, [`Transaction::sink`] hands out the undo
/// log that table stores record into. Rollback replays the log newest first
/// against the catalog. Schema changes (create/drop table) are not undone.
#[derive(Debug)]
pub struct Transaction {
    next_id: TransactionId,
    active: Option<ActiveTransaction>,
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Id of the active transaction, if any.
    pub fn id(&self) -> Option<TransactionId> {
        self.active.as_ref().map(|active| active.id)
    }

    pub fn undo_len(&self) -> usize {
        self.active.as_ref().map_or(0, |active| active.log.len())
    }

    pub fn begin(&mut self) -> Result<TransactionId> {
        if let Some(active) = &self.active {
            return Err(DatabaseError::TransactionAlreadyActive { id: active.id });
        }

        let id = self.next_id;
        self.next_id += 1;
        self.active = Some(ActiveTransaction {
            id,
            log: UndoLog::new(),
        });
        info!(txn = id, "transaction started");
        Ok(id)
    }

    pub fn commit(&mut self) -> Result<TransactionId> {
        let active = self.active.take().ok_or(DatabaseError::NoActiveTransaction)?;
        info!(txn = active.id, undo_records = active.log.len(), "transaction committed");
        Ok(active.id)
    }

    /// Reverts every recorded mutation and ends the transaction.
    ///
    /// Returns the number of records replayed. The transaction is over even
    /// when replay fails.
    pub fn rollback(&mut self, catalog: &mut Catalog) -> Result<usize> {
        let active = self.active.take().ok_or(DatabaseError::NoActiveTransaction)?;
        let replayed = replay(active.log.into_records(), catalog)?;
        info!(txn = active.id, replayed, "transaction rolled back");
        Ok(replayed)
    }

    /// The undo sink of the active transaction. `None` outside a transaction.
    pub fn sink(&mut self) -> Option<&mut dyn UndoSink> {
        self.active
            .as_mut()
            .map(|active| &mut active.log as &mut dyn UndoSink)
    }
}

/// Applies undo records newest first.
pub fn replay(records: Vec<UndoRecord>, catalog: &mut Catalog) -> Result<usize> {
    let mut replayed = 0;
    for record in records.into_iter().rev() {
        let store = match catalog.table_mut(&record.table) {
            Ok(store) => store,
            Err(DatabaseError::TableNotFound { .. }) => {
                warn!(table = %record.table, tuple = %record.tuple, "skipping undo record of dropped table");
                continue;
            }
            Err(e) => return Err(e),
        };
        if store.store_id() != record.tuple.store_id {
            warn!(table = %record.table, tuple = %record.tuple, "skipping undo record of recreated table");
            continue;
        }

        match record.kind {
            UndoKind::Insert => store.remove_tuple(record.tuple)?,
            UndoKind::Delete { pre_image } => store.restore_tuple(record.tuple, &pre_image)?,
            UndoKind::Update { pre_image } => store.overwrite_tuple(record.tuple, &pre_image)?,
        }
        debug!(table = %record.table, tuple = %record.tuple, "undo record replayed");
        replayed += 1;
    }
    Ok(replayed)
}
