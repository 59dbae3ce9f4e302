use crate::{storage::schema::TableName, types::TupleId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoKind {
    /// Reversed by removing the tuple again.
    Insert,
    /// Reversed by taking the slot back from the free list and restoring the image.
    Delete { pre_image: Vec<u8> },
    /// Reversed by copying the image back over the live tuple.
    Update { pre_image: Vec<u8> },
}

/// One reversible mutation of a table store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoRecord {
    pub table: TableName,
    pub tuple: TupleId,
    pub kind: UndoKind,
}

/// Receives undo notifications from a table store.
///
/// Stores call these before a destructive mutation (delete, update) and after
/// an insert has placed its row, whenever a sink is supplied.
pub trait UndoSink {
    fn record_insert(&mut self, table: &TableName, tuple: TupleId);
    fn record_delete(&mut self, table: &TableName, tuple: TupleId, pre_image: Vec<u8>);
    fn record_update(&mut self, table: &TableName, tuple: TupleId, pre_image: Vec<u8>);
}

/// Append-only list of undo records, oldest first.
#[derive(Debug, Default)]
pub struct UndoLog {
    records: Vec<UndoRecord>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[UndoRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<UndoRecord> {
        self.records
    }

    fn push(&mut self, table: &TableName, tuple: TupleId, kind: UndoKind) {
        self.records.push(UndoRecord {
            table: table.clone(),
            tuple,
            kind,
        });
    }
}

impl UndoSink for UndoLog {
    fn record_insert(&mut self, table: &TableName, tuple: TupleId) {
        self.push(table, tuple, UndoKind::Insert);
    }

    fn record_delete(&mut self, table: &TableName, tuple: TupleId, pre_image: Vec<u8>) {
        self.push(table, tuple, UndoKind::Delete { pre_image });
    }

    fn record_update(&mut self, table: &TableName, tuple: TupleId, pre_image: Vec<u8>) {
        self.push(table, tuple, UndoKind::Update { pre_image });
    }
}
