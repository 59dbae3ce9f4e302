use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tracing::debug;

use crate::{
    config::StoreConfig,
    storage::{
        layout::{EncodedCell, RowLayout, TupleHeader},
        schema::{TableName, TableSchema},
        tuple_group::TupleGroups,
        tuple_list::{ListKind, LinkTable, TupleList},
    },
    transaction::UndoSink,
    types::{
        StoreId, TupleId,
        error::{DatabaseError, Result},
        row::Row,
        value::Value,
    },
};

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Fixed-layout row storage for one table.
///
/// Rows live in bulk-allocated tuple groups. Every slot is in exactly one of
/// two lists: the free list (unused slots) or the data list (live rows). New
/// rows are spliced at the head of the data list, so a sequential scan yields
/// rows newest first.
///
/// Mutations take an optional [`UndoSink`]; passing one means a transaction
/// is active and the mutation must be reversible.
pub struct TableStore {
    store_id: StoreId,
    layout: RowLayout,
    groups: TupleGroups,
    free_list: TupleList,
    data_list: TupleList,
}

impl TableStore {
    pub fn new(schema: Arc<TableSchema>, config: &StoreConfig) -> Result<Self> {
        let layout = RowLayout::new(schema);
        let groups = TupleGroups::new(layout.tuple_size(), config)?;
        Ok(Self {
            store_id: StoreId(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed)),
            layout,
            groups,
            free_list: TupleList::new(ListKind::Free),
            data_list: TupleList::new(ListKind::Data),
        })
    }

    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    pub fn schema(&self) -> &Arc<TableSchema> {
        self.layout.schema()
    }

    pub fn name(&self) -> &TableName {
        &self.layout.schema().name
    }

    pub fn layout(&self) -> &RowLayout {
        &self.layout
    }

    /// Number of live rows.
    pub fn len(&self) -> usize {
        self.data_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_list.is_empty()
    }

    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.group_count()
    }

    pub fn capacity(&self) -> usize {
        self.groups.capacity()
    }

    /// Whether `tuple` names a live row of this store.
    pub fn contains(&self, tuple: TupleId) -> bool {
        tuple.store_id == self.store_id && self.data_list.contains(&self.groups, tuple.index)
    }

    /// Which list the slot behind `tuple` is currently in.
    pub fn list_of(&self, tuple: TupleId) -> Option<ListKind> {
        if tuple.store_id != self.store_id {
            return None;
        }
        self.groups.link(tuple.index).and_then(|link| link.owner)
    }

    /// Inserts a row and returns its handle.
    ///
    /// Values are encoded before anything is touched; an encoding error or a
    /// failed group allocation leaves the store unchanged.
    pub fn insert(&mut self, values: &[Value], undo: Option<&mut dyn UndoSink>) -> Result<TupleId> {
        let cells = self.layout.encode_row(values)?;

        if self.free_list.is_empty() {
            let group = self.groups.allocate_group(&mut self.free_list)?;
            debug!(table = %self.name(), group, "table store grew");
        }

        let slot = self
            .free_list
            .pop_head(&mut self.groups)?
            .ok_or_else(|| DatabaseError::ListCorrupted {
                details: "free list empty after group allocation".to_string(),
            })?;
        self.data_list.add_head(&mut self.groups, slot)?;

        let tuple = slot_bytes_mut(&mut self.groups, slot)?;
        self.layout.write_header(tuple, TupleHeader::live());
        for (index, cell) in cells.iter().enumerate() {
            self.layout.write_cell(tuple, index, cell);
        }

        let id = TupleId::new(self.store_id, slot);
        if let Some(sink) = undo {
            sink.record_insert(&self.layout.schema().name, id);
        }
        Ok(id)
    }

    /// Deletes a live row, returning its slot to the free list.
    ///
    /// The slot is scrubbed: header, null bitmap and data are zeroed.
    pub fn delete(&mut self, tuple: TupleId, undo: Option<&mut dyn UndoSink>) -> Result<()> {
        let slot = self.live_slot(tuple)?;

        if let Some(sink) = undo {
            let image = self.image(slot)?;
            sink.record_delete(&self.layout.schema().name, tuple, image);
        }

        self.release(slot)
    }

    /// Rewrites the given columns of a live row.
    ///
    /// `column_indexes` and `values` are parallel. Every value is encoded
    /// before the first column is written, and the pre-image is recorded
    /// before that, so a multi-column update is applied or reverted as a whole.
    pub fn update(
        &mut self,
        tuple: TupleId,
        column_indexes: &[usize],
        values: &[Value],
        undo: Option<&mut dyn UndoSink>,
    ) -> Result<()> {
        if column_indexes.len() != values.len() {
            return Err(DatabaseError::ColumnCountMismatch {
                expected: column_indexes.len(),
                actual: values.len(),
            });
        }
        let slot = self.live_slot(tuple)?;

        let cells = column_indexes
            .iter()
            .zip(values)
            .map(|(&index, value)| {
                self.layout
                    .encode_column(index, value)
                    .map(|cell| (index, cell))
            })
            .collect::<Result<Vec<(usize, EncodedCell)>>>()?;

        if let Some(sink) = undo {
            let image = self.image(slot)?;
            sink.record_update(&self.layout.schema().name, tuple, image);
        }

        let bytes = slot_bytes_mut(&mut self.groups, slot)?;
        for (index, cell) in &cells {
            self.layout.write_cell(bytes, *index, cell);
        }
        Ok(())
    }

    /// Cursor-style scan over live rows.
    ///
    /// `None` yields the first row; a live tuple yields the row after it.
    /// Returns `None` at the end of the data list.
    pub fn sequential_scan(&self, cursor: Option<TupleId>) -> Result<Option<TupleId>> {
        let next = match cursor {
            None => self.data_list.first(),
            Some(tuple) => {
                let slot = self.live_slot(tuple)?;
                self.data_list.next_of(&self.groups, slot)?
            }
        };
        Ok(next.map(|slot| TupleId::new(self.store_id, slot)))
    }

    /// Decodes a live row into its column values.
    pub fn decode(&self, tuple: TupleId) -> Result<Row> {
        let slot = self.live_slot(tuple)?;
        let bytes = slot_bytes(&self.groups, slot)?;
        let values = self.layout.decode_row(bytes)?;
        Ok(Row::with_tuple_id(tuple, values))
    }

    /// Handles of all live rows in scan order.
    pub fn scan(&self) -> impl Iterator<Item = TupleId> + '_ {
        let store_id = self.store_id;
        self.data_list
            .iter(&self.groups)
            .map(move |slot| TupleId::new(store_id, slot))
    }

    /// All live rows, decoded, in scan order.
    pub fn rows(&self) -> impl Iterator<Item = Result<Row>> + '_ {
        self.scan().map(move |tuple| self.decode(tuple))
    }

    /// Undoes an insert: the row goes back to the free list.
    pub fn remove_tuple(&mut self, tuple: TupleId) -> Result<()> {
        let slot = self.live_slot(tuple)?;
        self.release(slot)
    }

    /// Undoes a delete: takes the slot back from the free list, restores the
    /// saved image and relinks it as a live row.
    pub fn restore_tuple(&mut self, tuple: TupleId, image: &[u8]) -> Result<()> {
        self.layout.check_image(image)?;
        if tuple.store_id != self.store_id || !self.free_list.contains(&self.groups, tuple.index) {
            return Err(self.invalid_tuple(tuple));
        }

        let slot = tuple.index;
        self.free_list.delete(&mut self.groups, slot)?;
        self.data_list.add_head(&mut self.groups, slot)?;
        slot_bytes_mut(&mut self.groups, slot)?.copy_from_slice(image);
        Ok(())
    }

    /// Undoes an update: copies the saved image over the live row.
    pub fn overwrite_tuple(&mut self, tuple: TupleId, image: &[u8]) -> Result<()> {
        self.layout.check_image(image)?;
        let slot = self.live_slot(tuple)?;
        slot_bytes_mut(&mut self.groups, slot)?.copy_from_slice(image);
        Ok(())
    }

    fn release(&mut self, slot: usize) -> Result<()> {
        self.data_list.delete(&mut self.groups, slot)?;
        self.free_list.add_head(&mut self.groups, slot)?;
        self.layout.scrub(slot_bytes_mut(&mut self.groups, slot)?);
        Ok(())
    }

    fn image(&self, slot: usize) -> Result<Vec<u8>> {
        Ok(slot_bytes(&self.groups, slot)?.to_vec())
    }

    fn live_slot(&self, tuple: TupleId) -> Result<usize> {
        if !self.contains(tuple) {
            return Err(self.invalid_tuple(tuple));
        }
        Ok(tuple.index)
    }

    fn invalid_tuple(&self, tuple: TupleId) -> DatabaseError {
        DatabaseError::InvalidTuple {
            table: self.name().to_string(),
            tuple,
        }
    }
}

fn slot_bytes(groups: &TupleGroups, slot: usize) -> Result<&[u8]> {
    groups.tuple(slot).ok_or_else(|| DatabaseError::ListCorrupted {
        details: format!("slot {} has no backing memory", slot),
    })
}

fn slot_bytes_mut(groups: &mut TupleGroups, slot: usize) -> Result<&mut [u8]> {
    groups.tuple_mut(slot).ok_or_else(|| DatabaseError::ListCorrupted {
        details: format!("slot {} has no backing memory", slot),
    })
}
