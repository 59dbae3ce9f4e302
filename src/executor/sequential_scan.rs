use crate::{
    executor::{predicate::Predicate, scan::Scanner},
    storage::{catalog::Catalog, schema::TableName, table_store::TableStore},
    types::{TupleId, error::DatabaseError, row::Row},
};

/// Walks the data list of one table store, decoding each live row.
///
/// Rows can be filtered with a predicate and projected to a column subset.
/// The scanner borrows the store, so the store cannot be mutated while a scan
/// is open; collect the tuple ids first when rows are to be deleted or updated.
pub struct SequentialScanner<'a> {
    store: &'a TableStore,
    cursor: Option<TupleId>,
    batch_size: usize,
    predicate: Option<Predicate>,
    projection: Option<Vec<usize>>,
    is_exhausted: bool,
}

impl<'a> SequentialScanner<'a> {
    pub fn new(
        catalog: &'a Catalog,
        table_name: &TableName,
        batch_size: Option<usize>,
    ) -> Result<Self, DatabaseError> {
        let store = catalog.table(table_name)?;
        Ok(Self::over(store, batch_size))
    }

    pub fn over(store: &'a TableStore, batch_size: Option<usize>) -> Self {
        Self {
            store,
            cursor: None,
            batch_size: batch_size.unwrap_or(32),
            predicate: None,
            projection: None,
            is_exhausted: false,
        }
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Restricts output rows to the named columns, in the given order.
    pub fn with_projection(mut self, columns: &[String]) -> Result<Self, DatabaseError> {
        let schema = self.store.schema();
        let indexes = columns
            .iter()
            .map(|name| schema.require_column_index(name))
            .collect::<Result<Vec<usize>, DatabaseError>>()?;
        self.projection = Some(indexes);
        Ok(self)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Advances to the next live tuple that satisfies the predicate.
    pub fn next_tuple(&mut self) -> Result<Option<(TupleId, Row)>, DatabaseError> {
        if self.is_exhausted {
            return Ok(None);
        }
        loop {
            let Some(tuple) = self.store.sequential_scan(self.cursor)? else {
                self.is_exhausted = true;
                return Ok(None);
            };
            self.cursor = Some(tuple);

            let row = self.store.decode(tuple)?;
            if let Some(predicate) = &self.predicate {
                if !predicate.evaluate(&row, self.store.schema())? {
                    continue;
                }
            }
            return Ok(Some((tuple, row)));
        }
    }

    /// Ids of every remaining matching tuple.
    pub fn collect_tuples(&mut self) -> Result<Vec<TupleId>, DatabaseError> {
        let mut tuples = Vec::new();
        while let Some((tuple, _)) = self.next_tuple()? {
            tuples.push(tuple);
        }
        Ok(tuples)
    }
}

impl Scanner for SequentialScanner<'_> {
    fn scan(&mut self) -> Result<Option<Row>, DatabaseError> {
        match self.next_tuple()? {
            Some((_, row)) => match &self.projection {
                Some(indexes) => Ok(Some(row.project(indexes)?)),
                None => Ok(Some(row)),
            },
            None => Ok(None),
        }
    }

    fn scan_batch(&mut self, batch_size: usize) -> Result<Vec<Row>, DatabaseError> {
        let mut rows = Vec::with_capacity(batch_size);
        for _ in 0..batch_size {
            match self.scan()? {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        Ok(rows)
    }

    fn reset(&mut self) -> Result<(), DatabaseError> {
        self.cursor = None;
        self.is_exhausted = false;
        Ok(())
    }
}
