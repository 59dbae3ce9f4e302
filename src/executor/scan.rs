use crate::types::{error::DatabaseError, row::Row};

pub trait Scanner {
    fn scan(&mut self) -> Result<Option<Row>, DatabaseError>;
    fn scan_batch(&mut self, batch_size: usize) -> Result<Vec<Row>, DatabaseError>;
    fn reset(&mut self) -> Result<(), DatabaseError>;
}

impl<S: Scanner + ?Sized> Scanner for &mut S {
    fn scan(&mut self) -> Result<Option<Row>, DatabaseError> {
        (**self).scan()
    }

    fn scan_batch(&mut self, batch_size: usize) -> Result<Vec<Row>, DatabaseError> {
        (**self).scan_batch(batch_size)
    }

    fn reset(&mut self) -> Result<(), DatabaseError> {
        (**self).reset()
    }
}

/// Adapts any [`Scanner`] into an iterator of rows.
pub struct ScanIterator<S: Scanner> {
    scanner: S,
    failed: bool,
}

impl<S: Scanner> ScanIterator<S> {
    pub fn new(scanner: S) -> Self {
        Self {
            scanner,
            failed: false,
        }
    }
}

impl<S: Scanner> Iterator for ScanIterator<S> {
    type Item = Result<Row, DatabaseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.scanner.scan() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => None,
            Err(e) => {
                // Stop after the first error instead of retrying the same cursor
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
