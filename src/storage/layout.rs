//! Physical row layout and column encoding.
//!
//! Every tuple of a store has the same size, derived once from the schema:
//!
//! ```text
//! +----------+---------------+------------------+---------------------------+
//! | live (1) | owner txn (8) | null bitmap (n)  | column data (sum widths)  |
//! +----------+---------------+------------------+---------------------------+
//! ```
//!
//! All offset arithmetic on tuple bytes lives in this module. Integers and
//! floats use native byte order. Text is stored in exactly the declared width,
//! zero terminated when shorter and zero padded; longer text is rejected.

use std::{ops::Range, sync::Arc};

use crate::{
    storage::schema::{ColumnSchema, TableSchema},
    types::{
        INVALID_TRANSACTION_ID, TUPLE_HEADER_SIZE, TransactionId,
        error::{DatabaseError, Result},
        value::{DataType, Value},
    },
};

const LIVE_FLAG_OFFSET: usize = 0;
const OWNER_TXN_OFFSET: usize = 1;

/// Header fields at the start of every tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TupleHeader {
    pub live: bool,
    pub owner_txn: TransactionId,
}

impl TupleHeader {
    /// Header of a freshly inserted row.
    pub fn live() -> Self {
        Self {
            live: true,
            owner_txn: INVALID_TRANSACTION_ID,
        }
    }

    pub fn free() -> Self {
        Self {
            live: false,
            owner_txn: INVALID_TRANSACTION_ID,
        }
    }
}

/// A column value converted to its stored form, ready to be copied into a tuple.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedCell {
    Null,
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct RowLayout {
    schema: Arc<TableSchema>,
    column_offsets: Vec<usize>,
    tuple_size: usize,
}

impl RowLayout {
    pub fn new(schema: Arc<TableSchema>) -> Self {
        let mut column_offsets = Vec::with_capacity(schema.column_count() + 1);
        let mut data_size = 0;
        column_offsets.push(data_size);
        for column in &schema.columns {
            data_size += column.data_type.encoded_width();
            column_offsets.push(data_size);
        }

        let tuple_size = TUPLE_HEADER_SIZE + schema.column_count() + data_size;

        Self {
            schema,
            column_offsets,
            tuple_size,
        }
    }

    pub fn schema(&self) -> &Arc<TableSchema> {
        &self.schema
    }

    pub fn tuple_size(&self) -> usize {
        self.tuple_size
    }

    pub fn column_count(&self) -> usize {
        self.schema.column_count()
    }

    /// Size of the packed data region.
    pub fn data_size(&self) -> usize {
        self.column_offsets[self.column_count()]
    }

    /// Offset of a column inside the data region.
    pub fn column_offset(&self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        Ok(self.column_offsets[index])
    }

    pub fn column_width(&self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        Ok(self.column_offsets[index + 1] - self.column_offsets[index])
    }

    pub fn read_header(&self, tuple: &[u8]) -> TupleHeader {
        let mut owner = [0u8; 8];
        owner.copy_from_slice(&tuple[OWNER_TXN_OFFSET..OWNER_TXN_OFFSET + 8]);
        TupleHeader {
            live: tuple[LIVE_FLAG_OFFSET] != 0,
            owner_txn: TransactionId::from_ne_bytes(owner),
        }
    }

    pub fn write_header(&self, tuple: &mut [u8], header: TupleHeader) {
        tuple[LIVE_FLAG_OFFSET] = u8::from(header.live);
        tuple[OWNER_TXN_OFFSET..OWNER_TXN_OFFSET + 8]
            .copy_from_slice(&header.owner_txn.to_ne_bytes());
    }

    pub fn is_null(&self, tuple: &[u8], index: usize) -> bool {
        tuple[self.null_offset(index)] != 0
    }

    /// Validates `value` against column `index` and converts it to its stored form.
    pub fn encode_column(&self, index: usize, value: &Value) -> Result<EncodedCell> {
        self.check_index(index)?;
        let column = &self.schema.columns[index];
        let width = self.column_offsets[index + 1] - self.column_offsets[index];

        let bytes = match (value, column.data_type) {
            (Value::Null, _) => {
                if !column.nullable {
                    return Err(DatabaseError::NullViolation {
                        column: column.name.clone(),
                    });
                }
                return Ok(EncodedCell::Null);
            }
            (Value::Integer(v), DataType::Int) => {
                let narrowed = i32::try_from(*v).map_err(|_| out_of_range(column, *v))?;
                narrowed.to_ne_bytes().to_vec()
            }
            (Value::Integer(v), DataType::Long) => v.to_ne_bytes().to_vec(),
            (Value::Integer(v), DataType::Float) => {
                let converted = *v as f32;
                if converted as i128 != *v as i128 {
                    return Err(out_of_range(column, *v));
                }
                converted.to_ne_bytes().to_vec()
            }
            (Value::Integer(v), DataType::Double) => {
                let converted = *v as f64;
                if converted as i128 != *v as i128 {
                    return Err(out_of_range(column, *v));
                }
                converted.to_ne_bytes().to_vec()
            }
            (Value::Real(v), DataType::Float) => (*v as f32).to_ne_bytes().to_vec(),
            (Value::Real(v), DataType::Double) => v.to_ne_bytes().to_vec(),
            (Value::Text(s), DataType::Char(_) | DataType::Varchar(_)) => {
                encode_text(column, s, width)?
            }
            (value, data_type) => {
                return Err(DatabaseError::TypeMismatch {
                    column: column.name.clone(),
                    expected: data_type.to_string(),
                    actual: value.type_name().to_string(),
                });
            }
        };

        Ok(EncodedCell::Bytes(bytes))
    }

    /// Encodes a full row. Nothing is written, so a failure here leaves no trace.
    pub fn encode_row(&self, values: &[Value]) -> Result<Vec<EncodedCell>> {
        if values.len() != self.column_count() {
            return Err(DatabaseError::ColumnCountMismatch {
                expected: self.column_count(),
                actual: values.len(),
            });
        }

        values
            .iter()
            .enumerate()
            .map(|(index, value)| self.encode_column(index, value))
            .collect()
    }

    /// Copies an encoded cell into a tuple. NULL only sets the null flag and
    /// leaves the column bytes as they are.
    pub fn write_cell(&self, tuple: &mut [u8], index: usize, cell: &EncodedCell) {
        let null_offset = self.null_offset(index);
        match cell {
            EncodedCell::Null => tuple[null_offset] = 1,
            EncodedCell::Bytes(bytes) => {
                tuple[null_offset] = 0;
                tuple[self.data_range(index)].copy_from_slice(bytes);
            }
        }
    }

    pub fn decode_column(&self, tuple: &[u8], index: usize) -> Result<Value> {
        self.check_index(index)?;
        if self.is_null(tuple, index) {
            return Ok(Value::Null);
        }

        let bytes = &tuple[self.data_range(index)];
        let value = match self.schema.columns[index].data_type {
            DataType::Int => Value::Integer(i32::from_ne_bytes(fixed(bytes)?) as i64),
            DataType::Long => Value::Integer(i64::from_ne_bytes(fixed(bytes)?)),
            DataType::Float => Value::Real(f32::from_ne_bytes(fixed(bytes)?) as f64),
            DataType::Double => Value::Real(f64::from_ne_bytes(fixed(bytes)?)),
            DataType::Char(_) | DataType::Varchar(_) => {
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                let text = String::from_utf8(bytes[..end].to_vec()).map_err(|_| {
                    DatabaseError::SerializationError {
                        details: format!(
                            "Invalid UTF-8 in column '{}'",
                            self.schema.columns[index].name
                        ),
                    }
                })?;
                Value::Text(text)
            }
        };

        Ok(value)
    }

    pub fn decode_row(&self, tuple: &[u8]) -> Result<Vec<Value>> {
        (0..self.column_count())
            .map(|index| self.decode_column(tuple, index))
            .collect()
    }

    /// Zeroes the whole tuple, leaving a free header and no stale column bytes.
    pub fn scrub(&self, tuple: &mut [u8]) {
        tuple.fill(0);
    }

    /// Checks that a saved tuple image fits this layout.
    pub fn check_image(&self, image: &[u8]) -> Result<()> {
        if image.len() != self.tuple_size {
            return Err(DatabaseError::SerializationError {
                details: format!(
                    "Tuple image of {} bytes does not match tuple size {}",
                    image.len(),
                    self.tuple_size
                ),
            });
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.column_count() {
            return Err(DatabaseError::ColumnIndexOutOfBounds { index });
        }
        Ok(())
    }

    fn null_offset(&self, index: usize) -> usize {
        TUPLE_HEADER_SIZE + index
    }

    fn data_range(&self, index: usize) -> Range<usize> {
        let base = TUPLE_HEADER_SIZE + self.column_count();
        base + self.column_offsets[index]..base + self.column_offsets[index + 1]
    }
}

fn out_of_range(column: &ColumnSchema, value: i64) -> DatabaseError {
    DatabaseError::ValueOutOfRange {
        column: column.name.clone(),
        data_type: column.data_type.to_string(),
        value,
    }
}

fn encode_text(column: &ColumnSchema, text: &str, width: usize) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    if bytes.len() > width {
        return Err(DatabaseError::ValueTooLong {
            column: column.name.clone(),
            width,
            len: bytes.len(),
        });
    }
    // Decoding stops at the first zero byte
    if bytes.contains(&0) {
        return Err(DatabaseError::InvalidData {
            details: format!("Text for column '{}' contains a NUL byte", column.name),
        });
    }

    let mut buffer = vec![0u8; width];
    buffer[..bytes.len()].copy_from_slice(bytes);
    Ok(buffer)
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| DatabaseError::SerializationError {
            details: format!("Expected {} bytes, got {}", N, bytes.len()),
        })
}
