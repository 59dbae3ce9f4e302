use thiserror::Error;

use crate::types::TupleId;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Out of memory: failed to allocate {bytes} bytes for a tuple group")]
    OutOfMemory { bytes: usize },

    #[error("Tuple group limit of {limit} reached")]
    GroupLimitReached { limit: usize },

    #[error("Expected {expected} values, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    #[error("Column index {index} out of bounds")]
    ColumnIndexOutOfBounds { index: usize },

    #[error("Type mismatch for column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    #[error("Value {value} out of range for column '{column}' of type {data_type}")]
    ValueOutOfRange {
        column: String,
        data_type: String,
        value: i64,
    },

    #[error("Value of {len} bytes is too long for column '{column}' (width {width})")]
    ValueTooLong {
        column: String,
        width: usize,
        len: usize,
    },

    #[error("Column '{column}' cannot be NULL")]
    NullViolation { column: String },

    #[error("Tuple {tuple} is not a live row of table '{table}'")]
    InvalidTuple { table: String, tuple: TupleId },

    #[error("Tuple list corrupted: {details}")]
    ListCorrupted { details: String },

    #[error("Serialization/deserialization error: {details}")]
    SerializationError { details: String },

    #[error("Invalid data: {details}")]
    InvalidData { details: String },

    #[error("Table '{name}' not found")]
    TableNotFound { name: String },

    #[error("Table '{name}' already exists")]
    TableAlreadyExists { name: String },

    #[error("Column '{name}' not found in table '{table}'")]
    ColumnNotFound { name: String, table: String },

    #[error("Schema '{name}' not found")]
    SchemaNotFound { name: String },

    #[error("A transaction is already active (id: {id})")]
    TransactionAlreadyActive { id: u64 },

    #[error("No active transaction")]
    NoActiveTransaction,

    #[error("SQL parsing error: {details}")]
    SqlParseError { details: String },

    #[error("Query execution error: {details}")]
    ExecutionError { details: String },
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
