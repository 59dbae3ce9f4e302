pub mod manager;
pub mod undo;

pub use manager::Transaction;
pub use undo::{UndoKind, UndoLog, UndoRecord, UndoSink};
