use serde::{Deserialize, Serialize};

use crate::types::{TUPLE_GROUP_SIZE, error::DatabaseError};

/// Sizing knobs applied to every table store a catalog creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of tuple slots allocated together as one group.
    pub group_size: usize,
    /// Upper bound on groups per store. `None` means bounded only by memory.
    pub max_groups: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            group_size: TUPLE_GROUP_SIZE,
            max_groups: None,
        }
    }
}

impl StoreConfig {
    pub fn with_group_size(mut self, group_size: usize) -> Self {
        self.group_size = group_size;
        self
    }

    pub fn with_max_groups(mut self, max_groups: usize) -> Self {
        self.max_groups = Some(max_groups);
        self
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        if self.group_size == 0 {
            return Err(DatabaseError::InvalidData {
                details: "group_size must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
