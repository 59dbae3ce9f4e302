use tracing::debug;

use crate::{
    config::StoreConfig,
    storage::tuple_list::{Link, LinkTable, TupleList},
    types::error::{DatabaseError, Result},
};

/// One bulk allocation of `group_size` tuple slots.
struct TupleGroup {
    bytes: Box<[u8]>,
    links: Box<[Link]>,
}

/// Owns every tuple group of a store.
///
/// Groups are only ever appended; a slot's bytes never move once allocated,
/// so slot indexes handed out stay valid until the allocator is dropped.
pub struct TupleGroups {
    tuple_size: usize,
    group_size: usize,
    max_groups: Option<usize>,
    groups: Vec<TupleGroup>,
}

impl TupleGroups {
    pub fn new(tuple_size: usize, config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tuple_size,
            group_size: config.group_size,
            max_groups: config.max_groups,
            groups: Vec::new(),
        })
    }

    pub fn tuple_size(&self) -> usize {
        self.tuple_size
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of slots across all groups.
    pub fn capacity(&self) -> usize {
        self.groups.len() * self.group_size
    }

    pub fn contains(&self, slot: usize) -> bool {
        slot < self.capacity()
    }

    /// Allocates a zeroed group and pushes all of its slots onto `free_list`.
    ///
    /// On failure nothing is allocated and `free_list` is untouched.
    pub fn allocate_group(&mut self, free_list: &mut TupleList) -> Result<usize> {
        if let Some(limit) = self.max_groups {
            if self.groups.len() >= limit {
                return Err(DatabaseError::GroupLimitReached { limit });
            }
        }

        let byte_len = self
            .tuple_size
            .checked_mul(self.group_size)
            .ok_or(DatabaseError::OutOfMemory { bytes: usize::MAX })?;
        let out_of_memory = |_| DatabaseError::OutOfMemory { bytes: byte_len };

        let mut bytes = Vec::new();
        bytes.try_reserve_exact(byte_len).map_err(out_of_memory)?;
        bytes.resize(byte_len, 0u8);

        let mut links = Vec::new();
        links.try_reserve_exact(self.group_size).map_err(out_of_memory)?;
        links.resize(self.group_size, Link::default());

        self.groups.try_reserve(1).map_err(out_of_memory)?;
        let group_index = self.groups.len();
        self.groups.push(TupleGroup {
            bytes: bytes.into_boxed_slice(),
            links: links.into_boxed_slice(),
        });

        // Reverse order so the lowest slot is handed out first
        let base = group_index * self.group_size;
        for slot in (base..base + self.group_size).rev() {
            free_list.add_head(self, slot)?;
        }

        debug!(
            group = group_index,
            bytes = byte_len,
            slots = self.group_size,
            "allocated tuple group"
        );
        Ok(group_index)
    }

    pub fn tuple(&self, slot: usize) -> Option<&[u8]> {
        let (group, offset) = self.locate(slot)?;
        self.groups
            .get(group)
            .map(|g| &g.bytes[offset * self.tuple_size..(offset + 1) * self.tuple_size])
    }

    pub fn tuple_mut(&mut self, slot: usize) -> Option<&mut [u8]> {
        let (group, offset) = self.locate(slot)?;
        let tuple_size = self.tuple_size;
        self.groups
            .get_mut(group)
            .map(|g| &mut g.bytes[offset * tuple_size..(offset + 1) * tuple_size])
    }

    fn locate(&self, slot: usize) -> Option<(usize, usize)> {
        if !self.contains(slot) {
            return None;
        }
        Some((slot / self.group_size, slot % self.group_size))
    }
}

impl LinkTable for TupleGroups {
    fn link(&self, slot: usize) -> Option<&Link> {
        let (group, offset) = self.locate(slot)?;
        self.groups.get(group).map(|g| &g.links[offset])
    }

    fn link_mut(&mut self, slot: usize) -> Option<&mut Link> {
        let (group, offset) = self.locate(slot)?;
        self.groups.get_mut(group).map(|g| &mut g.links[offset])
    }
}
