//! Intrusive doubly linked list over tuple slots.
//!
//! Slots are addressed by index and carry their own `Link`, stored next to the
//! tuple bytes by whoever owns the slots (see [`LinkTable`]). The list itself
//! only holds the two sentinels, so insertion and removal are O(1) and never
//! special-case the ends.

use crate::types::error::{DatabaseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Head,
    Tail,
    Tuple(usize),
}

/// Which list a slot currently belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Free,
    Data,
}

/// Per-slot link fields. All `None` while the slot is in no list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Link {
    pub prev: Option<Node>,
    pub next: Option<Node>,
    pub owner: Option<ListKind>,
}

/// Storage of the per-slot links a list splices through.
pub trait LinkTable {
    fn link(&self, slot: usize) -> Option<&Link>;
    fn link_mut(&mut self, slot: usize) -> Option<&mut Link>;
}

impl LinkTable for Vec<Link> {
    fn link(&self, slot: usize) -> Option<&Link> {
        self.get(slot)
    }

    fn link_mut(&mut self, slot: usize) -> Option<&mut Link> {
        self.get_mut(slot)
    }
}

#[derive(Debug)]
pub struct TupleList {
    kind: ListKind,
    head_next: Node,
    tail_prev: Node,
    len: usize,
}

impl TupleList {
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            head_next: Node::Tail,
            tail_prev: Node::Head,
            len: 0,
        }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head_next == Node::Tail
    }

    /// Whether `slot` is currently a member of this list.
    pub fn contains<L: LinkTable + ?Sized>(&self, links: &L, slot: usize) -> bool {
        links
            .link(slot)
            .is_some_and(|link| link.owner == Some(self.kind))
    }

    /// Inserts `slot` right after the head sentinel.
    pub fn add_head<L: LinkTable + ?Sized>(&mut self, links: &mut L, slot: usize) -> Result<()> {
        let link = *links.link(slot).ok_or_else(|| missing_slot(slot))?;
        if let Some(owner) = link.owner {
            return Err(DatabaseError::ListCorrupted {
                details: format!(
                    "slot {} is already in the {:?} list, cannot add to {:?}",
                    slot, owner, self.kind
                ),
            });
        }

        let old_first = self.head_next;
        self.set_prev(links, old_first, Node::Tuple(slot))?;
        *links.link_mut(slot).ok_or_else(|| missing_slot(slot))? = Link {
            prev: Some(Node::Head),
            next: Some(old_first),
            owner: Some(self.kind),
        };
        self.head_next = Node::Tuple(slot);
        self.len += 1;
        Ok(())
    }

    /// Splices `slot` out of this list and clears its links.
    pub fn delete<L: LinkTable + ?Sized>(&mut self, links: &mut L, slot: usize) -> Result<()> {
        let link = *links.link(slot).ok_or_else(|| missing_slot(slot))?;
        if link.owner != Some(self.kind) {
            return Err(DatabaseError::ListCorrupted {
                details: format!(
                    "slot {} is not in the {:?} list (owner: {:?})",
                    slot, self.kind, link.owner
                ),
            });
        }

        let (Some(prev), Some(next)) = (link.prev, link.next) else {
            return Err(DatabaseError::ListCorrupted {
                details: format!("slot {} has dangling links", slot),
            });
        };
        self.set_next(links, prev, next)?;
        self.set_prev(links, next, prev)?;
        *links.link_mut(slot).ok_or_else(|| missing_slot(slot))? = Link::default();
        self.len -= 1;
        Ok(())
    }

    /// Removes and returns the first slot, or `None` when the list is empty.
    pub fn pop_head<L: LinkTable + ?Sized>(&mut self, links: &mut L) -> Result<Option<usize>> {
        match self.head_next {
            Node::Tuple(slot) => {
                self.delete(links, slot)?;
                Ok(Some(slot))
            }
            _ => Ok(None),
        }
    }

    pub fn first(&self) -> Option<usize> {
        match self.head_next {
            Node::Tuple(slot) => Some(slot),
            _ => None,
        }
    }

    pub fn last(&self) -> Option<usize> {
        match self.tail_prev {
            Node::Tuple(slot) => Some(slot),
            _ => None,
        }
    }

    /// The slot following `slot`, or `None` when `slot` is the last one.
    pub fn next_of<L: LinkTable + ?Sized>(&self, links: &L, slot: usize) -> Result<Option<usize>> {
        let link = links.link(slot).ok_or_else(|| missing_slot(slot))?;
        if link.owner != Some(self.kind) {
            return Err(DatabaseError::ListCorrupted {
                details: format!("slot {} is not in the {:?} list", slot, self.kind),
            });
        }
        match link.next {
            Some(Node::Tuple(next)) => Ok(Some(next)),
            Some(Node::Tail) => Ok(None),
            _ => Err(DatabaseError::ListCorrupted {
                details: format!("slot {} has no successor", slot),
            }),
        }
    }

    pub fn iter<'a, L: LinkTable + ?Sized>(&self, links: &'a L) -> TupleListIter<'a, L> {
        TupleListIter {
            links,
            current: self.head_next,
        }
    }

    fn set_next<L: LinkTable + ?Sized>(&mut self, links: &mut L, node: Node, next: Node) -> Result<()> {
        match node {
            Node::Head => self.head_next = next,
            Node::Tuple(slot) => {
                links.link_mut(slot).ok_or_else(|| missing_slot(slot))?.next = Some(next)
            }
            Node::Tail => {
                return Err(DatabaseError::ListCorrupted {
                    details: "tail sentinel has no successor".to_string(),
                });
            }
        }
        Ok(())
    }

    fn set_prev<L: LinkTable + ?Sized>(&mut self, links: &mut L, node: Node, prev: Node) -> Result<()> {
        match node {
            Node::Tail => self.tail_prev = prev,
            Node::Tuple(slot) => {
                links.link_mut(slot).ok_or_else(|| missing_slot(slot))?.prev = Some(prev)
            }
            Node::Head => {
                return Err(DatabaseError::ListCorrupted {
                    details: "head sentinel has no predecessor".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Walks a list from head to tail.
pub struct TupleListIter<'a, L: LinkTable + ?Sized> {
    links: &'a L,
    current: Node,
}

impl<L: LinkTable + ?Sized> Iterator for TupleListIter<'_, L> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self.current {
            Node::Tuple(slot) => {
                self.current = self
                    .links
                    .link(slot)
                    .and_then(|link| link.next)
                    .unwrap_or(Node::Tail);
                Some(slot)
            }
            _ => None,
        }
    }
}

fn missing_slot(slot: usize) -> DatabaseError {
    DatabaseError::ListCorrupted {
        details: format!("slot {} does not exist", slot),
    }
}
