//! The object arena (C3): stable node identities with O(1) add/remove.

use crate::node::{AndData, CoKind, NodeData, NodeId, NodeKind};
use hashlink::LinkedHashSet;

/// Owns every [`NodeData`] in a [`crate::Manager`]. Every other structure
/// (hash buckets, fanout lists, heaps, the topological list) refers to nodes
/// only by [`NodeId`].
///
/// Ids are assigned by a counter that never regresses: deleting a node frees
/// its slot for storage purposes but its numeric id is never handed out
/// again, matching the lifecycle rule that a node's id is stable until
/// deletion and not reused within a session.
#[derive(Default)]
pub struct Arena {
  slots: Vec<Option<NodeData>>,
  next_id: u32,
}

impl Arena {
  /// Creates an empty arena.
  #[inline]
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of live nodes (deleted slots are not counted).
  pub fn len(&self) -> usize {
    self.slots.iter().filter(|s| s.is_some()).count()
  }

  /// Whether the arena has no live nodes.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// The id that the next `insert` will hand out. Any live id `>=` this
  /// value, read before some operation began, was created during it.
  #[inline]
  pub fn peek_next_id(&self) -> u32 {
    self.next_id
  }

  /// Allocates a fresh id and stores `data` under it.
  pub fn insert(&mut self, data: NodeData) -> NodeId {
    let id = NodeId(self.next_id);
    self.next_id += 1;
    let index = id.index();
    if index == self.slots.len() {
      self.slots.push(Some(data));
    } else {
      self.slots[index] = Some(data);
    }
    id
  }

  /// Removes and returns the data stored at `id`.
  ///
  /// # Panics
  ///
  /// Panics if `id` is not currently live; callers only remove a node
  /// after every other structure has released its references to it.
  pub fn remove(&mut self, id: NodeId) -> NodeData {
    self.slots[id.index()]
      .take()
      .unwrap_or_else(|| panic!("BUG: {id:?} was not found in the arena"))
  }

  /// Borrows the data stored at `id`.
  #[inline]
  pub fn get(&self, id: NodeId) -> &NodeData {
    self.slots[id.index()]
      .as_ref()
      .unwrap_or_else(|| panic!("BUG: {id:?} was not found in the arena"))
  }

  /// Mutably borrows the data stored at `id`.
  #[inline]
  pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
    self.slots[id.index()]
      .as_mut()
      .unwrap_or_else(|| panic!("BUG: {id:?} was not found in the arena"))
  }

  /// Whether `id` currently refers to a live node.
  #[inline]
  pub fn contains(&self, id: NodeId) -> bool {
    self.slots.get(id.index()).map(|s| s.is_some()).unwrap_or(false)
  }

  /// Iterates every live id, in ascending id order.
  pub fn iter_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
    self.slots
      .iter()
      .enumerate()
      .filter_map(|(i, s)| s.as_ref().map(|_| NodeId(i as u32)))
  }

  /// Iterates every live id of the given kind, in ascending id order.
  pub fn iter_kind(&self, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
    self.iter_ids().filter(move |&id| self.get(id).kind() == kind)
  }

  /// Creates the constant-1 object. Only ever called once, by
  /// [`crate::Manager::new`].
  #[inline]
  pub(crate) fn insert_constant1(&mut self) -> NodeId {
    self.insert(NodeData::Constant1 { fanouts: LinkedHashSet::new() })
  }

  /// Creates a fresh primary input.
  #[inline]
  pub(crate) fn insert_primary_input(&mut self) -> NodeId {
    self.insert(NodeData::PrimaryInput { fanouts: LinkedHashSet::new() })
  }

  /// Creates a fresh primary output or latch boundary driven by `input`.
  #[inline]
  pub(crate) fn insert_co(&mut self, kind: CoKind, input: crate::node::Literal) -> NodeId {
    self.insert(NodeData::Co { kind, input })
  }

  /// Creates a fresh AND node. Callers are responsible for linking it into
  /// the hash table and both children's fanout sets before it is observed
  /// by anything else.
  #[inline]
  pub(crate) fn insert_and(&mut self, data: AndData) -> NodeId {
    self.insert(NodeData::And(data))
  }
}

impl std::fmt::Debug for Arena {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Arena").field("len", &self.len()).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ids_are_never_reused() {
    let mut arena = Arena::new();
    let a = arena.insert_primary_input();
    let b = arena.insert_primary_input();
    arena.remove(a);
    let c = arena.insert_primary_input();
    assert_ne!(a, c);
    assert_ne!(b, c);
    assert!(!arena.contains(a));
    assert!(arena.contains(b));
    assert!(arena.contains(c));
  }

  #[test]
  fn iter_kind_filters_by_kind() {
    let mut arena = Arena::new();
    let _c1 = arena.insert_constant1();
    let pi = arena.insert_primary_input();
    let pis: Vec<_> = arena.iter_kind(NodeKind::PrimaryInput).collect();
    assert_eq!(pis, vec![pi]);
  }
}
