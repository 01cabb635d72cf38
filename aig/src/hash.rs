//! The structural hash table (C4): canonicalization of two-input AND nodes.

use crate::arena::Arena;
use crate::node::{Literal, NodeId};

/// Id of the single, always-present constant-1 object. The arena's id
/// counter is monotonic and a [`crate::Manager`] creates this object first,
/// so it is always id 0.
pub(crate) const CONST1: NodeId = NodeId(0);

/// Canonicalizes two children by ascending node id, as every AND node's
/// stored `(child0, child1)` pair must be.
///
/// # Examples
///
/// ```
/// use aig::Manager;
/// let mut m = Manager::new();
/// let a = m.new_primary_input();
/// let b = m.new_primary_input();
/// assert_eq!(m.and(a, b), m.and(b, a));
/// ```
#[inline]
pub(crate) fn canonicalize(a: Literal, b: Literal) -> (Literal, Literal) {
  if a.node.index() <= b.node.index() {
    (a, b)
  } else {
    (b, a)
  }
}

fn hash_key(a: Literal, b: Literal, table_size: usize) -> usize {
  let mut h: u32 = 0;
  h ^= a.node.0.wrapping_mul(7937);
  h ^= b.node.0.wrapping_mul(2971);
  h ^= (a.complement as u32).wrapping_mul(911);
  h ^= (b.complement as u32).wrapping_mul(353);
  (h as usize) % table_size
}

fn is_dangling(node: NodeId, arena: &Arena) -> bool {
  use crate::node::NodeKind;
  let data = arena.get(node);
  data.kind() == NodeKind::And && data.fanouts().map(|f| f.is_empty()).unwrap_or(false)
}

fn next_prime(mut n: usize) -> usize {
  if n < 2 {
    n = 2;
  }
  loop {
    if is_prime(n) {
      return n;
    }
    n += 1;
  }
}

fn is_prime(n: usize) -> bool {
  if n < 2 {
    return false;
  }
  if n % 2 == 0 {
    return n == 2;
  }
  let mut d = 3;
  while d * d <= n {
    if n % d == 0 {
      return false;
    }
    d += 2;
  }
  true
}

/// Canonical-key lookup table for two-input AND nodes.
///
/// Buckets are singly-linked via each AND node's `next_in_bucket` field
/// rather than an auxiliary `Vec` per bucket, so a bucket chain costs no
/// allocation beyond the node itself.
pub struct StructuralHashTable {
  buckets: Vec<Option<NodeId>>,
  entries: usize,
}

impl Default for StructuralHashTable {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl StructuralHashTable {
  /// Creates an empty table with a small initial bucket array.
  #[inline]
  pub fn new() -> Self {
    Self { buckets: vec![None; next_prime(17)], entries: 0 }
  }

  /// Number of AND nodes currently hashed.
  #[inline]
  pub fn len(&self) -> usize {
    self.entries
  }

  /// Whether the table holds no entries.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.entries == 0
  }

  /// Looks up the AND node implementing `a & b`, applying the trivial
  /// reductions (`a&a=a`, `a&¬a=0`, `a&1=a`, `a&0=0`) and the
  /// dangling-suppression rule: if either operand's node has zero
  /// fanouts, the operand is semantically gone and lookup reports no
  /// match so a cascading replacement cannot resurrect it.
  pub fn lookup(&self, a: Literal, b: Literal, arena: &Arena) -> Option<Literal> {
    if a.node == b.node {
      return Some(if a.complement == b.complement { a } else { Literal::new(CONST1, true) });
    }
    if a.node == CONST1 {
      return Some(if a.complement { Literal::new(CONST1, true) } else { b });
    }
    if b.node == CONST1 {
      return Some(if b.complement { Literal::new(CONST1, true) } else { a });
    }
    if is_dangling(a.node, arena) || is_dangling(b.node, arena) {
      return None;
    }
    let (c0, c1) = canonicalize(a, b);
    let idx = hash_key(c0, c1, self.buckets.len());
    let mut cursor = self.buckets[idx];
    while let Some(id) = cursor {
      let data = arena.get(id).as_and();
      if data.child0 == c0 && data.child1 == c1 {
        return Some(Literal::positive(id));
      }
      cursor = data.next_in_bucket;
    }
    None
  }

  /// Inserts an already-constructed AND node, whose `child0`/`child1` are
  /// assumed to already be in canonical order. Resizes first if the load
  /// factor would exceed 2.
  pub fn insert(&mut self, id: NodeId, arena: &mut Arena) {
    if self.entries + 1 > 2 * self.buckets.len() {
      self.resize(next_prime(3 * (self.entries + 1)), arena);
    }
    let (c0, c1) = {
      let data = arena.get(id).as_and();
      (data.child0, data.child1)
    };
    let idx = hash_key(c0, c1, self.buckets.len());
    let head = self.buckets[idx];
    arena.get_mut(id).as_and_mut().next_in_bucket = head;
    self.buckets[idx] = Some(id);
    self.entries += 1;
  }

  /// Unlinks `id` from its bucket. Must run before the node's fanin edges
  /// are edited, since the key used to find it depends on those edges.
  ///
  /// # Panics
  ///
  /// Panics if `id` is not currently hashed.
  pub fn remove(&mut self, id: NodeId, arena: &mut Arena) {
    let (c0, c1) = {
      let data = arena.get(id).as_and();
      (data.child0, data.child1)
    };
    let idx = hash_key(c0, c1, self.buckets.len());
    let mut prev: Option<NodeId> = None;
    let mut cursor = self.buckets[idx];
    while let Some(cid) = cursor {
      let next = arena.get(cid).as_and().next_in_bucket;
      if cid == id {
        match prev {
          Some(p) => arena.get_mut(p).as_and_mut().next_in_bucket = next,
          None => self.buckets[idx] = next,
        }
        arena.get_mut(id).as_and_mut().next_in_bucket = None;
        self.entries -= 1;
        return;
      }
      prev = Some(cid);
      cursor = next;
    }
    panic!("BUG: {id:?} was not found in its hash bucket");
  }

  fn resize(&mut self, new_size: usize, arena: &mut Arena) {
    let old_ids: Vec<NodeId> = {
      let mut ids = Vec::with_capacity(self.entries);
      for &head in &self.buckets {
        let mut cursor = head;
        while let Some(id) = cursor {
          ids.push(id);
          cursor = arena.get(id).as_and().next_in_bucket;
        }
      }
      ids
    };
    self.buckets = vec![None; new_size];
    self.entries = 0;
    for id in old_ids {
      // Re-canonicalize in case callers ever stored children out of
      // order; a no-op when they were already canonical.
      let (c0, c1) = {
        let data = arena.get(id).as_and();
        canonicalize(data.child0, data.child1)
      };
      {
        let data = arena.get_mut(id).as_and_mut();
        data.child0 = c0;
        data.child1 = c1;
        data.next_in_bucket = None;
      }
      let idx = hash_key(c0, c1, self.buckets.len());
      let head = self.buckets[idx];
      arena.get_mut(id).as_and_mut().next_in_bucket = head;
      self.buckets[idx] = Some(id);
      self.entries += 1;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn next_prime_rounds_up() {
    assert_eq!(next_prime(1), 2);
    assert_eq!(next_prime(4), 5);
    assert_eq!(next_prime(17), 17);
    assert_eq!(next_prime(18), 19);
  }
}
