//! The AIG manager (C5): hash-consed construction of AND/OR/XOR/MUX/miter,
//! plus the state every other component (replacement, levels, the driver)
//! operates on.

use crate::arena::Arena;
use crate::error::AigError;
use crate::hash::{canonicalize, StructuralHashTable, CONST1};
use crate::node::{AndData, CoKind, Literal, NodeData, NodeId, NodeKind};
use crate::stats::Stats;
use crate::tracker::{NullTracker, Tracker};
use aig_topo::{Cursor, PriorityHeap, TopoList};
use std::collections::HashSet;

/// Owns the arena, the structural hash table, both level-maintenance heaps,
/// and the persistent topological list, and exposes the hash-consed Boolean
/// constructors.
///
/// `replace` (C6), level maintenance (C7), and the invariant checker are
/// implemented as additional `impl Manager` blocks in sibling modules; they
/// all operate on the same fields defined here.
pub struct Manager {
  pub(crate) arena: Arena,
  pub(crate) hash: StructuralHashTable,
  pub(crate) fwd_heap: PriorityHeap<NodeId>,
  pub(crate) rev_heap: PriorityHeap<NodeId>,
  pub(crate) reverse_armed: bool,
  pub(crate) topo: TopoList<NodeId>,
  /// The two parallel work stacks `replace` drains; must be empty at
  /// every public API boundary.
  pub(crate) pending_old: Vec<NodeId>,
  pub(crate) pending_new: Vec<Literal>,
  pub(crate) stats: Stats,
  pub(crate) tracker: Box<dyn Tracker>,
  /// Populated as nodes are created; observer-only, never read internally.
  pub added_cells: Vec<NodeId>,
  /// Populated with the two children of every MFFC-deleted node,
  /// deduplicated by insertion order; observer-only.
  pub updated_nets: Vec<NodeId>,
  /// The driver's working cursor over `topo`, while a pass is running.
  /// `delete_mffc` repoints this (via `TopoList::remove`) whenever it
  /// unlinks the node the cursor currently sits on, so the driver never
  /// observes a dangling handle no matter where in its own call stack a
  /// cascading deletion happens to occur.
  pub(crate) active_cursor: Option<Cursor>,
}

impl Default for Manager {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Manager {
  /// Creates an empty AIG containing one constant-1 object at slot 0.
  pub fn new() -> Self {
    let mut arena = Arena::new();
    let const1 = arena.insert_constant1();
    debug_assert_eq!(const1, CONST1);
    Self {
      arena,
      hash: StructuralHashTable::new(),
      fwd_heap: PriorityHeap::new(),
      rev_heap: PriorityHeap::new(),
      reverse_armed: false,
      topo: TopoList::new(),
      pending_old: Vec::new(),
      pending_new: Vec::new(),
      stats: Stats::default(),
      tracker: Box::new(NullTracker),
      added_cells: Vec::new(),
      updated_nets: Vec::new(),
      active_cursor: None,
    }
  }

  /// Swaps in a new observer. The default is a no-op [`NullTracker`].
  pub fn set_tracker(&mut self, tracker: Box<dyn Tracker>) {
    self.tracker = tracker;
  }

  /// Current pass counters.
  #[inline]
  pub fn stats(&self) -> &Stats {
    &self.stats
  }

  /// Mutable access to the pass counters, for the driver to reset and
  /// accumulate into.
  #[inline]
  pub(crate) fn stats_mut(&mut self) -> &mut Stats {
    &mut self.stats
  }

  /// Whether reverse-level tracking is currently armed.
  #[inline]
  pub fn reverse_levels_armed(&self) -> bool {
    self.reverse_armed
  }

  /// Whether the driver has already processed `node` in the current pass.
  #[inline]
  pub(crate) fn is_handled(&self, node: NodeId) -> bool {
    matches!(self.arena.get(node), NodeData::And(data) if data.handled)
  }

  /// Marks `node` as processed for the current pass.
  #[inline]
  pub(crate) fn mark_handled(&mut self, node: NodeId) {
    self.arena.get_mut(node).as_and_mut().handled = true;
  }

  /// The two fanin nodes of an AND node (panics on any other kind).
  #[inline]
  pub(crate) fn fanins(&self, node: NodeId) -> [NodeId; 2] {
    let data = self.arena.get(node).as_and();
    [data.child0.node, data.child1.node]
  }

  #[inline]
  pub(crate) fn tracker_pass_start(&mut self) {
    self.tracker.pass_start();
  }

  pub(crate) fn tracker_pass_end(&mut self) {
    let stats = self.stats;
    self.tracker.pass_end(&stats);
  }

  /// The literal for the constant-1 object.
  #[inline]
  pub fn const1(&self) -> Literal {
    Literal::positive(CONST1)
  }

  /// Creates a fresh primary input and returns its (always uncomplemented)
  /// literal.
  pub fn new_primary_input(&mut self) -> Literal {
    Literal::positive(self.arena.insert_primary_input())
  }

  /// Creates a fresh primary output driven by `input`.
  pub fn new_primary_output(&mut self, input: Literal) -> NodeId {
    let id = self.arena.insert_co(CoKind::PrimaryOutput, input);
    self.add_fanout(input.node, id);
    id
  }

  /// Creates a fresh latch boundary driven by `input`.
  pub fn new_latch_boundary(&mut self, input: Literal) -> NodeId {
    let id = self.arena.insert_co(CoKind::LatchBoundary, input);
    self.add_fanout(input.node, id);
    id
  }

  /// This node's kind.
  #[inline]
  pub fn kind(&self, node: NodeId) -> NodeKind {
    self.arena.get(node).kind()
  }

  /// Whether `node` currently refers to a live node.
  #[inline]
  pub fn contains(&self, node: NodeId) -> bool {
    self.arena.contains(node)
  }

  /// Number of AND nodes currently structurally hashed.
  #[inline]
  pub fn hash_len(&self) -> usize {
    self.hash.len()
  }

  /// The literal currently driving a primary output or latch boundary.
  ///
  /// # Panics
  ///
  /// Panics if `node` is not a CO node.
  pub fn primary_output_input(&self, node: NodeId) -> Literal {
    match self.arena.get(node) {
      NodeData::Co { input, .. } => *input,
      _ => panic!("BUG: {node:?} is not a CO node"),
    }
  }

  /// `Level(node)`; 0 for primary inputs and the constant.
  #[inline]
  pub fn level(&self, node: NodeId) -> u32 {
    match self.arena.get(node) {
      NodeData::And(data) => data.level,
      _ => 0,
    }
  }

  /// `ReverseLevel(node)`, if reverse levels are currently armed and this
  /// is an AND node.
  #[inline]
  pub fn reverse_level(&self, node: NodeId) -> Option<u32> {
    match self.arena.get(node) {
      NodeData::And(data) if self.reverse_armed => data.reverse_level,
      _ => None,
    }
  }

  /// `Phase(lit)`: the literal's value under the all-zero PI assignment.
  pub fn phase(&self, lit: Literal) -> bool {
    let base = match self.arena.get(lit.node) {
      NodeData::Constant1 { .. } => true,
      NodeData::PrimaryInput { .. } => false,
      NodeData::And(data) => data.phase,
      NodeData::Co { .. } => panic!("BUG: phase queried on a CO node"),
    };
    base ^ lit.complement
  }

  /// Whether `node` is the root of a canonical two-AND XOR pattern.
  #[inline]
  pub fn is_exor(&self, node: NodeId) -> bool {
    matches!(self.arena.get(node), NodeData::And(data) if data.is_exor)
  }

  /// Whether `node` is marked persistent (the driver never rewrites it).
  #[inline]
  pub fn is_persistent(&self, node: NodeId) -> bool {
    matches!(self.arena.get(node), NodeData::And(data) if data.persistent)
  }

  /// Marks (or unmarks) `node` as persistent.
  ///
  /// # Panics
  ///
  /// Panics if `node` is not an AND node.
  pub fn set_persistent(&mut self, node: NodeId, persistent: bool) {
    self.arena.get_mut(node).as_and_mut().persistent = persistent;
  }

  /// Number of fanouts `node` currently has (0 means dangling, for an AND
  /// node).
  pub fn fanout_count(&self, node: NodeId) -> usize {
    self.arena.get(node).fanouts().map(|f| f.len()).unwrap_or(0)
  }

  pub(crate) fn add_fanout(&mut self, of: NodeId, fanout: NodeId) {
    if let Some(set) = self.arena.get_mut(of).fanouts_mut() {
      set.insert(fanout);
    }
  }

  pub(crate) fn remove_fanout(&mut self, of: NodeId, fanout: NodeId) {
    if let Some(set) = self.arena.get_mut(of).fanouts_mut() {
      let removed = set.remove(&fanout);
      debug_assert!(removed, "BUG: {fanout:?} was not found in {of:?}'s fanouts");
    }
  }

  // -- hash-consed Boolean constructors (C5) --------------------------

  /// `a ∧ b`.
  pub fn and(&mut self, a: Literal, b: Literal) -> Literal {
    if let Some(existing) = self.hash.lookup(a, b, &self.arena) {
      return existing;
    }
    let (c0, c1) = canonicalize(a, b);
    let level = 1 + self.level(c0.node).max(self.level(c1.node));
    let phase = (self.phase(c0)) & (self.phase(c1));
    let id = self.arena.insert_and(AndData {
      child0: c0,
      child1: c1,
      level,
      reverse_level: None,
      phase,
      is_exor: false,
      fanouts: Default::default(),
      next_in_bucket: None,
      topo_handle: None,
      persistent: false,
      mark_a: false,
      mark_b: false,
      mark_c: false,
      handled: false,
    });
    self.add_fanout(c0.node, id);
    self.add_fanout(c1.node, id);
    self.hash.insert(id, &mut self.arena);
    self.recompute_is_exor(id);
    self.added_cells.push(id);
    self.tracker.node_created(id);
    Literal::positive(id)
  }

  /// `¬(¬a ∧ ¬b)`.
  pub fn or(&mut self, a: Literal, b: Literal) -> Literal {
    self.and(a.negate(), b.negate()).negate()
  }

  /// `or(and(a,¬b), and(¬a,b))`.
  pub fn xor(&mut self, a: Literal, b: Literal) -> Literal {
    let p = self.and(a, b.negate());
    let q = self.and(a.negate(), b);
    self.or(p, q)
  }

  /// `or(and(c,t), and(¬c,e))`.
  pub fn mux(&mut self, c: Literal, t: Literal, e: Literal) -> Literal {
    let p = self.and(c, t);
    let q = self.and(c.negate(), e);
    self.or(p, q)
  }

  /// Folds `pairs` with `and(x, ¬y)` then `or` (if `implic`) or with `xor`
  /// then `or` (otherwise), via balanced binary reduction so level growth
  /// is logarithmic in `pairs.len()` rather than linear.
  pub fn miter(&mut self, pairs: &[(Literal, Literal)], implic: bool) -> Literal {
    let terms: Vec<Literal> = pairs
      .iter()
      .map(|&(x, y)| if implic { self.and(x, y.negate()) } else { self.xor(x, y) })
      .collect();
    self.balanced_or(&terms)
  }

  fn balanced_or(&mut self, terms: &[Literal]) -> Literal {
    match terms {
      [] => self.const1().negate(),
      [only] => *only,
      _ => {
        let mid = terms.len() / 2;
        let left = self.balanced_or(&terms[..mid]);
        let right = self.balanced_or(&terms[mid..]);
        self.or(left, right)
      }
    }
  }

  /// Pure query: returns the existing node implementing `a xor b` via the
  /// canonical `or(and(a,¬b), and(¬a,b))` pattern, without creating
  /// anything. `None` if any part of the pattern is absent.
  pub fn lookup_xor(&self, a: Literal, b: Literal) -> Option<Literal> {
    let p = self.hash.lookup(a, b.negate(), &self.arena)?;
    let q = self.hash.lookup(a.negate(), b, &self.arena)?;
    let n = self.hash.lookup(p.negate(), q.negate(), &self.arena)?;
    Some(n.negate())
  }

  /// Pure query: same as [`Manager::lookup_xor`], for the MUX pattern.
  pub fn lookup_mux(&self, c: Literal, t: Literal, e: Literal) -> Option<Literal> {
    let p = self.hash.lookup(c, t, &self.arena)?;
    let q = self.hash.lookup(c.negate(), e, &self.arena)?;
    let n = self.hash.lookup(p.negate(), q.negate(), &self.arena)?;
    Some(n.negate())
  }

  /// Recomputes `phase` for an existing AND node from its current
  /// children. Used after a fanin swap during `replace`.
  pub(crate) fn recompute_phase(&mut self, node: NodeId) {
    let (c0, c1) = {
      let data = self.arena.get(node).as_and();
      (data.child0, data.child1)
    };
    let phase = self.phase(c0) & self.phase(c1);
    self.arena.get_mut(node).as_and_mut().phase = phase;
  }

  /// Recomputes `is_exor` for an existing AND node from its current
  /// children, per the canonical pattern: both children are negated AND
  /// nodes whose own two children are the same unordered pair `{p, q}`
  /// with opposite-polarity pairing (`and(p,¬q)` and `and(¬p,q)`).
  pub(crate) fn recompute_is_exor(&mut self, node: NodeId) {
    let is_exor = self.detect_exor_pattern(node);
    self.arena.get_mut(node).as_and_mut().is_exor = is_exor;
  }

  pub(crate) fn detect_exor_pattern(&self, node: NodeId) -> bool {
    let (c0, c1) = {
      let data = self.arena.get(node).as_and();
      (data.child0, data.child1)
    };
    if !c0.complement || !c1.complement {
      return false;
    }
    let g0 = match self.arena.get(c0.node) {
      NodeData::And(data) => data,
      _ => return false,
    };
    let g1 = match self.arena.get(c1.node) {
      NodeData::And(data) => data,
      _ => return false,
    };
    let (p0, q0) = (g0.child0, g0.child1);
    let (p1, q1) = (g1.child0, g1.child1);
    let same_pair = (p0.node == p1.node && q0.node == q1.node)
      || (p0.node == q1.node && q0.node == p1.node);
    if !same_pair {
      return false;
    }
    // g0 = and(p, ¬q), g1 = and(¬p, q) for the same underlying {p, q}.
    if p0.node == p1.node {
      p0.complement != p1.complement && q0.complement != q1.complement
    } else {
      p0.complement == q1.complement && q0.complement == p1.complement
    }
  }

  // -- cleanup / arming -------------------------------------------------

  /// Deletes every currently-dangling AND node (0 fanouts), returning how
  /// many were removed.
  pub fn cleanup(&mut self) -> usize {
    let dangling: Vec<NodeId> = self
      .arena
      .iter_kind(NodeKind::And)
      .filter(|&id| self.fanout_count(id) == 0)
      .collect();
    let before = self.stats.nodes_deleted;
    for id in dangling {
      if self.arena.contains(id) && self.fanout_count(id) == 0 {
        self.delete_mffc(id);
      }
    }
    (self.stats.nodes_deleted - before) as usize
  }

  /// Arms reverse-level tracking: every AND's `ReverseLevel` becomes
  /// `Some`, initialized by a full recompute from the POs inward.
  pub fn arm_reverse_levels(&mut self) {
    if self.reverse_armed {
      return;
    }
    self.reverse_armed = true;
    self.recompute_all_reverse_levels();
  }

  /// Disarms reverse-level tracking: every AND's `ReverseLevel` becomes
  /// absent.
  pub fn disarm_reverse_levels(&mut self) {
    self.reverse_armed = false;
    let ids: Vec<NodeId> = self.arena.iter_kind(NodeKind::And).collect();
    for id in ids {
      self.arena.get_mut(id).as_and_mut().reverse_level = None;
    }
  }

  /// Deletes a node that is dangling (0 fanouts) together with every AND
  /// child that becomes dangling as a result — the MFFC rooted at `node`.
  ///
  /// Per the replacement engine's special rule, a node currently scheduled
  /// to *be* a replacement (present in `pending_new`) is never deleted
  /// here even if it has 0 fanouts.
  pub(crate) fn delete_mffc(&mut self, node: NodeId) {
    if self.pending_new.iter().any(|lit| lit.node == node) {
      return;
    }
    debug_assert_eq!(self.fanout_count(node), 0, "BUG: {node:?} is not dangling");
    let data = self.arena.get(node).as_and();
    let (c0, c1) = (data.child0, data.child1);
    self.hash.remove(node, &mut self.arena);
    self.remove_fanout(c0.node, node);
    self.remove_fanout(c1.node, node);
    if let Some(handle) = self.arena.get(node).as_and().topo_handle {
      self.topo.remove(handle, self.active_cursor.as_mut());
    }
    self.arena.remove(node);
    self.stats.nodes_deleted += 1;
    self.tracker.node_deleted(node);
    self.record_updated_net(c0.node);
    self.record_updated_net(c1.node);

    for child in [c0.node, c1.node] {
      if self.kind(child) == NodeKind::And && self.fanout_count(child) == 0 {
        self.delete_mffc(child);
      }
    }
  }

  fn record_updated_net(&mut self, node: NodeId) {
    if !self.updated_nets.contains(&node) {
      self.updated_nets.push(node);
    }
  }

  fn recompute_all_reverse_levels(&mut self) {
    let ids: Vec<NodeId> = self.arena.iter_kind(NodeKind::And).collect();
    for &id in ids.iter().rev() {
      let rl = self.compute_reverse_level(id);
      self.arena.get_mut(id).as_and_mut().reverse_level = Some(rl);
    }
  }

  pub(crate) fn compute_reverse_level(&self, node: NodeId) -> u32 {
    let data = self.arena.get(node).as_and();
    data.fanouts
      .iter()
      .filter(|&&f| self.kind(f) == NodeKind::And)
      .map(|&f| 1 + self.reverse_level(f).unwrap_or(0))
      .max()
      .unwrap_or(0)
  }

  // -- driver cursor plumbing (C8) --------------------------------------

  /// The id counter's current value. Used by the driver to tell newly
  /// created nodes (ids `>=` this, read at the start of a pass) from
  /// nodes that already existed when the pass began.
  #[inline]
  pub(crate) fn next_id_counter(&self) -> u32 {
    self.arena.peek_next_id()
  }

  #[inline]
  pub(crate) fn topo_cursor_start(&mut self) {
    self.active_cursor = Some(Cursor::at_start(&self.topo));
  }

  #[inline]
  pub(crate) fn topo_cursor_is_done(&self) -> bool {
    self.active_cursor.map(|c| c.is_done()).unwrap_or(true)
  }

  #[inline]
  pub(crate) fn topo_cursor_current(&self) -> Option<NodeId> {
    let handle = self.active_cursor?.current()?;
    self.topo.get(handle).copied()
  }

  #[inline]
  pub(crate) fn topo_cursor_advance(&mut self) {
    if let Some(cursor) = &mut self.active_cursor {
      cursor.advance(&self.topo);
    }
  }

  #[inline]
  pub(crate) fn topo_cursor_stop(&mut self) {
    self.active_cursor = None;
  }

  /// Appends every current AND node, in ascending id order, to `topo` and
  /// records the resulting handle on each. Called once at the start of a
  /// driver pass; `topo` is expected to be empty (the previous pass leaves
  /// it so after `reassign_ids_in_dfs_order`).
  pub(crate) fn seed_topo_order(&mut self) {
    let ids: Vec<NodeId> = self.arena.iter_kind(NodeKind::And).collect();
    for id in ids {
      let handle = self.topo.push_back(id);
      self.arena.get_mut(id).as_and_mut().topo_handle = Some(handle);
    }
  }

  /// Detaches each of `nodes`' `TopoHandle` (if any; a brand-new node has
  /// none yet) and re-inserts it next to wherever the driver's cursor
  /// currently is, preserving `nodes`' given order:
  ///
  /// - Cursor still on a live node: insert everything after it, chaining
  ///   forward so order is preserved.
  /// - Cursor on a removed-node placeholder (the overwhelmingly common
  ///   case, since a successful `replace` always drains the rewritten
  ///   root's fanouts and deletes it): insert everything immediately
  ///   before the placeholder's remembered successor, i.e. exactly where
  ///   the deleted node used to sit.
  /// - Cursor past the end: append at the list's tail.
  pub(crate) fn splice_affected_near_cursor(&mut self, nodes: &[NodeId]) {
    let relink = |this: &mut Self, node: NodeId| {
      if let Some(old) = this.arena.get(node).as_and().topo_handle {
        this.topo.remove(old, this.active_cursor.as_mut());
      }
    };

    if let Some(live) = self.active_cursor.and_then(|c| c.current()) {
      let mut anchor = live;
      for &node in nodes {
        relink(self, node);
        let handle = self.topo.insert_after(anchor, node);
        self.arena.get_mut(node).as_and_mut().topo_handle = Some(handle);
        anchor = handle;
      }
    } else if let Some(next) = self.active_cursor.and_then(|c| c.placeholder_next()) {
      for &node in nodes {
        relink(self, node);
        let handle = self.topo.insert_before(next, node);
        self.arena.get_mut(node).as_and_mut().topo_handle = Some(handle);
      }
    } else {
      for &node in nodes {
        relink(self, node);
        let handle = self.topo.push_back(node);
        self.arena.get_mut(node).as_and_mut().topo_handle = Some(handle);
      }
    }
  }

  /// End-of-pass bookkeeping: renumbers every surviving node into DFS
  /// (children-before-parents) order starting from the primary outputs and
  /// latch boundaries, recomputing `Level`, `Phase` and `IsExor` from
  /// scratch along the way. Reverse levels are left disarmed, matching the
  /// driver's end-of-pass contract.
  pub(crate) fn reassign_ids_in_dfs_order(&mut self) {
    let old_arena = std::mem::replace(&mut self.arena, Arena::new());
    self.hash = StructuralHashTable::new();
    self.topo = TopoList::new();
    self.active_cursor = None;

    let mut map: std::collections::HashMap<NodeId, NodeId> = std::collections::HashMap::new();
    map.insert(CONST1, self.arena.insert_constant1());
    for old_pi in old_arena.iter_kind(NodeKind::PrimaryInput) {
      map.insert(old_pi, self.arena.insert_primary_input());
    }

    let co_ids: Vec<NodeId> = old_arena
      .iter_ids()
      .filter(|&id| matches!(old_arena.get(id).kind(), NodeKind::PrimaryOutput | NodeKind::LatchBoundary))
      .collect();

    let mut order: Vec<NodeId> = Vec::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    for &co in &co_ids {
      let input = match old_arena.get(co) {
        NodeData::Co { input, .. } => *input,
        _ => unreachable!(),
      };
      dfs_postorder(&old_arena, input.node, &mut visited, &mut order);
    }
    // Safety net: any AND unreachable from every CO should already have
    // been removed by `cleanup`, but a stray one must still get an id.
    for id in old_arena.iter_kind(NodeKind::And) {
      dfs_postorder(&old_arena, id, &mut visited, &mut order);
    }

    for old_id in order {
      let old_data = old_arena.get(old_id).as_and();
      let c0 = Literal::new(map[&old_data.child0.node], old_data.child0.complement);
      let c1 = Literal::new(map[&old_data.child1.node], old_data.child1.complement);
      let persistent = old_data.persistent;
      let (c0, c1) = canonicalize(c0, c1);
      let level = 1 + self.level(c0.node).max(self.level(c1.node));
      let phase = self.phase(c0) & self.phase(c1);
      let new_id = self.arena.insert_and(AndData {
        child0: c0,
        child1: c1,
        level,
        reverse_level: None,
        phase,
        is_exor: false,
        fanouts: Default::default(),
        next_in_bucket: None,
        topo_handle: None,
        persistent,
        mark_a: false,
        mark_b: false,
        mark_c: false,
        handled: false,
      });
      self.add_fanout(c0.node, new_id);
      self.add_fanout(c1.node, new_id);
      self.hash.insert(new_id, &mut self.arena);
      self.recompute_is_exor(new_id);
      map.insert(old_id, new_id);
    }

    for &old_co in &co_ids {
      let (kind, old_input) = match old_arena.get(old_co) {
        NodeData::Co { kind, input } => (*kind, *input),
        _ => unreachable!(),
      };
      let new_input = Literal::new(map[&old_input.node], old_input.complement);
      let new_co = self.arena.insert_co(kind, new_input);
      self.add_fanout(new_input.node, new_co);
    }
  }
}

fn dfs_postorder(arena: &Arena, id: NodeId, visited: &mut HashSet<NodeId>, order: &mut Vec<NodeId>) {
  if arena.get(id).kind() != NodeKind::And || !visited.insert(id) {
    return;
  }
  let data = arena.get(id).as_and();
  let (c0, c1) = (data.child0.node, data.child1.node);
  dfs_postorder(arena, c0, visited, order);
  dfs_postorder(arena, c1, visited, order);
  order.push(id);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn and_is_commutative_and_idempotent() {
    let mut m = Manager::new();
    let a = m.new_primary_input();
    let b = m.new_primary_input();
    assert_eq!(m.and(a, b), m.and(b, a));
    assert_eq!(m.and(a, a), a);
    assert_eq!(m.and(a, a.negate()), m.const1().negate());
  }

  #[test]
  fn and_with_constants_short_circuits() {
    let mut m = Manager::new();
    let a = m.new_primary_input();
    let c1 = m.const1();
    assert_eq!(m.and(a, c1), a);
    assert_eq!(m.and(a, c1.negate()), c1.negate());
  }

  #[test]
  fn xor_is_commutative_and_self_inverse() {
    let mut m = Manager::new();
    let a = m.new_primary_input();
    let b = m.new_primary_input();
    assert_eq!(m.xor(a, b), m.xor(b, a));
    assert_eq!(m.xor(a, a), m.const1().negate());
    assert_eq!(m.xor(a, m.const1().negate()), a);
  }

  #[test]
  fn mux_degenerates_to_branches() {
    let mut m = Manager::new();
    let c1 = m.const1();
    let t = m.new_primary_input();
    let e = m.new_primary_input();
    assert_eq!(m.mux(c1, t, e), t);
    assert_eq!(m.mux(c1.negate(), t, e), e);
  }

  #[test]
  fn lookup_xor_finds_existing_pattern_but_not_fresh_inputs() {
    let mut m = Manager::new();
    let a = m.new_primary_input();
    let b = m.new_primary_input();
    let built = m.xor(a, b);
    assert_eq!(m.lookup_xor(a, b), Some(built));
    assert!(m.is_exor(built.node));

    let c = m.new_primary_input();
    let d = m.new_primary_input();
    assert_eq!(m.lookup_xor(c, d), None);
  }

  #[test]
  fn cleanup_removes_dangling_and_nodes() {
    let mut m = Manager::new();
    let a = m.new_primary_input();
    let b = m.new_primary_input();
    let g = m.and(a, b);
    m.remove_fanout(a.node, g.node);
    m.remove_fanout(b.node, g.node);
    assert_eq!(m.cleanup(), 1);
    assert!(!m.arena.contains(g.node));
  }
}
