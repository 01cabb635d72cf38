//! The node/edge/literal data model shared by every other module.

use aig_topo::ListHandle;
use hashlink::LinkedHashSet;
use std::fmt;

/// Stable identity of a node. Monotonically assigned and never reused within
/// the lifetime of a [`crate::Manager`], even though the arena slot backing a
/// deleted node is reclaimed.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
  #[inline]
  pub(crate) fn index(self) -> usize {
    self.0 as usize
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "n{}", self.0)
  }
}

/// A node together with a one-bit complement.
///
/// # Examples
///
/// ```
/// use aig::Manager;
///
/// let mut m = Manager::new();
/// let a = m.new_primary_input();
/// assert_eq!(a.negate().negate(), a);
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Literal {
  pub node: NodeId,
  pub complement: bool,
}

impl Literal {
  /// Builds a literal from a node id and complement bit.
  #[inline]
  pub fn new(node: NodeId, complement: bool) -> Self {
    Self { node, complement }
  }

  /// The uncomplemented literal for `node`.
  #[inline]
  pub fn positive(node: NodeId) -> Self {
    Self::new(node, false)
  }

  /// This literal with its complement bit flipped.
  #[inline]
  pub fn negate(self) -> Self {
    Self { node: self.node, complement: !self.complement }
  }
}

/// What kind of object a [`NodeId`] refers to.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum NodeKind {
  /// A primary input. Always has `Level == 0` and `Phase == false`.
  PrimaryInput,
  /// A primary output: one input edge, no fanouts.
  PrimaryOutput,
  /// A latch boundary (next-state input or current-state output): one
  /// input edge, no fanouts. Tracked the same way a primary output is
  /// except the driver never rewrites through it as a PI-like source.
  LatchBoundary,
  /// A two-input AND node, the only kind structural hashing applies to.
  And,
  /// The single always-present logical constant-1 object at slot 0.
  Constant1,
}

/// Per-node data held by [`crate::arena::Arena`]. Everything outside the
/// arena (hash buckets, fanout lists, heaps, the topological list) refers to
/// nodes only by [`NodeId`] or [`ListHandle`] — the arena is the sole owner.
#[derive(Debug)]
pub enum NodeData {
  /// The constant-1 object; its fanouts are every node that uses it as a
  /// fanin (directly, as opposed to via the `Literal::complement` bit).
  Constant1 { fanouts: LinkedHashSet<NodeId> },
  /// A primary input.
  PrimaryInput { fanouts: LinkedHashSet<NodeId> },
  /// A primary output or latch boundary: exactly one input edge.
  Co { kind: CoKind, input: Literal },
  /// A two-input AND node.
  And(AndData),
}

/// Distinguishes the two single-input node kinds so [`NodeData::Co`] does not
/// need two near-identical variants.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CoKind {
  /// Primary output.
  PrimaryOutput,
  /// Latch boundary.
  LatchBoundary,
}

/// Data carried by every two-input AND node.
#[derive(Debug)]
pub struct AndData {
  pub child0: Literal,
  pub child1: Literal,
  pub level: u32,
  pub reverse_level: Option<u32>,
  pub phase: bool,
  pub is_exor: bool,
  pub fanouts: LinkedHashSet<NodeId>,
  pub next_in_bucket: Option<NodeId>,
  pub topo_handle: Option<ListHandle>,
  pub persistent: bool,
  /// Set while queued in the forward-level heap; stale heap entries whose
  /// `mark_a` has since been cleared are skipped on pop.
  pub mark_a: bool,
  /// Same role as `mark_a` for the reverse-level heap.
  pub mark_b: bool,
  /// Set while queued in the driver's topological-affected-set.
  pub mark_c: bool,
  /// Set once the driver has processed this node in the current pass.
  pub handled: bool,
}

impl NodeData {
  /// This node's [`NodeKind`].
  #[inline]
  pub fn kind(&self) -> NodeKind {
    match self {
      NodeData::Constant1 { .. } => NodeKind::Constant1,
      NodeData::PrimaryInput { .. } => NodeKind::PrimaryInput,
      NodeData::Co { kind: CoKind::PrimaryOutput, .. } => NodeKind::PrimaryOutput,
      NodeData::Co { kind: CoKind::LatchBoundary, .. } => NodeKind::LatchBoundary,
      NodeData::And(_) => NodeKind::And,
    }
  }

  /// Borrows this node's fanout set, if it has one (AND, PI, Constant1).
  pub fn fanouts(&self) -> Option<&LinkedHashSet<NodeId>> {
    match self {
      NodeData::Constant1 { fanouts } => Some(fanouts),
      NodeData::PrimaryInput { fanouts } => Some(fanouts),
      NodeData::And(data) => Some(&data.fanouts),
      NodeData::Co { .. } => None,
    }
  }

  /// Mutably borrows this node's fanout set, if it has one.
  pub fn fanouts_mut(&mut self) -> Option<&mut LinkedHashSet<NodeId>> {
    match self {
      NodeData::Constant1 { fanouts } => Some(fanouts),
      NodeData::PrimaryInput { fanouts } => Some(fanouts),
      NodeData::And(data) => Some(&mut data.fanouts),
      NodeData::Co { .. } => None,
    }
  }

  /// Unwraps a shared reference to the AND payload; panics on any other
  /// kind since callers only reach this after checking [`NodeData::kind`].
  #[inline]
  pub fn as_and(&self) -> &AndData {
    match self {
      NodeData::And(data) => data,
      _ => panic!("BUG: as_and called on a non-AND node"),
    }
  }

  /// Unwraps a mutable reference to the AND payload.
  #[inline]
  pub fn as_and_mut(&mut self) -> &mut AndData {
    match self {
      NodeData::And(data) => data,
      _ => panic!("BUG: as_and_mut called on a non-AND node"),
    }
  }
}
