//! Pluggable observer hooks, used in place of a logging framework so the
//! engine stays free to run inside `#![no_std]`-adjacent embeddings and so
//! tests can assert on exactly which hooks fired.

use crate::node::NodeId;

/// Observer hooks fired around manager, replacement, and driver operations.
///
/// Every method has a default no-op body, so implementors only override the
/// hooks they care about. Object-safe so a `Box<dyn Tracker>` can be swapped
/// into a [`crate::Manager`] at runtime.
#[allow(unused_variables)]
pub trait Tracker {
  /// Fired when a new AND node is created and hashed in.
  #[inline]
  fn node_created(&mut self, node: NodeId) {}
  /// Fired when an AND node is deleted as part of MFFC garbage collection.
  #[inline]
  fn node_deleted(&mut self, node: NodeId) {}
  /// Fired once per top-level [`crate::Manager::replace`] call, before any
  /// mutation.
  #[inline]
  fn replace_start(&mut self, old: NodeId) {}
  /// Fired once per top-level `replace` call, after the graph is quiescent
  /// again.
  #[inline]
  fn replace_end(&mut self, old: NodeId) {}
  /// Fired once per driver pass, before the first node is visited.
  #[inline]
  fn pass_start(&mut self) {}
  /// Fired once per driver pass, with the final [`crate::stats::Stats`].
  #[inline]
  fn pass_end(&mut self, stats: &crate::stats::Stats) {}
}

/// A tracker that does nothing; the default attached to a new
/// [`crate::Manager`].
#[derive(Default)]
pub struct NullTracker;

impl Tracker for NullTracker {}

/// A tracker that prints the free-form human-readable counters named in the
/// external-interfaces contract to stdout. This output is not part of the
/// contract surface and nothing in this crate parses it back.
#[derive(Default)]
pub struct PrintTracker;

impl Tracker for PrintTracker {
  fn pass_end(&mut self, stats: &crate::stats::Stats) {
    println!(
      "node_rewritten = {}, level_updates = {}, reverse_updates = {}, elapsed = {:?}",
      stats.nodes_rewritten, stats.level_updates, stats.reverse_updates, stats.pass_duration
    );
  }
}
