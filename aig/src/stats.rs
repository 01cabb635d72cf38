//! Per-pass counters, the opaque `Stats` record called for in the design
//! notes in place of the source's process-wide statistics globals.

use std::time::Duration;

/// Counters accumulated by a [`crate::Manager`] during a single refactoring
/// pass. Reset by [`crate::driver::RefactorDriver::run_pass`] before it
/// starts, mirroring how `Abc_ManRef_t`'s statistics fields are reset per
/// call in the source this engine is modelled on.
#[derive(Default, Debug, Clone, Copy)]
pub struct Stats {
  /// Nodes whose MFFC was replaced by a smaller factored form.
  pub nodes_rewritten: u32,
  /// Nodes considered by the driver, whether or not rewritten.
  pub nodes_considered: u32,
  /// AND-node count saved by every committed rewrite this pass.
  pub literals_saved: u32,
  /// Non-stale pops applied by the forward-level heap drain.
  pub level_updates: u32,
  /// Non-stale pops applied by the reverse-level heap drain.
  pub reverse_updates: u32,
  /// AND nodes deleted via MFFC garbage collection.
  pub nodes_deleted: u32,
  /// Total time spent inside [`crate::driver::RefactorDriver::run_pass`].
  pub pass_duration: Duration,
}

impl Stats {
  /// Resets every counter to zero, preserving no history across passes.
  #[inline]
  pub fn clear(&mut self) {
    *self = Stats::default();
  }
}
