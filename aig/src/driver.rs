//! The refactoring driver (C8): one topologically-ordered pass over every
//! AND node, asking an external cut evaluator for a smaller equivalent at
//! each one and committing it through `replace` (C6) when it is found.
//!
//! Cut enumeration and Boolean factoring are out of scope here; the driver
//! only defines the boundary (`CutEvaluator`) an external implementation of
//! those plugs into. Building and scoring the replacement candidate are
//! collapsed into a single trait call, since the two steps only differ by
//! state that lives entirely on the evaluator's side of that boundary.

use crate::error::AigError;
use crate::manager::Manager;
use crate::node::{Literal, NodeId, NodeKind};
use crate::stats::Stats;
use std::collections::HashSet;
use std::time::Instant;

/// Knobs bounding how much work the driver spends per node and per pass.
#[derive(Clone, Debug)]
pub struct RefactorConfig {
  /// Skip nodes whose MFFC is smaller than this (not worth cutting).
  pub node_size_max: usize,
  /// Upper bound on the cut size the evaluator is asked to consider.
  pub cone_size_max: usize,
  /// A candidate is only applied if it saves at least this many literals.
  pub min_saved: usize,
  /// Nodes with more fanouts than this are skipped; rewriting them risks
  /// paying more in new structure than is saved at any single fanout.
  pub fanout_cap: usize,
  /// Whether to maintain `Level`/`ReverseLevel` during the pass at all.
  pub update_levels: bool,
}

impl Default for RefactorConfig {
  #[inline]
  fn default() -> Self {
    Self { node_size_max: 4, cone_size_max: 16, min_saved: 1, fanout_cap: 1000, update_levels: true }
  }
}

/// A replacement the evaluator proposes for some node: a literal already
/// built in the AIG (via the evaluator's own calls to `Manager`'s
/// constructors) together with the literal-count reduction it claims.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Candidate {
  /// The literal that should replace the node passed to `evaluate`.
  pub root: Literal,
  /// Claimed literal-count savings; the driver trusts this number rather
  /// than recomputing it.
  pub gain: usize,
}

/// The boundary between the driver and whatever decides *what* to rewrite a
/// node to. An implementation typically enumerates cuts rooted at `node`,
/// factors the best one, and materializes the result by calling `Manager`'s
/// `and`/`or`/`xor`/`mux` constructors before returning the resulting root.
pub trait CutEvaluator {
  /// Proposes a replacement for `node`, or `None` if nothing beats
  /// `min_saved`. Receives `&mut Manager` so it may construct new nodes;
  /// it must not call `Manager::replace` itself, nor replace anything
  /// other than by returning a `Candidate`. Any pre-existing node it
  /// reuses as a fanin must come from `node`'s own transitive fanin cone
  /// (as every cut is, by construction) — reaching into structure the
  /// driver has not visited yet in this pass is outside the contract.
  fn evaluate(&mut self, manager: &mut Manager, node: NodeId, min_saved: usize) -> Option<Candidate>;
}

/// A [`CutEvaluator`] that never proposes anything. Useful for exercising
/// the driver's traversal and bookkeeping in isolation.
#[derive(Default)]
pub struct NoopCutEvaluator;

impl CutEvaluator for NoopCutEvaluator {
  fn evaluate(&mut self, _manager: &mut Manager, _node: NodeId, _min_saved: usize) -> Option<Candidate> {
    None
  }
}

/// Summary of one `RefactorDriver::run_pass` call.
#[derive(Clone, Debug)]
pub struct PassReport {
  /// Counters accumulated during this pass (a snapshot, not a delta).
  pub stats: Stats,
  /// How many nodes were actually replaced.
  pub nodes_rewritten: usize,
  /// How many nodes the evaluator was asked about.
  pub nodes_considered: usize,
  /// Set if the post-pass invariant check found a violation; the pass
  /// still committed everything it did, this is purely diagnostic.
  pub check_violation: Option<String>,
  /// Set if a `replace` call inside this pass returned an error and the
  /// pass stopped at that iteration boundary instead of walking the rest
  /// of the topological order. The graph is left quiescent either way.
  pub aborted: bool,
}

/// Runs one topologically-ordered refactoring pass.
#[derive(Default)]
pub struct RefactorDriver;

impl RefactorDriver {
  /// Creates a driver. Stateless; exists for API symmetry with the rest
  /// of the crate and room for future per-pass configuration.
  #[inline]
  pub fn new() -> Self {
    Self
  }

  /// Runs one pass: snapshot the current AND population in id order,
  /// walk it front to back asking `evaluator` for a smaller equivalent at
  /// each node, and commit accepted candidates through `replace`.
  ///
  /// At the end of a successful pass every node's `Handled` bit is clear,
  /// ids have been renumbered into DFS order, reverse levels (if they were
  /// armed) are disarmed, and the manager's invariants are checked.
  pub fn run_pass(
    &mut self,
    manager: &mut Manager,
    evaluator: &mut dyn CutEvaluator,
    config: &RefactorConfig,
  ) -> Result<PassReport, AigError> {
    let started = Instant::now();
    manager.stats_mut().clear();
    manager.tracker_pass_start();
    let max_id_at_start = manager.next_id_counter();

    manager.seed_topo_order();
    manager.topo_cursor_start();

    let mut nodes_rewritten = 0usize;
    let mut nodes_considered = 0usize;
    let mut aborted = false;

    while !manager.topo_cursor_is_done() {
      let Some(node) = manager.topo_cursor_current() else {
        manager.topo_cursor_advance();
        continue;
      };

      match self.process_node(manager, evaluator, config, node, max_id_at_start) {
        Ok(NodeOutcome::Skipped) => {}
        Ok(NodeOutcome::Considered) => {
          nodes_considered += 1;
          manager.stats_mut().nodes_considered += 1;
        }
        Ok(NodeOutcome::Rewritten) => {
          nodes_considered += 1;
          nodes_rewritten += 1;
          manager.stats_mut().nodes_considered += 1;
          manager.stats_mut().nodes_rewritten += 1;
        }
        Err(_) => {
          // `replace` leaves the graph quiescent even on error;
          // stop walking the rest of the order at this iteration
          // boundary rather than pressing on past a node whose
          // rewrite did not commit.
          aborted = true;
          break;
        }
      }

      manager.topo_cursor_advance();
    }

    manager.topo_cursor_stop();

    manager.cleanup();
    manager.reassign_ids_in_dfs_order();
    if manager.reverse_levels_armed() {
      manager.disarm_reverse_levels();
    }

    manager.stats_mut().pass_duration = started.elapsed();
    let check_violation = manager.check().err().map(|v| v.to_string());

    let stats = *manager.stats();
    manager.tracker_pass_end();
    Ok(PassReport { stats, nodes_rewritten, nodes_considered, check_violation, aborted })
  }

  fn process_node(
    &mut self,
    manager: &mut Manager,
    evaluator: &mut dyn CutEvaluator,
    config: &RefactorConfig,
    node: NodeId,
    max_id_at_start: u32,
  ) -> Result<NodeOutcome, AigError> {
    if !manager.contains(node) || manager.kind(node) != NodeKind::And {
      return Ok(NodeOutcome::Skipped);
    }
    if manager.is_handled(node) {
      return Ok(NodeOutcome::Skipped);
    }

    // Every surviving AND node gets its level settled and its Handled
    // bit set exactly once per pass, whether or not it goes on to be
    // considered for rewriting: later lazy updates downstream depend on
    // every fanin already being in final form.
    if config.update_levels {
      manager.update_level_lazy(node);
    }
    manager.mark_handled(node);

    if node.index() as u32 > max_id_at_start {
      // Created earlier in this same pass; already in final form.
      return Ok(NodeOutcome::Skipped);
    }
    if manager.is_persistent(node) {
      return Ok(NodeOutcome::Skipped);
    }
    if manager.fanout_count(node) > config.fanout_cap {
      return Ok(NodeOutcome::Skipped);
    }
    if mffc_size(manager, node) < config.node_size_max {
      return Ok(NodeOutcome::Skipped);
    }

    let Some(candidate) = evaluator.evaluate(manager, node, config.min_saved) else {
      return Ok(NodeOutcome::Considered);
    };
    if candidate.gain < config.min_saved {
      return Ok(NodeOutcome::Considered);
    }

    let root_lit = Literal::positive(node);
    manager.replace(root_lit, candidate.root, config.update_levels)?;
    manager.stats_mut().literals_saved += candidate.gain as u32;

    if config.update_levels {
      self.commit_affected_set(manager, candidate.root.node);
    }

    Ok(NodeOutcome::Rewritten)
  }

  /// DFS over `root`'s AND fanins, stopping at `Handled` nodes, primary
  /// inputs, the constant, or the cursor's own node, and splices each
  /// newly-relevant node into working position near the cursor,
  /// preserving the DFS visitation order.
  fn commit_affected_set(&mut self, manager: &mut Manager, root: NodeId) {
    let boundary = manager.topo_cursor_current();
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut order: Vec<NodeId> = Vec::new();
    collect_affected(manager, root, boundary, &mut seen, &mut order);
    manager.splice_affected_near_cursor(&order);
  }
}

enum NodeOutcome {
  Skipped,
  Considered,
  Rewritten,
}

fn mffc_size(manager: &Manager, node: NodeId) -> usize {
  // A cheap stand-in for a full MFFC count: the node itself counts as
  // size 1, plus every AND fanin it is the sole fanout of, recursively.
  fn go(manager: &Manager, node: NodeId, seen: &mut HashSet<NodeId>) -> usize {
    if manager.kind(node) != NodeKind::And || !seen.insert(node) {
      return 0;
    }
    let mut size = 1;
    for child in manager.fanins(node) {
      if manager.kind(child) == NodeKind::And && manager.fanout_count(child) == 1 {
        size += go(manager, child, seen);
      }
    }
    size
  }
  let mut seen = HashSet::new();
  go(manager, node, &mut seen)
}

fn collect_affected(
  manager: &Manager,
  node: NodeId,
  boundary: Option<NodeId>,
  seen: &mut HashSet<NodeId>,
  order: &mut Vec<NodeId>,
) {
  if manager.kind(node) != NodeKind::And {
    return;
  }
  if Some(node) == boundary {
    return;
  }
  if manager.is_handled(node) {
    return;
  }
  if !seen.insert(node) {
    return;
  }
  for child in manager.fanins(node) {
    collect_affected(manager, child, boundary, seen, order);
  }
  order.push(node);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Manager;

  #[test]
  fn noop_evaluator_touches_nothing() {
    let mut m = Manager::new();
    let a = m.new_primary_input();
    let b = m.new_primary_input();
    let c = m.new_primary_input();
    let g1 = m.and(a, b);
    let g2 = m.and(g1, c);
    m.new_primary_output(g2);

    let mut driver = RefactorDriver::new();
    let report = driver.run_pass(&mut m, &mut NoopCutEvaluator, &RefactorConfig::default()).unwrap();

    assert_eq!(report.nodes_rewritten, 0);
    assert!(!report.aborted);
    assert!(report.check_violation.is_none());
    assert!(m.check().is_ok());
  }

  struct ReplaceWithInput {
    target: NodeId,
    replacement: Literal,
  }

  impl CutEvaluator for ReplaceWithInput {
    fn evaluate(&mut self, _manager: &mut Manager, node: NodeId, _min_saved: usize) -> Option<Candidate> {
      if node == self.target {
        Some(Candidate { root: self.replacement, gain: 1 })
      } else {
        None
      }
    }
  }

  #[test]
  fn accepted_candidate_is_committed_and_pass_leaves_a_clean_graph() {
    let mut m = Manager::new();
    let a = m.new_primary_input();
    let b = m.new_primary_input();
    let g1 = m.and(a, b);
    let po = m.new_primary_output(g1);

    let mut evaluator = ReplaceWithInput { target: g1.node, replacement: a };
    let mut driver = RefactorDriver::new();
    let report = driver.run_pass(&mut m, &mut evaluator, &RefactorConfig { node_size_max: 0, ..RefactorConfig::default() }).unwrap();

    assert_eq!(report.nodes_rewritten, 1);
    assert!(!report.aborted);
    assert_eq!(m.primary_output_input(po), a);
    assert!(m.check().is_ok());
  }

  #[test]
  fn pass_over_an_empty_graph_is_a_no_op() {
    let mut m = Manager::new();
    let mut driver = RefactorDriver::new();
    let report = driver.run_pass(&mut m, &mut NoopCutEvaluator, &RefactorConfig::default()).unwrap();
    assert_eq!(report.nodes_considered, 0);
    assert!(m.check().is_ok());
  }
}
