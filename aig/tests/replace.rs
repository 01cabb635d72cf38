//! End-to-end scenarios for the replacement engine and the refactoring
//! driver built on top of it.

use std::collections::{HashMap, HashSet};

use aig::{
  Candidate, CutEvaluator, Literal, Manager, NoopCutEvaluator, NodeId, RefactorConfig,
  RefactorDriver,
};
use assert_matches::assert_matches;
use rstest::rstest;
use testresult::TestResult;

#[rstest]
#[case::absorb_into_a(true)]
#[case::absorb_into_b(false)]
fn trivial_absorption(#[case] absorb_into_a: bool) {
  let mut m = Manager::new();
  let a = m.new_primary_input();
  let b = m.new_primary_input();
  let g1 = m.and(a, b);
  let po = m.new_primary_output(g1);
  let replacement = if absorb_into_a { a } else { b };

  m.replace(Literal::positive(g1.node), replacement, true).unwrap();

  assert!(!m.contains(g1.node));
  assert!(m.contains(a.node));
  assert!(m.contains(b.node));
  assert_eq!(m.primary_output_input(po), replacement);
  assert_eq!(m.hash_len(), 0);
  m.check().unwrap();
}

#[test]
fn collision_cascade_merges_into_existing_node() {
  let mut m = Manager::new();
  let a = m.new_primary_input();
  let b = m.new_primary_input();
  let c = m.new_primary_input();
  let g1 = m.and(a, b);
  let g2 = m.and(g1, c);
  let g3 = m.and(a, c);
  let po1 = m.new_primary_output(g2);
  let po2 = m.new_primary_output(g3);

  // g2's fanins re-hash to (a, c), colliding with the already-present g3;
  // g2 is folded into g3 and g1 is deleted as dangling once g2 is gone.
  m.replace(Literal::positive(g1.node), a, true).unwrap();

  assert!(!m.contains(g1.node));
  assert!(!m.contains(g2.node));
  assert!(m.contains(g3.node));
  assert_eq!(m.primary_output_input(po1), m.primary_output_input(po2));
  assert_eq!(m.primary_output_input(po1).node, g3.node);
  m.check().unwrap();
}

#[test]
fn xor_pattern_lookup_finds_existing_but_not_fresh_inputs() -> TestResult {
  let mut m = Manager::new();
  let a = m.new_primary_input();
  let b = m.new_primary_input();
  let x = m.xor(a, b);
  let hash_len_before = m.hash_len();

  let found = m.lookup_xor(a, b).ok_or("expected to find the existing xor pattern")?;
  assert_eq!(found, x);
  assert_eq!(m.hash_len(), hash_len_before, "a pure lookup must not mutate the hash table");

  let c = m.new_primary_input();
  let d = m.new_primary_input();
  assert_matches!(m.lookup_xor(c, d), None);
  Ok(())
}

#[test]
fn level_shrinks_when_a_chain_link_is_absorbed_into_a_primary_input() {
  let mut m = Manager::new();
  let p0 = m.new_primary_input();
  let p1 = m.new_primary_input();
  let p2 = m.new_primary_input();
  let p3 = m.new_primary_input();
  let p4 = m.new_primary_input();

  let n1 = m.and(p0, p1);
  let n2 = m.and(n1, p2);
  let n3 = m.and(n2, p3);
  let g = m.and(n3, p4);
  m.new_primary_output(g);
  assert_eq!(m.level(g.node), 4);

  // n1 is the first link; replacing it by one of its own fanins removes
  // exactly one level from everything downstream.
  m.replace(Literal::positive(n1.node), p0, true).unwrap();

  assert!(!m.contains(n1.node));
  assert_eq!(m.level(g.node), 3);
  m.check().unwrap();
}

#[test]
fn reverse_level_repairs_after_replacing_a_node_near_a_primary_output() {
  let mut m = Manager::new();
  let p0 = m.new_primary_input();
  let p1 = m.new_primary_input();
  let p2 = m.new_primary_input();
  let n1 = m.and(p0, p1);
  let g = m.and(n1, p2);
  let po = m.new_primary_output(g);
  m.arm_reverse_levels();

  assert_eq!(m.reverse_level(g.node), Some(0));
  assert_eq!(m.reverse_level(n1.node), Some(1));

  // g sits directly on a PO; replacing it by one of its own fanins leaves
  // that fanin as the new PO driver and, with g gone, it has no AND
  // fanouts left either.
  m.replace(Literal::positive(g.node), n1, true).unwrap();

  assert!(!m.contains(g.node));
  assert_eq!(m.primary_output_input(po), n1);
  assert_eq!(m.reverse_level(n1.node), Some(0));
  m.check().unwrap();
}

/// Logs every node it is asked about, and on one specific target builds a
/// brand-new AND node (simulating a cut evaluator materializing its
/// replacement) before proposing it as the candidate.
struct LoggingEvaluator {
  target: NodeId,
  other_input: Literal,
  calls: Vec<NodeId>,
  created: Option<NodeId>,
}

impl CutEvaluator for LoggingEvaluator {
  fn evaluate(&mut self, manager: &mut Manager, node: NodeId, _min_saved: usize) -> Option<Candidate> {
    self.calls.push(node);
    if node != self.target {
      return None;
    }
    let fresh = manager.and(Literal::positive(self.target), self.other_input);
    self.created = Some(fresh.node);
    Some(Candidate { root: fresh, gain: 1 })
  }
}

#[test]
fn topological_cursor_visits_every_pre_existing_node_exactly_once() {
  let mut m = Manager::new();
  let a = m.new_primary_input();
  let b = m.new_primary_input();
  let c = m.new_primary_input();
  let g1 = m.and(a, b);
  let g2 = m.and(g1, c);
  m.new_primary_output(g2);

  let mut evaluator =
    LoggingEvaluator { target: g1.node, other_input: c, calls: Vec::new(), created: None };
  let mut driver = RefactorDriver::new();
  let report = driver
    .run_pass(&mut m, &mut evaluator, &RefactorConfig { node_size_max: 0, ..RefactorConfig::default() })
    .unwrap();

  assert_eq!(report.nodes_rewritten, 1);
  assert!(!report.aborted);
  assert!(report.check_violation.is_none());

  let visited: HashSet<NodeId> = evaluator.calls.iter().copied().collect();
  assert_eq!(visited.len(), evaluator.calls.len(), "no node was asked about twice");

  let created = evaluator.created.expect("evaluator should have built its replacement");
  assert!(
    !evaluator.calls.contains(&created),
    "a node created during the pass must not be re-evaluated in the same pass"
  );

  let mut seen_counts: HashMap<NodeId, u32> = HashMap::new();
  for node in &evaluator.calls {
    *seen_counts.entry(*node).or_insert(0) += 1;
  }
  assert!(seen_counts.values().all(|&count| count == 1));
}

#[test]
fn driver_pass_with_no_evaluator_opinion_is_a_clean_no_op() {
  let mut m = Manager::new();
  let a = m.new_primary_input();
  let b = m.new_primary_input();
  let g1 = m.and(a, b);
  m.new_primary_output(g1);

  let mut driver = RefactorDriver::new();
  let report = driver.run_pass(&mut m, &mut NoopCutEvaluator, &RefactorConfig::default()).unwrap();

  assert_eq!(report.nodes_rewritten, 0);
  assert!(m.contains(g1.node));
  m.check().unwrap();
}

#[test]
fn replace_with_self_is_a_no_op_and_check_still_passes() {
  let mut m = Manager::new();
  let a = m.new_primary_input();
  let b = m.new_primary_input();
  let g1 = m.and(a, b);
  m.new_primary_output(g1);

  m.replace(Literal::positive(g1.node), g1, true).unwrap();

  assert!(m.contains(g1.node));
  m.check().unwrap();
}
