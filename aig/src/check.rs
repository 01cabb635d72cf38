//! The invariant checker: verifies invariants 1-9 of the data model and
//! reports the first violation found.

use crate::manager::Manager;
use crate::node::{NodeData, NodeId, NodeKind};
use std::collections::HashSet;
use std::fmt;

/// The first invariant violation [`Manager::check`] found, if any.
#[derive(Debug)]
pub struct Violation {
  /// Which invariant (1-9, matching the data model's numbering) failed.
  pub invariant: u8,
  /// The node the violation was found at, if any single node is at fault.
  pub node: Option<NodeId>,
  /// A human-readable description.
  pub message: String,
}

impl fmt::Display for Violation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.node {
      Some(node) => write!(f, "invariant {} violated at {node:?}: {}", self.invariant, self.message),
      None => write!(f, "invariant {} violated: {}", self.invariant, self.message),
    }
  }
}

impl std::error::Error for Violation {}

impl Manager {
  /// Verifies invariants 1-9 of the data model, returning the first
  /// violation found.
  pub fn check(&self) -> Result<(), Violation> {
    self.check_structural_hashing()?;
    self.check_no_trivial_or_single_input_ands()?;
    self.check_acyclic()?;
    self.check_fanout_correctness()?;
    self.check_no_dangling_ands()?;
    self.check_levels()?;
    self.check_reverse_levels()?;
    self.check_phase_and_exor_freshness()?;
    Ok(())
  }

  fn and_ids(&self) -> Vec<NodeId> {
    self.arena.iter_kind(NodeKind::And).collect()
  }

  fn check_structural_hashing(&self) -> Result<(), Violation> {
    let mut seen: HashSet<(NodeId, bool, NodeId, bool)> = HashSet::new();
    for id in self.and_ids() {
      let data = self.arena.get(id).as_and();
      let key = (data.child0.node, data.child0.complement, data.child1.node, data.child1.complement);
      if !seen.insert(key) {
        return Err(Violation {
          invariant: 1,
          node: Some(id),
          message: "two AND nodes share the same canonicalized key".into(),
        });
      }
    }
    Ok(())
  }

  fn check_no_trivial_or_single_input_ands(&self) -> Result<(), Violation> {
    for id in self.and_ids() {
      let data = self.arena.get(id).as_and();
      if data.child0.node == data.child1.node {
        return Err(Violation {
          invariant: 2,
          node: Some(id),
          message: "AND node has two edges to the same child".into(),
        });
      }
      if data.child0.node == crate::hash::CONST1 || data.child1.node == crate::hash::CONST1 {
        return Err(Violation {
          invariant: 2,
          node: Some(id),
          message: "AND node has a constant child; should have been reduced".into(),
        });
      }
    }
    Ok(())
  }

  fn check_acyclic(&self) -> Result<(), Violation> {
    #[derive(Copy, Clone, Eq, PartialEq)]
    enum Mark {
      Visiting,
      Done,
    }
    let mut marks: std::collections::HashMap<NodeId, Mark> = std::collections::HashMap::new();
    for start in self.and_ids() {
      if marks.contains_key(&start) {
        continue;
      }
      let mut stack = vec![(start, false)];
      while let Some((id, expanded)) = stack.pop() {
        if expanded {
          marks.insert(id, Mark::Done);
          continue;
        }
        match marks.get(&id) {
          Some(Mark::Done) => continue,
          Some(Mark::Visiting) => {
            return Err(Violation { invariant: 4, node: Some(id), message: "cycle detected in AND subgraph".into() })
          }
          None => {}
        }
        marks.insert(id, Mark::Visiting);
        stack.push((id, true));
        if self.kind(id) == NodeKind::And {
          let data = self.arena.get(id).as_and();
          for child in [data.child0.node, data.child1.node] {
            if self.kind(child) == NodeKind::And {
              stack.push((child, false));
            }
          }
        }
      }
    }
    Ok(())
  }

  fn check_fanout_correctness(&self) -> Result<(), Violation> {
    for id in self.arena.iter_ids() {
      let data = self.arena.get(id);
      let children: Vec<NodeId> = match data {
        NodeData::And(and) => vec![and.child0.node, and.child1.node],
        NodeData::Co { input, .. } => vec![input.node],
        _ => continue,
      };
      for child in children {
        let count = self
          .arena
          .get(child)
          .fanouts()
          .map(|f| f.iter().filter(|&&x| x == id).count())
          .unwrap_or(0);
        if count != 1 {
          return Err(Violation {
            invariant: 5,
            node: Some(id),
            message: format!("{id:?} appears {count} times in {child:?}'s fanouts, expected exactly 1"),
          });
        }
      }
    }
    Ok(())
  }

  fn check_no_dangling_ands(&self) -> Result<(), Violation> {
    for id in self.and_ids() {
      if self.fanout_count(id) == 0 {
        return Err(Violation { invariant: 6, node: Some(id), message: "AND node has no fanouts".into() });
      }
    }
    Ok(())
  }

  fn check_levels(&self) -> Result<(), Violation> {
    for id in self.and_ids() {
      let data = self.arena.get(id).as_and();
      let expected = 1 + self.level(data.child0.node).max(self.level(data.child1.node));
      if data.level != expected {
        return Err(Violation {
          invariant: 7,
          node: Some(id),
          message: format!("stored level {} does not match expected {expected}", data.level),
        });
      }
    }
    Ok(())
  }

  fn check_reverse_levels(&self) -> Result<(), Violation> {
    if !self.reverse_armed {
      return Ok(());
    }
    for id in self.and_ids() {
      let expected = self.compute_reverse_level(id);
      let stored = self.reverse_level(id).unwrap_or(0);
      if stored != expected {
        return Err(Violation {
          invariant: 8,
          node: Some(id),
          message: format!("stored reverse level {stored} does not match expected {expected}"),
        });
      }
    }
    Ok(())
  }

  fn check_phase_and_exor_freshness(&self) -> Result<(), Violation> {
    for id in self.and_ids() {
      let data = self.arena.get(id).as_and();
      let expected_phase = self.phase(data.child0) & self.phase(data.child1);
      if data.phase != expected_phase {
        return Err(Violation { invariant: 9, node: Some(id), message: "stale Phase".into() });
      }
      if data.is_exor != self.detect_exor_pattern(id) {
        return Err(Violation { invariant: 9, node: Some(id), message: "stale IsExor".into() });
      }
    }
    Ok(())
  }
}
