//! The replacement engine (C6): atomic substitution of one node by another,
//! with cascading collision handling.

use crate::error::AigError;
use crate::manager::Manager;
use crate::node::{Literal, NodeData, NodeId, NodeKind};

impl Manager {
  /// Atomically substitutes every use of `old` (which must be an
  /// uncomplemented literal over an AND node) by `new_lit`, deleting
  /// everything that becomes dangling as a consequence. On success every
  /// invariant in the data model holds, levels included if
  /// `update_levels` is set.
  ///
  /// `replace(x, x, _)` is a no-op, per the round-trip laws.
  pub fn replace(&mut self, old: Literal, new_lit: Literal, update_levels: bool) -> Result<(), AigError> {
    if old.complement {
      return Err(AigError::ContractViolation("replace: `old` must not be complemented"));
    }
    if self.kind(old.node) != NodeKind::And {
      return Err(AigError::ContractViolation("replace: `old` must name an AND node"));
    }
    if !self.pending_old.is_empty() || !self.pending_new.is_empty() {
      return Err(AigError::ContractViolation("replace: re-entrant call"));
    }

    self.tracker.replace_start(old.node);

    if old.node == new_lit.node && !new_lit.complement {
      self.tracker.replace_end(old.node);
      return Ok(());
    }

    self.pending_old.push(old.node);
    self.pending_new.push(new_lit);

    let result = self.drain_replace_stacks(update_levels);

    self.pending_old.clear();
    self.pending_new.clear();

    if result.is_ok() && update_levels {
      self.drain_fwd_heap();
      self.drain_rev_heap();
    }

    self.tracker.replace_end(old.node);
    result
  }

  fn drain_replace_stacks(&mut self, update_levels: bool) -> Result<(), AigError> {
    while let Some(o) = self.pending_old.pop() {
      let n = self.pending_new.pop().expect("BUG: pending_old/pending_new out of lock-step");

      if !self.arena.contains(o) {
        // Became dangling and was deleted before its turn came up.
        continue;
      }
      if o == n.node && !n.complement {
        // A cascade resolved back to an identity replacement.
        continue;
      }
      if self.fanout_count(o) == 0 {
        continue;
      }

      self.splice(o, n, update_levels)?;
    }
    Ok(())
  }

  fn splice(&mut self, o: NodeId, n: Literal, update_levels: bool) -> Result<(), AigError> {
    let fanouts: Vec<NodeId> = self
      .arena
      .get(o)
      .fanouts()
      .map(|set| set.iter().copied().collect())
      .unwrap_or_default();

    for f in fanouts {
      if !self.arena.contains(f) {
        continue;
      }
      match self.kind(f) {
        NodeKind::PrimaryOutput | NodeKind::LatchBoundary => {
          self.splice_co_fanout(f, o, n, update_levels);
        }
        NodeKind::And => {
          self.splice_and_fanout(f, o, n, update_levels)?;
        }
        other => panic!("BUG: {o:?} has a fanout of unexpected kind {other:?}"),
      }
    }

    if self.arena.contains(o) && self.fanout_count(o) == 0 {
      self.delete_mffc(o);
    }
    Ok(())
  }

  fn splice_co_fanout(&mut self, f: NodeId, o: NodeId, n: Literal, update_levels: bool) {
    let old_edge_complement = match self.arena.get(f) {
      NodeData::Co { input, .. } => input.complement,
      _ => panic!("BUG: {f:?} is not a CO node"),
    };
    let new_input = Literal::new(n.node, old_edge_complement ^ n.complement);

    let old_reverse_level = self.reverse_level(o);
    match self.arena.get_mut(f) {
      NodeData::Co { input, .. } => *input = new_input,
      _ => unreachable!(),
    }
    self.remove_fanout(o, f);
    self.add_fanout(n.node, f);

    if update_levels && self.reverse_armed && self.kind(n.node) == NodeKind::And {
      let rl = old_reverse_level.unwrap_or(0);
      self.arena.get_mut(n.node).as_and_mut().reverse_level = Some(rl);
      self.schedule_rev(n.node);
    }
  }

  fn splice_and_fanout(&mut self, f: NodeId, o: NodeId, n: Literal, update_levels: bool) -> Result<(), AigError> {
    let (child0, child1) = {
      let data = self.arena.get(f).as_and();
      (data.child0, data.child1)
    };
    let (changed_side_is_0, changed, other) = if child0.node == o {
      (true, child0, child1)
    } else if child1.node == o {
      (false, child1, child0)
    } else {
      panic!("BUG: {f:?} was listed as a fanout of {o:?} but does not reference it");
    };

    let new_child = Literal::new(n.node, changed.complement ^ n.complement);

    if let Some(existing) = self.hash.lookup(new_child, other, &self.arena) {
      // Collision: `f`'s prospective new key already names `existing`.
      // Cascade: replace `f` by `existing` instead of mutating it now.
      self.pending_old.push(f);
      self.pending_new.push(existing);
      return Ok(());
    }

    if self.would_create_short_cycle(f, [new_child.node, other.node]) {
      return Err(AigError::InvariantBroken("replace would create a 1- or 2-step cycle through the spliced node"));
    }

    self.hash.remove(f, &mut self.arena);
    self.remove_fanout(o, f);
    {
      let data = self.arena.get_mut(f).as_and_mut();
      if changed_side_is_0 {
        data.child0 = new_child;
      } else {
        data.child1 = new_child;
      }
    }
    self.add_fanout(new_child.node, f);
    self.hash.insert(f, &mut self.arena);

    self.recompute_phase(f);
    self.recompute_is_exor(f);

    if update_levels {
      self.schedule_fwd(f);
      self.schedule_rev(f);
    }

    let parents: Vec<NodeId> = self.arena.get(f).as_and().fanouts.iter().copied().collect();
    for parent in parents {
      if self.kind(parent) == NodeKind::And {
        self.recompute_is_exor(parent);
      }
    }

    Ok(())
  }

  fn would_create_short_cycle(&self, f: NodeId, new_children: [NodeId; 2]) -> bool {
    for c in new_children {
      if c == f {
        return true;
      }
      if let NodeData::And(data) = self.arena.get(c) {
        if data.child0.node == f || data.child1.node == f {
          return true;
        }
      }
    }
    false
  }
}

#[cfg(test)]
mod tests {
  use crate::Manager;

  #[test]
  fn trivial_absorption() {
    let mut m = Manager::new();
    let a = m.new_primary_input();
    let b = m.new_primary_input();
    let g1 = m.and(a, b);
    let po = m.new_primary_output(g1);

    m.replace(g1, a, true).unwrap();

    assert_eq!(m.fanout_count(g1.node), 0);
    assert!(m.check().is_ok());
    assert_eq!(m.hash_len(), 0);
    assert_eq!(m.primary_output_input(po), a);
    assert!(!m.contains(g1.node));
    assert!(m.contains(b.node));
  }

  #[test]
  fn collision_cascade() {
    let mut m = Manager::new();
    let a = m.new_primary_input();
    let b = m.new_primary_input();
    let c = m.new_primary_input();
    let g1 = m.and(a, b);
    let g2 = m.and(g1, c);
    let g3 = m.and(a, c);
    let po1 = m.new_primary_output(g2);
    let _po2 = m.new_primary_output(g3);

    m.replace(g1, a, true).unwrap();

    assert!(!m.contains(g1.node));
    assert!(!m.contains(g2.node));
    assert!(m.contains(g3.node));
    assert_eq!(m.primary_output_input(po1), g3);
    assert!(m.check().is_ok());
  }

  #[test]
  fn replace_with_self_is_a_no_op() {
    let mut m = Manager::new();
    let a = m.new_primary_input();
    let b = m.new_primary_input();
    let g1 = m.and(a, b);
    m.replace(g1, g1, true).unwrap();
    assert!(m.contains(g1.node));
    assert!(m.check().is_ok());
  }

  #[test]
  fn replace_rejects_complemented_old() {
    let mut m = Manager::new();
    let a = m.new_primary_input();
    let b = m.new_primary_input();
    let g1 = m.and(a, b);
    let err = m.replace(g1.negate(), a, true).unwrap_err();
    assert!(matches!(err, crate::error::AigError::ContractViolation(_)));
  }
}
