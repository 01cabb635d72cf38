//! Level maintenance (C7): keeping `Level` and `ReverseLevel` consistent
//! after replacements, via the two heaps C1 provides.

use crate::manager::Manager;
use crate::node::{NodeId, NodeKind};

impl Manager {
  /// Schedules `node` into the forward-level heap at its current
  /// (possibly already-stale) level, unless it is already queued.
  pub(crate) fn schedule_fwd(&mut self, node: NodeId) {
    let already_marked = {
      let data = self.arena.get_mut(node).as_and_mut();
      std::mem::replace(&mut data.mark_a, true)
    };
    if !already_marked {
      let priority = self.level(node) as f32;
      self.fwd_heap.push(node, priority);
    }
  }

  /// Schedules `node` into the reverse-level heap, a no-op if reverse
  /// levels are not currently armed.
  pub(crate) fn schedule_rev(&mut self, node: NodeId) {
    if !self.reverse_armed {
      return;
    }
    let already_marked = {
      let data = self.arena.get_mut(node).as_and_mut();
      std::mem::replace(&mut data.mark_b, true)
    };
    if !already_marked {
      let priority = self.reverse_level(node).unwrap_or(0) as f32;
      self.rev_heap.push(node, priority);
    }
  }

  /// Recomputes `Level(node)` directly from its two fanins, trusting that
  /// both are already settled (`Handled`, a primary input, or the
  /// constant). Used by the driver's per-node lazy level update, never by
  /// the heap-driven propagation below.
  ///
  /// # Panics (debug only)
  ///
  /// `debug_assert!`s that both fanins are settled.
  pub(crate) fn update_level_lazy(&mut self, node: NodeId) {
    let (c0, c1) = {
      let data = self.arena.get(node).as_and();
      (data.child0, data.child1)
    };
    for child in [c0.node, c1.node] {
      debug_assert!(
        matches!(self.kind(child), NodeKind::PrimaryInput | NodeKind::Constant1)
          || self.arena.get(child).as_and().handled,
        "BUG: fanin {child:?} of {node:?} updated lazily before being handled"
      );
    }
    let level = 1 + self.level(c0.node).max(self.level(c1.node));
    self.arena.get_mut(node).as_and_mut().level = level;
  }

  /// Drains the forward-level heap to a fixed point: for each popped node
  /// still marked, recompute every AND fanout's level and reschedule it if
  /// the level grew or shrank.
  pub(crate) fn drain_fwd_heap(&mut self) {
    while let Some((node, _priority)) = self.fwd_heap.pop_min() {
      if !self.arena.contains(node) {
        continue;
      }
      let still_marked = self.arena.get(node).as_and().mark_a;
      if !still_marked {
        continue;
      }
      self.arena.get_mut(node).as_and_mut().mark_a = false;

      let fanouts: Vec<NodeId> = self
        .arena
        .get(node)
        .as_and()
        .fanouts
        .iter()
        .copied()
        .filter(|&f| self.kind(f) == NodeKind::And)
        .collect();
      for q in fanouts {
        let (c0, c1) = {
          let data = self.arena.get(q).as_and();
          (data.child0, data.child1)
        };
        let new_level = 1 + self.level(c0.node).max(self.level(c1.node));
        if new_level != self.level(q) {
          self.arena.get_mut(q).as_and_mut().level = new_level;
          self.stats.level_updates += 1;
          self.schedule_fwd(q);
        }
      }
    }
  }

  /// Drains the reverse-level heap to a fixed point, symmetric to
  /// [`Manager::drain_fwd_heap`]. A no-op if reverse levels are not armed.
  pub(crate) fn drain_rev_heap(&mut self) {
    if !self.reverse_armed {
      self.rev_heap.clear();
      return;
    }
    while let Some((node, _priority)) = self.rev_heap.pop_min() {
      if !self.arena.contains(node) {
        continue;
      }
      let still_marked = self.arena.get(node).as_and().mark_b;
      if !still_marked {
        continue;
      }
      self.arena.get_mut(node).as_and_mut().mark_b = false;

      let (c0, c1) = {
        let data = self.arena.get(node).as_and();
        (data.child0, data.child1)
      };
      for fanin in [c0.node, c1.node] {
        if self.kind(fanin) != NodeKind::And {
          continue;
        }
        let new_rl = self.compute_reverse_level(fanin);
        if Some(new_rl) != self.reverse_level(fanin) {
          self.arena.get_mut(fanin).as_and_mut().reverse_level = Some(new_rl);
          self.stats.reverse_updates += 1;
          self.schedule_rev(fanin);
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::Manager;

  #[test]
  fn forward_level_propagates_through_a_chain() {
    let mut m = Manager::new();
    let a = m.new_primary_input();
    let b = m.new_primary_input();
    let c = m.new_primary_input();
    let g1 = m.and(a, b);
    let g2 = m.and(g1, c);
    assert_eq!(m.level(g1.node), 1);
    assert_eq!(m.level(g2.node), 2);
  }

  #[test]
  fn reverse_level_of_po_driver_is_zero_when_armed() {
    let mut m = Manager::new();
    let a = m.new_primary_input();
    let b = m.new_primary_input();
    let g = m.and(a, b);
    m.new_primary_output(g);
    m.arm_reverse_levels();
    assert_eq!(m.reverse_level(g.node), Some(0));
  }
}
