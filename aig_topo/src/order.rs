//! A doubly-linked list with stable handles and a cursor that survives
//! removal of the node it currently sits on.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
  /// A stable handle to a cell in a [`TopoList`]. Valid until that cell is
  /// removed; slotmap's generational keys mean a stale handle is detected
  /// rather than silently aliasing a reused slot.
  pub struct ListHandle;
}

struct Cell<T> {
  payload: T,
  prev: Option<ListHandle>,
  next: Option<ListHandle>,
}

/// A doubly-linked list of `T`, addressed by stable [`ListHandle`]s rather
/// than by position, backed by a [`slotmap::SlotMap`] the same way the
/// pie-graph crate this is descended from gives its DAG nodes stable
/// identity.
#[derive(Default)]
pub struct TopoList<T> {
  cells: SlotMap<ListHandle, Cell<T>>,
  head: Option<ListHandle>,
  tail: Option<ListHandle>,
}

impl<T> TopoList<T> {
  /// Creates an empty list.
  #[inline]
  pub fn new() -> Self {
    Self { cells: SlotMap::with_key(), head: None, tail: None }
  }

  /// Number of live elements.
  #[inline]
  pub fn len(&self) -> usize {
    self.cells.len()
  }

  /// Whether the list has no elements.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  /// Handle of the first element, if any.
  #[inline]
  pub fn first(&self) -> Option<ListHandle> {
    self.head
  }

  /// Handle of the last element, if any.
  #[inline]
  pub fn last(&self) -> Option<ListHandle> {
    self.tail
  }

  /// Handle following `handle`, if any.
  #[inline]
  pub fn next(&self, handle: ListHandle) -> Option<ListHandle> {
    self.cells.get(handle).and_then(|c| c.next)
  }

  /// Handle preceding `handle`, if any.
  #[inline]
  pub fn prev(&self, handle: ListHandle) -> Option<ListHandle> {
    self.cells.get(handle).and_then(|c| c.prev)
  }

  /// Borrows the payload at `handle`.
  #[inline]
  pub fn get(&self, handle: ListHandle) -> Option<&T> {
    self.cells.get(handle).map(|c| &c.payload)
  }

  /// Mutably borrows the payload at `handle`.
  #[inline]
  pub fn get_mut(&mut self, handle: ListHandle) -> Option<&mut T> {
    self.cells.get_mut(handle).map(|c| &mut c.payload)
  }

  /// Appends `payload` to the end of the list, returning its handle.
  pub fn push_back(&mut self, payload: T) -> ListHandle {
    let handle = self.cells.insert(Cell { payload, prev: self.tail, next: None });
    if let Some(tail) = self.tail {
      self.cells[tail].next = Some(handle);
    } else {
      self.head = Some(handle);
    }
    self.tail = Some(handle);
    handle
  }

  /// Inserts `payload` immediately after `after`, returning its handle.
  ///
  /// Used by the driver to splice newly-created nodes into the working
  /// order immediately following the node whose fanin they replace.
  pub fn insert_after(&mut self, after: ListHandle, payload: T) -> ListHandle {
    let following = self.cells[after].next;
    let handle = self.cells.insert(Cell { payload, prev: Some(after), next: following });
    self.cells[after].next = Some(handle);
    if let Some(following) = following {
      self.cells[following].prev = Some(handle);
    } else {
      self.tail = Some(handle);
    }
    handle
  }

  /// Inserts `payload` immediately before `before`, returning its handle.
  pub fn insert_before(&mut self, before: ListHandle, payload: T) -> ListHandle {
    let preceding = self.cells[before].prev;
    let handle = self.cells.insert(Cell { payload, prev: preceding, next: Some(before) });
    self.cells[before].prev = Some(handle);
    match preceding {
      Some(preceding) => self.cells[preceding].next = Some(handle),
      None => self.head = Some(handle),
    }
    handle
  }

  /// Removes `handle` from the list and returns its payload, if present.
  ///
  /// If `cursor` currently sits on `handle`, the cursor is repointed at a
  /// placeholder that remembers `handle`'s former successor, so a
  /// subsequent [`Cursor::advance`] lands on the right node without the
  /// cursor ever observing a dangling handle.
  pub fn remove(&mut self, handle: ListHandle, cursor: Option<&mut Cursor>) -> Option<T> {
    let cell = self.cells.remove(handle)?;
    match cell.prev {
      Some(prev) => self.cells[prev].next = cell.next,
      None => self.head = cell.next,
    }
    match cell.next {
      Some(next) => self.cells[next].prev = cell.prev,
      None => self.tail = cell.prev,
    }
    if let Some(cursor) = cursor {
      if cursor.pos == Pos::At(handle) {
        cursor.pos = Pos::Placeholder(cell.next);
      }
    }
    Some(cell.payload)
  }

  /// Iterates handles from head to tail.
  pub fn iter_handles(&self) -> impl Iterator<Item = ListHandle> + '_ {
    let mut current = self.head;
    std::iter::from_fn(move || {
      let handle = current?;
      current = self.cells[handle].next;
      Some(handle)
    })
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Pos {
  At(ListHandle),
  /// Cursor stood on a now-removed node; advancing lands on `.0`.
  Placeholder(Option<ListHandle>),
  End,
}

/// A stable position within a [`TopoList`] that survives removal of the node
/// it currently points at.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Cursor {
  pos: Pos,
}

impl Cursor {
  /// A cursor starting at the list's first element.
  #[inline]
  pub fn at_start<T>(list: &TopoList<T>) -> Self {
    Self { pos: list.head.map(Pos::At).unwrap_or(Pos::End) }
  }

  /// The handle this cursor currently sits on, or `None` past the end or
  /// on a removed node's placeholder.
  #[inline]
  pub fn current(&self) -> Option<ListHandle> {
    match self.pos {
      Pos::At(h) => Some(h),
      _ => None,
    }
  }

  /// Whether the cursor has run off the end of the list.
  #[inline]
  pub fn is_done(&self) -> bool {
    matches!(self.pos, Pos::End)
  }

  /// If this cursor sits on a placeholder left by removing its node, the
  /// handle that node's successor now occupies (`None` if it was the
  /// tail). `None` in every other state.
  #[inline]
  pub fn placeholder_next(&self) -> Option<ListHandle> {
    match self.pos {
      Pos::Placeholder(next) => next,
      _ => None,
    }
  }

  /// Moves the cursor to the next element.
  pub fn advance<T>(&mut self, list: &TopoList<T>) {
    self.pos = match self.pos {
      Pos::At(h) => list.next(h).map(Pos::At).unwrap_or(Pos::End),
      Pos::Placeholder(next) => next.map(Pos::At).unwrap_or(Pos::End),
      Pos::End => Pos::End,
    };
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn push_back_preserves_order() {
    let mut list = TopoList::new();
    let a = list.push_back('a');
    let b = list.push_back('b');
    let c = list.push_back('c');
    assert_eq!(list.iter_handles().collect::<Vec<_>>(), vec![a, b, c]);
  }

  #[test]
  fn insert_after_splices_in_place() {
    let mut list = TopoList::new();
    let a = list.push_back('a');
    let c = list.push_back('c');
    let b = list.insert_after(a, 'b');
    assert_eq!(list.iter_handles().collect::<Vec<_>>(), vec![a, b, c]);
    assert_eq!(list.next(a), Some(b));
    assert_eq!(list.prev(c), Some(b));
  }

  #[test]
  fn cursor_survives_removal_of_its_own_node() {
    let mut list = TopoList::new();
    let a = list.push_back('a');
    let b = list.push_back('b');
    let c = list.push_back('c');
    let mut cursor = Cursor::at_start(&list);
    cursor.advance(&list); // now at b
    assert_eq!(cursor.current(), Some(b));
    list.remove(b, Some(&mut cursor));
    // cursor sits on a placeholder remembering b's old successor, c
    assert_eq!(cursor.current(), None);
    cursor.advance(&list);
    assert_eq!(cursor.current(), Some(c));
    assert_eq!(list.iter_handles().collect::<Vec<_>>(), vec![a, c]);
  }

  #[test]
  fn removing_tail_updates_cursor_to_end() {
    let mut list = TopoList::new();
    let a = list.push_back('a');
    let b = list.push_back('b');
    let mut cursor = Cursor::at_start(&list);
    cursor.advance(&list); // at b
    list.remove(b, Some(&mut cursor));
    cursor.advance(&list);
    assert!(cursor.is_done());
    assert_eq!(list.iter_handles().collect::<Vec<_>>(), vec![a]);
  }

  #[test]
  fn insert_before_splices_in_place() {
    let mut list = TopoList::new();
    let a = list.push_back('a');
    let c = list.push_back('c');
    let b = list.insert_before(c, 'b');
    assert_eq!(list.iter_handles().collect::<Vec<_>>(), vec![a, b, c]);
    assert_eq!(list.next(a), Some(b));
    assert_eq!(list.prev(c), Some(b));
  }

  #[test]
  fn insert_before_head_becomes_new_head() {
    let mut list = TopoList::new();
    let b = list.push_back('b');
    let a = list.insert_before(b, 'a');
    assert_eq!(list.first(), Some(a));
    assert_eq!(list.iter_handles().collect::<Vec<_>>(), vec![a, b]);
  }

  #[test]
  fn removing_a_node_the_cursor_is_not_on_leaves_cursor_untouched() {
    let mut list = TopoList::new();
    let a = list.push_back('a');
    let b = list.push_back('b');
    let c = list.push_back('c');
    let cursor = Cursor::at_start(&list); // at a
    list.remove(c, None);
    assert_eq!(cursor.current(), Some(a));
    assert_eq!(list.iter_handles().collect::<Vec<_>>(), vec![a, b]);
  }
}
