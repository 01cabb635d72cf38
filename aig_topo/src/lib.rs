//! Domain-agnostic ordered containers used by the `aig` crate.
//!
//! This crate carries no and-inverter-graph knowledge; it is split out the
//! same way a generic container layer sits underneath a domain engine, so it
//! can be tested and reasoned about on its own.
//!
//! - [`heap`] is a capacity-doubling binary min-heap keyed by an `f32`
//!   priority, tolerant of stale entries left behind by a caller that
//!   re-pushes a payload with a fresher priority instead of updating it in
//!   place.
//! - [`order`] is a doubly-linked list with stable, slotmap-backed handles
//!   and a cursor that survives removal of the node it currently points at.

#![forbid(unsafe_code, missing_docs)]

pub mod heap;
pub mod order;

pub use heap::PriorityHeap;
pub use order::{Cursor, ListHandle, TopoList};
