//! An incremental, structurally-hashed And-Inverter Graph.
//!
//! [`Manager`] owns the graph: hash-consed `and`/`or`/`xor`/`mux`/`miter`
//! construction (C3-C5), atomic node replacement with cascading collision
//! handling (C6), and forward/reverse level maintenance (C1/C7). The
//! topological working order and priority heaps those depend on live in the
//! sibling [`aig_topo`] crate, which has no notion of Boolean structure.
//!
//! [`driver::RefactorDriver`] (C8) drives a single topologically-ordered
//! rewriting pass over the graph; what to rewrite a node *to* is delegated
//! to an external [`driver::CutEvaluator`], since cut enumeration and
//! Boolean factoring are out of scope for this crate.
//!
//! [`Manager::check`] verifies every structural invariant from scratch and
//! is meant for tests and debug assertions, not the hot path.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod arena;
mod check;
mod driver;
mod error;
mod hash;
mod levels;
mod manager;
mod node;
mod replace;
mod stats;
mod tracker;

pub use check::Violation;
pub use driver::{Candidate, CutEvaluator, NoopCutEvaluator, PassReport, RefactorConfig, RefactorDriver};
pub use error::AigError;
pub use manager::Manager;
pub use node::{CoKind, Literal, NodeId, NodeKind};
pub use stats::Stats;
pub use tracker::{NullTracker, PrintTracker, Tracker};
