//! Error kinds surfaced by [`crate::Manager`].

use std::fmt;

/// Everything that can go wrong calling into a [`crate::Manager`].
///
/// `EmptyOp` from the error-handling design is deliberately absent here:
/// popping an empty heap or ordered list returns `Option::None`, not an
/// error, at every call site that can observe it.
#[derive(Debug)]
pub enum AigError {
  /// A precondition the caller controls was violated: a complemented `old`
  /// passed to [`crate::Manager::replace`], or a re-entrant call into
  /// `replace` from a cut evaluator. Always a programmer error; never
  /// recovered from automatically.
  ContractViolation(&'static str),
  /// An internal invariant would have broken: a cycle would form, a
  /// cascade failed to terminate, or the hash table holds two entries for
  /// one key. Debug builds additionally `debug_assert!` before this is
  /// ever constructed, so reaching this variant at all means the
  /// `debug_assertions` build is off.
  InvariantBroken(&'static str),
}

impl fmt::Display for AigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AigError::ContractViolation(msg) => write!(f, "contract violation: {msg}"),
      AigError::InvariantBroken(msg) => write!(f, "invariant broken: {msg}"),
    }
  }
}

impl std::error::Error for AigError {}
