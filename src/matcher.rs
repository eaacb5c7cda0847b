//! The matcher-instance contract: the mutable, per-run state driven by
//! [parse](crate::parser::parse).

use crate::result::MatchResult;

/// A live attempt to match a [Parser](crate::parser::Parser) against a token
/// slice starting at a fixed position.
///
/// An instance is created by [Parser::create_instance] already holding its
/// first candidate match, if any (`end()` reflects that candidate without a
/// prior call to `try_again`). The driver calls `try_again` to move to the
/// next candidate (trying a longer or shorter match, or a different
/// alternative) whenever the current one does not lead to an overall match,
/// and calls `get_result` once it commits to the current candidate.
///
/// `F` is the flags type: an immutable, caller-supplied configuration value
/// threaded down the tree at result-construction time, not at match time —
/// it has no bearing on which tokens match, only on what `get_result`
/// computes.
pub trait MatcherInstance<T, F> {
    /// The end position (exclusive) of the current candidate match, or
    /// `None` if there is no current candidate (either never matched, or
    /// backtracking has been exhausted).
    fn end(&self) -> Option<usize>;

    /// Advance to the next candidate match, updating what `end()` returns.
    /// Calling this after `end()` is already `None` is a no-op: there is
    /// nothing further to try.
    fn try_again(&mut self);

    /// Build the result tree for the current candidate, under `flags`.
    /// Pure with respect to matcher state: repeated calls with equal flags
    /// on the same candidate must return equal results.
    ///
    /// # Panics
    /// If `end()` is `None` (no current candidate to build a result from).
    fn get_result(&self, flags: &F) -> MatchResult<T>;
}
