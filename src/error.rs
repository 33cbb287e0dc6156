//! Analysis uncertainty is absorbed into the lattice, not raised as an error — this type exists
//! for the one genuine invariant violation the analyses can hit: re-entering a visitor on a
//! function it has already analysed.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("function `{0}` was visited twice by the same analysis pass")]
    AlreadyVisited(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Panics with the same message as [`AnalysisError::AlreadyVisited`]. Used at call sites that
/// are already structurally guaranteed not to re-enter (the summary cache's pre-insertion, see
/// `access::cache`), so they don't need to thread a `Result` through code that can't act on it.
#[track_caller]
pub(crate) fn assert_not_visited(already_visited: bool, function_name: &str) {
    assert!(
        !already_visited,
        "{}",
        AnalysisError::AlreadyVisited(function_name.to_owned())
    );
}
