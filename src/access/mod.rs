//! C1 (the per-function abstract interpreter) and C2 (the inter-procedural summary cache).

mod cache;
mod data;
mod evaluator;
mod print;
mod value;
mod visitor;
mod watermarks;

pub use cache::SummaryCache;
pub use data::MemoryAccessData;
pub use print::format_summary;
pub use value::{StoredValue, ValueKind};
pub use visitor::{FunctionSummary, MemoryAccessInstVisitor};
pub use watermarks::Watermarks;

/// Names matching these patterns are pre-declared/intrinsic functions the visitor
/// short-circuits on: empty summary, `enough = true`, `is_summarisable = false`.
pub(crate) fn is_predeclared_intrinsic(name: &str) -> bool {
    name.starts_with("klee_")
        || name.starts_with("__cxa")
        || name.starts_with("__cxx")
        || matches!(
            name,
            "__assert_fail"
                | "__cxa_guard_acquire"
                | "exit"
                | "_exit"
                | "malloc"
                | "realloc"
                | "free"
        )
}

/// Debug-info intrinsic calls are never recorded as direct or indirect call sites.
pub(crate) fn is_debug_intrinsic(name: &str) -> bool {
    name.starts_with("llvm.dbg.")
}

#[cfg(test)]
mod tests;
