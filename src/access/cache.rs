use rustc_hash::FxHashMap;
use tracing::trace;

use crate::host::AllocatorIdentify;
use crate::ir::{Context, Function};

use super::visitor::{FunctionSummary, MemoryAccessInstVisitor};
use super::watermarks::Watermarks;

/// The inter-procedural summary cache. A callee is analyzed at most once per `Context`;
/// recursive cycles are broken by pre-inserting a non-summarisable placeholder before recursing.
pub struct SummaryCache<'a> {
    context: &'a Context,
    allocators: &'a dyn AllocatorIdentify,
    watermarks: Watermarks,
    summaries: FxHashMap<Function, FunctionSummary>,
    in_progress: FxHashMap<Function, ()>,
}

impl<'a> SummaryCache<'a> {
    pub fn new(context: &'a Context, allocators: &'a dyn AllocatorIdentify, watermarks: Watermarks) -> Self {
        SummaryCache {
            context,
            allocators,
            watermarks,
            summaries: FxHashMap::default(),
            in_progress: FxHashMap::default(),
        }
    }

    /// Returns the memoised summary for `function`, analyzing it first if this is the first
    /// request. A request for a function still `in_progress` (a call cycle) returns a
    /// non-summarisable empty placeholder rather than recursing — the placeholder is never
    /// itself cached, so a later, non-cyclic request for the same function still analyzes it.
    pub fn get_summary(&mut self, function: Function) -> FunctionSummary {
        if let Some(cached) = self.summaries.get(&function) {
            return cached.clone();
        }
        if self.in_progress.contains_key(&function) {
            trace!(
                function = function.get_name(self.context),
                "recursive call cycle, using non-summarisable placeholder"
            );
            return FunctionSummary::empty_non_summarisable();
        }

        self.in_progress.insert(function, ());
        let visitor = MemoryAccessInstVisitor::new(self.context, self.allocators, self.watermarks, function);
        let summary = visitor.analyze(self);
        self.in_progress.remove(&function);
        self.summaries.insert(function, summary.clone());
        summary
    }

    pub fn cached_summary(&self, function: Function) -> Option<&FunctionSummary> {
        self.summaries.get(&function)
    }
}
