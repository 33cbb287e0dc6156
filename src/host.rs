//! The narrow contracts externally supplied by a host compilation pipeline: memory-dependence
//! queries, allocator identification, and a call-graph root. The crate depends on these as
//! traits rather than a concrete alias-analysis implementation, so it has no hard dependency on
//! any one host.

use crate::ir::{Block, Context, Function, Value};

/// The result of asking "what did this load depend on", mirroring the five-way result a host
/// alias/memory-dependence analysis reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemDepResult {
    /// The load's value is defined by this instruction (expected to be a `store`, or another
    /// `load` under a must-alias relationship).
    Def(Value),
    /// Some other instruction clobbers the location without defining a usable value.
    Clobber(Value),
    /// The dependency crosses a block boundary within the function.
    NonLocal,
    /// The dependency crosses a function boundary.
    NonFuncLocal,
    /// Nothing could be resolved.
    Unknown,
}

/// A host-supplied memory-dependence analysis. C3's `PointerSourceEvaluator` is a client of
/// this, never an implementor.
pub trait MemoryDependence {
    fn dependency(&self, load: Value, context: &Context) -> MemDepResult;

    /// For loads whose local dependency didn't resolve, a list of candidate resolutions found
    /// by searching beyond the current block.
    fn non_local_dependency(&self, load: Value, context: &Context) -> Vec<(Block, MemDepResult)>;
}

/// A host-supplied service recognising which call targets are heap allocators.
pub trait AllocatorIdentify {
    fn is_allocator(&self, name: &str) -> bool;
}

/// A host-supplied call-graph root, consulted by the locality tracer only when the module has
/// no function named `main`.
pub trait CallGraphRoot {
    fn root(&self, context: &Context) -> Option<Function>;
}

/// The recognised heap-allocator names the evaluator's `call` rule checks against.
pub const HEAP_ALLOCATOR_NAMES: &[&str] = &["malloc", "realloc"];

/// The straightforward `AllocatorIdentify` most hosts want: the two literal allocator names.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardAllocators;

impl AllocatorIdentify for StandardAllocators {
    fn is_allocator(&self, name: &str) -> bool {
        HEAP_ALLOCATOR_NAMES.contains(&name)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Minimal trait implementations for the end-to-end scenarios — exactly the shape a real
    //! host compiler would provide, just backed by a `HashMap` instead of a live alias pass.
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    pub(crate) struct FixtureMemDep {
        local: RefCell<HashMap<Value, MemDepResult>>,
        non_local: RefCell<HashMap<Value, Vec<(Block, MemDepResult)>>>,
    }

    impl FixtureMemDep {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn set(&self, load: Value, result: MemDepResult) {
            self.local.borrow_mut().insert(load, result);
        }

        pub(crate) fn set_non_local(&self, load: Value, results: Vec<(Block, MemDepResult)>) {
            self.non_local.borrow_mut().insert(load, results);
        }
    }

    impl MemoryDependence for FixtureMemDep {
        fn dependency(&self, load: Value, _context: &Context) -> MemDepResult {
            self.local
                .borrow()
                .get(&load)
                .copied()
                .unwrap_or(MemDepResult::Unknown)
        }

        fn non_local_dependency(&self, load: Value, _context: &Context) -> Vec<(Block, MemDepResult)> {
            self.non_local.borrow().get(&load).cloned().unwrap_or_default()
        }
    }

    pub(crate) struct FixtureRoot(pub(crate) Option<Function>);

    impl CallGraphRoot for FixtureRoot {
        fn root(&self, _context: &Context) -> Option<Function> {
            self.0
        }
    }
}
