//! Per-function memory-write classification and module-level memory-locality analysis over a
//! typed SSA IR.
//!
//! Three passes, in dependency order:
//!
//! - [`access`]: C1, a per-function chaotic-iteration abstract interpreter, and C2, the
//!   inter-procedural summary cache that inlines callee effects into callers.
//! - [`locality`]: C3, a depth-first trace over the call graph that resolves every memory access
//!   to an abstract pointer source and emits a module-level locality graph.
//!
//! The IR itself ([`ir`]) and the three narrow host contracts ([`host`]) are consumed, not
//! produced, by this crate: a host compilation pipeline owns the IR and its alias/memory-
//! dependence analyses, and hands them to these passes through narrow trait boundaries.

pub mod access;
pub mod error;
pub mod host;
pub mod ir;
pub mod locality;

use host::{AllocatorIdentify, CallGraphRoot, MemoryDependence};
use ir::{Context, Module};

/// Runs the abstract interpreter and summary cache over every function defined in `module`,
/// returning each function's summary alongside its stable textual dump. Declarations
/// (`is_declaration`) are skipped: they carry no body to walk.
pub fn analyze_module_memory_access(
    context: &Context,
    module: Module,
    allocators: &dyn AllocatorIdentify,
    watermarks: access::Watermarks,
) -> Vec<(String, access::FunctionSummary, String)> {
    let mut cache = access::SummaryCache::new(context, allocators, watermarks);
    module
        .function_iter(context)
        .filter(|f| !f.is_declaration(context))
        .map(|f| {
            let name = f.get_name(context).to_owned();
            let summary = cache.get_summary(f);
            let dump = access::format_summary(context, &name, &summary);
            (name, summary, dump)
        })
        .collect()
}

/// Runs the locality tracer over `context` and returns the resulting locality graph's DOT
/// rendering.
pub fn trace_module_locality(
    context: &Context,
    mem_dep: &dyn MemoryDependence,
    allocators: &dyn AllocatorIdentify,
    call_graph_root: &dyn CallGraphRoot,
) -> String {
    locality::trace_module(context, mem_dep, allocators, call_graph_root).to_dot()
}
