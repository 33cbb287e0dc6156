use tracing::debug;

use crate::host::{AllocatorIdentify, CallGraphRoot, MemoryDependence};
use crate::ir::{Callee, Context, Function, Instruction};

use super::evaluator::PointerSourceEvaluator;
use super::graph::{unknown_locality_sink, LocalityGraph, GLOBAL_OBJECTS_SINK, UNEVALUATED_ARGUMENT_SINK};
use super::pointer_source::PointerSource;

/// One function's in-flight locality trace: the function being walked, the ancestor chain used
/// to break call-graph cycles, and the pointer sources its actual arguments were bound to by
/// its caller (empty for the root).
struct WorkQueueItem {
    function: Function,
    caller_set: Vec<Function>,
    arg_sources: Vec<PointerSource>,
}

/// Runs C3 over a module: starting from `main` (or the host's call-graph root), traces every
/// reachable function's memory-accessing instructions and emits a [`LocalityGraph`].
pub fn trace_module(
    context: &Context,
    mem_dep: &dyn MemoryDependence,
    allocators: &dyn AllocatorIdentify,
    call_graph_root: &dyn CallGraphRoot,
) -> LocalityGraph {
    let mut graph = LocalityGraph::new();

    let root = context
        .find_function_named("main")
        .or_else(|| call_graph_root.root(context));

    let Some(root) = root else {
        debug!("no root function found for locality trace (no `main`, no host call-graph root)");
        return graph;
    };

    let mut stack = vec![WorkQueueItem {
        function: root,
        caller_set: vec![root],
        arg_sources: Vec::new(),
    }];

    while let Some(item) = stack.pop() {
        trace_function(context, mem_dep, allocators, &item, &mut graph, &mut stack);
    }

    graph
}

fn trace_function(
    context: &Context,
    mem_dep: &dyn MemoryDependence,
    allocators: &dyn AllocatorIdentify,
    item: &WorkQueueItem,
    graph: &mut LocalityGraph,
    stack: &mut Vec<WorkQueueItem>,
) {
    let fn_name = item.function.get_name(context).to_owned();
    let evaluator = PointerSourceEvaluator::new(context, mem_dep, allocators, item.function, &item.arg_sources);

    for (_block, inst_val) in item.function.instruction_iter(context) {
        let Some(instruction) = inst_val.get_instruction(context) else {
            continue;
        };

        match instruction.clone() {
            Instruction::Load(ptr) => {
                emit_pointer_source_edge(&fn_name, evaluator.evaluate(ptr), graph);
            }
            Instruction::Store { ptr, .. } => {
                emit_pointer_source_edge(&fn_name, evaluator.evaluate(ptr), graph);
            }
            Instruction::Call { callee, args } => match callee {
                Callee::Direct(callee_fn) => {
                    if item.caller_set.contains(&callee_fn) {
                        graph.add_edge(&fn_name, &unknown_locality_sink("Recursion"));
                        continue;
                    }
                    let arg_sources = args.iter().map(|a| evaluator.evaluate(*a)).collect();
                    let mut caller_set = item.caller_set.clone();
                    caller_set.push(callee_fn);
                    graph.add_edge(&fn_name, callee_fn.get_name(context));
                    stack.push(WorkQueueItem {
                        function: callee_fn,
                        caller_set,
                        arg_sources,
                    });
                }
                Callee::Indirect(_) => {
                    graph.add_edge(&fn_name, &unknown_locality_sink("Indirect function call"));
                }
            },
            _ => {}
        }
    }
}

fn emit_pointer_source_edge(fn_name: &str, source: PointerSource, graph: &mut LocalityGraph) {
    match source {
        PointerSource::Primitive | PointerSource::Local(_) => {}
        PointerSource::Global(_) => graph.add_edge(fn_name, GLOBAL_OBJECTS_SINK),
        PointerSource::Argument(_) => graph.add_edge(fn_name, UNEVALUATED_ARGUMENT_SINK),
        PointerSource::Function(callee_name) => graph.add_edge(fn_name, &callee_name),
        PointerSource::Unknown => graph.add_edge(fn_name, &unknown_locality_sink("Pointer Evaluation")),
    }
}
