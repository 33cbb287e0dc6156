use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::assert_not_visited;
use crate::host::AllocatorIdentify;
use crate::ir::{Block, Callee, Context, Function, Instruction};

use super::cache::SummaryCache;
use super::data::MemoryAccessData;
use super::evaluator::Evaluator;
use super::value::ValueKind;
use super::watermarks::Watermarks;
use super::{is_debug_intrinsic, is_predeclared_intrinsic};

/// One function's analysis result: the `MemoryAccessData` joined over its exit-reachable blocks
/// (in practice, the last block in IR order — see DESIGN.md on the "all blocks vs. exit block"
/// open question) plus whether it's precise enough to be reused at call sites.
#[derive(Debug, Clone)]
pub struct FunctionSummary {
    pub data: MemoryAccessData,
    pub is_summarisable: bool,
}

impl FunctionSummary {
    pub fn empty_non_summarisable() -> Self {
        FunctionSummary {
            data: MemoryAccessData::new(),
            is_summarisable: false,
        }
    }
}

/// The chaotic-iteration fixpoint over one function's basic blocks. Owns its own per-block
/// state for the duration of one analysis; consumed by [`SummaryCache::get_summary`].
pub struct MemoryAccessInstVisitor<'a> {
    context: &'a Context,
    allocators: &'a dyn AllocatorIdentify,
    watermarks: Watermarks,
    function: Function,

    block_in: FxHashMap<Block, MemoryAccessData>,
    block_out: FxHashMap<Block, MemoryAccessData>,
    visit_block_count: u32,
    enough: bool,
    already_run: bool,
}

impl<'a> MemoryAccessInstVisitor<'a> {
    pub fn new(
        context: &'a Context,
        allocators: &'a dyn AllocatorIdentify,
        watermarks: Watermarks,
        function: Function,
    ) -> Self {
        MemoryAccessInstVisitor {
            context,
            allocators,
            watermarks,
            function,
            block_in: FxHashMap::default(),
            block_out: FxHashMap::default(),
            visit_block_count: 0,
            enough: false,
            already_run: false,
        }
    }

    /// Runs the intra-procedural fixpoint, then the inter-procedural join over this function's
    /// direct call sites, and returns the final summary. Consumes `self`: a visitor is spent
    /// after one run — re-entry on an already-visited function is a bug in the caller.
    pub fn analyze(mut self, cache: &mut SummaryCache) -> FunctionSummary {
        assert_not_visited(self.already_run, self.function.get_name(self.context));
        self.already_run = true;

        if is_predeclared_intrinsic(self.function.get_name(self.context))
            || self.function.is_declaration(self.context)
        {
            return FunctionSummary::empty_non_summarisable();
        }

        self.run_fixpoint();

        let exit_data = self
            .function
            .block_iter(self.context)
            .last()
            .and_then(|b| self.block_out.get(&b).cloned())
            .unwrap_or_default();

        self.join_callee_effects(exit_data, cache)
    }

    fn run_fixpoint(&mut self) {
        let Some(entry) = self.function.get_entry_block(self.context) else {
            return;
        };

        let block_order: FxHashMap<Block, usize> = self
            .function
            .block_iter(self.context)
            .enumerate()
            .map(|(i, b)| (b, i))
            .collect();
        let blocks_by_order: Vec<Block> = self.function.block_iter(self.context).collect();

        self.block_in.insert(entry, MemoryAccessData::new());
        let mut worklist: BTreeSet<usize> = BTreeSet::new();
        worklist.insert(block_order[&entry]);

        while let Some(&order) = worklist.iter().next() {
            worklist.remove(&order);
            let block = blocks_by_order[order];

            self.visit_block_count += 1;
            if self.visit_block_count > self.watermarks.visit_block {
                debug!(
                    function = self.function.get_name(self.context),
                    block = block.get_label(self.context),
                    "block visit watermark exceeded, bailing out of chaotic iteration"
                );
                self.enough = true;
                break;
            }

            let incoming = self.block_in.get(&block).cloned().unwrap_or_default();
            let outgoing = self.visit_block(block, incoming);
            self.block_out.insert(block, outgoing.clone());

            for succ in block.successors(self.context) {
                let entry = self.block_in.entry(succ).or_default();
                let first_seen = entry.stores.is_empty()
                    && entry.stack_stores.is_empty()
                    && entry.global_stores.is_empty()
                    && entry.argument_stores.is_empty()
                    && entry.heap_stores.is_empty()
                    && entry.unknown_stores.is_empty();
                let changed = entry.join_in_place(&outgoing);
                if first_seen || changed {
                    worklist.insert(block_order[&succ]);
                }
            }
        }
    }

    fn visit_block(&self, block: Block, mut data: MemoryAccessData) -> MemoryAccessData {
        let evaluator = Evaluator::new(self.context, self.allocators);
        for inst_val in block.instruction_iter(self.context) {
            let Some(instruction) = inst_val.get_instruction(self.context).cloned() else {
                continue;
            };
            match instruction {
                Instruction::Store { ptr, value } => {
                    let ptr_sv = evaluator.evaluate(ptr, &mut data);
                    let stored_sv = evaluator.evaluate(value, &mut data);
                    let key = ptr_sv.carrier.unwrap_or(ptr);
                    data.record_store(key, stored_sv, ptr_sv.kind);
                }
                Instruction::Call { callee, .. } => match callee {
                    Callee::Direct(callee_fn) => {
                        if !is_debug_intrinsic(callee_fn.get_name(self.context)) {
                            data.function_calls.insert(inst_val);
                        }
                    }
                    Callee::Indirect(_) => {
                        data.indirect_function_calls.insert(inst_val);
                    }
                },
                _ => {
                    trace!(instruction = ?instruction, "no direct store/call effect");
                }
            }
        }
        data
    }

    fn join_callee_effects(
        &self,
        mut data: MemoryAccessData,
        cache: &mut SummaryCache,
    ) -> FunctionSummary {
        let mut callee_forced_false = self.enough;
        let evaluator = Evaluator::new(self.context, self.allocators);

        let call_sites: Vec<_> = data.function_calls.iter().copied().collect();
        for call_val in call_sites {
            let Some(Instruction::Call {
                callee: Callee::Direct(callee_fn),
                args,
            }) = call_val.get_instruction(self.context).cloned()
            else {
                continue;
            };

            let callee_summary = cache.get_summary(callee_fn);
            if !callee_summary.is_summarisable {
                callee_forced_false = true;
            }

            for g in &callee_summary.data.global_stores {
                let value = callee_summary.data.stores.get(g).copied().unwrap_or_default();
                data.record_store(*g, value, ValueKind::Global);
            }
            for u in callee_summary
                .data
                .heap_stores
                .iter()
                .chain(callee_summary.data.unknown_stores.iter())
            {
                let value = callee_summary.data.stores.get(u).copied().unwrap_or_default();
                data.record_store(*u, value, ValueKind::Unknown);
            }

            for k in &callee_summary.data.argument_stores {
                let callee_value = callee_summary.data.stores.get(k).copied().unwrap_or_default();
                match callee_fn.arg_index(self.context, *k) {
                    None => {
                        data.record_store(*k, callee_value, ValueKind::Unknown);
                    }
                    Some(idx) => match args.get(idx) {
                        None => {
                            data.record_store(*k, callee_value, ValueKind::Unknown);
                        }
                        Some(&actual) => {
                            let actual_sv = evaluator.evaluate(actual, &mut data);
                            if actual_sv.is_top() {
                                data.record_store(actual, callee_value, ValueKind::Unknown);
                            } else {
                                let kind = match actual_sv.kind {
                                    ValueKind::Stack => ValueKind::Stack,
                                    ValueKind::Global => ValueKind::Global,
                                    ValueKind::Argument => ValueKind::Argument,
                                    ValueKind::Heap => ValueKind::Heap,
                                    ValueKind::Unknown | ValueKind::Primitive | ValueKind::Constant => {
                                        ValueKind::Unknown
                                    }
                                };
                                data.record_store(actual, callee_value, kind);
                            }
                        }
                    },
                }
            }
        }

        let is_summarisable =
            !self.enough && !callee_forced_false && compute_summarisable(&data, self.function, self.context, &self.watermarks);

        FunctionSummary { data, is_summarisable }
    }
}

/// The summarisability predicate, evaluated against this function's own (already
/// callee-merged) data.
fn compute_summarisable(
    data: &MemoryAccessData,
    function: Function,
    context: &Context,
    watermarks: &Watermarks,
) -> bool {
    if !data.indirect_function_calls.is_empty() {
        return false;
    }
    if !data.unknown_stores.is_empty() {
        return false;
    }
    if !data.heap_stores.is_empty() {
        return false;
    }
    if data
        .argument_stores
        .iter()
        .any(|k| function.arg_index(context, *k).is_none())
    {
        return false;
    }
    if data.argument_stores.len() as u32 > watermarks.argument_access {
        return false;
    }
    if data.global_stores.len() as u32 > watermarks.global_access {
        return false;
    }
    if data.function_calls.len() as u32 > watermarks.function_call_count {
        return false;
    }
    true
}
