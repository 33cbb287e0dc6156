use tracing::debug;

use crate::host::{AllocatorIdentify, MemDepResult, MemoryDependence};
use crate::ir::{Block, Callee, Constant, ConstantValue, Context, Function, Instruction, Value};

use super::pointer_source::PointerSource;

/// Bounds recursion on cyclic PHI chains.
pub const PHI_DEPTH_WATERMARK: u32 = 10;

/// Resolves an SSA value to its abstract [`PointerSource`], from the perspective of one
/// function-tracing frame. Dispatches over the same closed set of IR kinds as the access
/// module's `Evaluator`, but with an independent domain and independent rules.
pub struct PointerSourceEvaluator<'a> {
    context: &'a Context,
    mem_dep: &'a dyn MemoryDependence,
    allocators: &'a dyn AllocatorIdentify,
    function: Function,
    /// Sources bound to this frame's actual arguments, in parameter order. Empty means this
    /// frame's arguments haven't been bound by a caller (the root, or an unresolved call).
    arg_sources: &'a [PointerSource],
}

impl<'a> PointerSourceEvaluator<'a> {
    pub fn new(
        context: &'a Context,
        mem_dep: &'a dyn MemoryDependence,
        allocators: &'a dyn AllocatorIdentify,
        function: Function,
        arg_sources: &'a [PointerSource],
    ) -> Self {
        PointerSourceEvaluator {
            context,
            mem_dep,
            allocators,
            function,
            arg_sources,
        }
    }

    pub fn evaluate(&self, value: Value) -> PointerSource {
        self.evaluate_depth(value, 0)
    }

    fn evaluate_depth(&self, value: Value, phi_depth: u32) -> PointerSource {
        if value.is_global(self.context) {
            let global = value.as_global(self.context).unwrap();
            return PointerSource::Global(global.get_name(self.context).to_owned());
        }

        if let Some(constant) = value.as_constant(self.context) {
            return self.evaluate_constant(constant);
        }

        if value.is_argument(self.context) {
            return self.evaluate_argument(value);
        }

        let Some(instruction) = value.get_instruction(self.context) else {
            return PointerSource::Unknown;
        };

        match instruction.clone() {
            Instruction::Alloca(_) => {
                PointerSource::Local(self.function.get_name(self.context).to_owned())
            }

            Instruction::GetElementPtr { ptr, .. } => self.evaluate_depth(ptr, phi_depth),

            Instruction::Cast { value: operand, .. } => self.evaluate_depth(operand, phi_depth),

            Instruction::Call { callee, .. } => self.evaluate_call(callee),

            Instruction::Load(ptr) => self.evaluate_load(value, ptr),

            Instruction::Phi { incoming, .. } => self.evaluate_phi(&incoming, phi_depth),

            _ => {
                debug!(
                    function = self.function.get_name(self.context),
                    "pointer source could not be resolved, defaulting to Unknown"
                );
                PointerSource::Unknown
            }
        }
    }

    fn evaluate_constant(&self, constant: &Constant) -> PointerSource {
        match constant.value {
            ConstantValue::Null => PointerSource::Global("null".to_owned()),
            _ => {
                debug!(
                    function = self.function.get_name(self.context),
                    "constant operand has no pointer source, defaulting to Unknown"
                );
                PointerSource::Unknown
            }
        }
    }

    fn evaluate_argument(&self, value: Value) -> PointerSource {
        if self.arg_sources.is_empty() {
            return PointerSource::Argument(value);
        }
        match self.function.arg_index(self.context, value) {
            Some(idx) => match self.arg_sources.get(idx) {
                Some(source) => source.clone().promote_across_call(),
                None => PointerSource::Argument(value),
            },
            None => PointerSource::Argument(value),
        }
    }

    fn evaluate_call(&self, callee: Callee) -> PointerSource {
        match callee {
            Callee::Direct(callee_fn) => {
                let callee_name = callee_fn.get_name(self.context);
                if self.allocators.is_allocator(callee_name) {
                    PointerSource::Function(self.function.get_name(self.context).to_owned())
                } else {
                    PointerSource::Function(callee_name.to_owned())
                }
            }
            Callee::Indirect(_) => PointerSource::Unknown,
        }
    }

    fn evaluate_load(&self, load_value: Value, ptr: Value) -> PointerSource {
        let resolved = match self.mem_dep.dependency(load_value, self.context) {
            MemDepResult::Def(dep_inst) => self.resolve_def(dep_inst),
            _ => None,
        };
        if let Some(source) = resolved {
            return source;
        }

        let via_pointer = self.evaluate_depth(ptr, 0);
        if via_pointer != PointerSource::Unknown {
            return via_pointer;
        }

        for (_block, dep) in self.mem_dep.non_local_dependency(load_value, self.context) {
            if let MemDepResult::Def(dep_inst) = dep {
                if let Some(source) = self.resolve_def(dep_inst) {
                    return source;
                }
            }
        }

        debug!(
            function = self.function.get_name(self.context),
            "load dependency did not resolve, defaulting to Unknown"
        );
        PointerSource::Unknown
    }

    /// A `load`'s dependency resolved to a defining instruction: either a `store`, whose stored
    /// operand we recurse on, or another `load` (must-alias), which we recurse on directly.
    fn resolve_def(&self, dep_inst: Value) -> Option<PointerSource> {
        match dep_inst.get_instruction(self.context)? {
            Instruction::Store { value, .. } => Some(self.evaluate_depth(*value, 0)),
            Instruction::Load(_) => Some(self.evaluate_depth(dep_inst, 0)),
            _ => None,
        }
    }

    fn evaluate_phi(&self, incoming: &[(Block, Value)], phi_depth: u32) -> PointerSource {
        if phi_depth > PHI_DEPTH_WATERMARK {
            debug!(
                function = self.function.get_name(self.context),
                "phi depth watermark exceeded, defaulting to Unknown"
            );
            return PointerSource::Unknown;
        }
        for (_block, incoming_value) in incoming {
            let source = self.evaluate_depth(*incoming_value, phi_depth + 1);
            if source != PointerSource::Unknown {
                return source;
            }
        }
        PointerSource::Unknown
    }
}
