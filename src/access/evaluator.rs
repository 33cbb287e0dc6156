use crate::host::AllocatorIdentify;
use crate::ir::{Callee, Context, Instruction, Value};

use super::data::MemoryAccessData;
use super::value::{StoredValue, ValueKind};

/// A recursive abstract evaluator over SSA values, memoised in the current block's
/// `MemoryAccessData::temporaries`. `load` results are never memoised since they depend on the
/// mutable store map.
pub(crate) struct Evaluator<'a> {
    context: &'a Context,
    allocators: &'a dyn AllocatorIdentify,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(context: &'a Context, allocators: &'a dyn AllocatorIdentify) -> Self {
        Evaluator { context, allocators }
    }

    pub(crate) fn evaluate(&self, value: Value, data: &mut MemoryAccessData) -> StoredValue {
        if let Some(cached) = data.temporaries.get(&value) {
            return *cached;
        }
        let result = self.evaluate_uncached(value, data);
        result
    }

    fn evaluate_uncached(&self, value: Value, data: &mut MemoryAccessData) -> StoredValue {
        if value.is_argument(self.context) {
            let kind = if value.is_pointer(self.context) {
                ValueKind::Argument
            } else {
                ValueKind::Primitive
            };
            let sv = StoredValue::new(value, kind);
            data.temporaries.insert(value, sv);
            return sv;
        }
        if value.is_global(self.context) {
            let sv = StoredValue::new(value, ValueKind::Global);
            data.temporaries.insert(value, sv);
            return sv;
        }
        if value.is_constant(self.context) {
            let sv = StoredValue::new(value, ValueKind::Constant);
            data.temporaries.insert(value, sv);
            return sv;
        }

        let instruction = match value.get_instruction(self.context) {
            Some(ins) => ins.clone(),
            None => {
                let sv = StoredValue::new(value, ValueKind::Unknown);
                data.temporaries.insert(value, sv);
                return sv;
            }
        };

        match instruction {
            Instruction::Alloca(_) => {
                let sv = StoredValue::new(value, ValueKind::Stack);
                data.temporaries.insert(value, sv);
                sv
            }

            // Not cached: depends on the block's mutable store map.
            Instruction::Load(ptr) => {
                let ptr_sv = self.evaluate(ptr, data);
                let key = ptr_sv.carrier.unwrap_or(ptr);
                if let Some(stored) = data.stores.get(&key) {
                    *stored
                } else if value.is_pointer(self.context) {
                    StoredValue::new(value, ValueKind::Unknown)
                } else {
                    StoredValue::new(value, ValueKind::Primitive)
                }
            }

            Instruction::GetElementPtr { ptr, indices } => {
                let ptr_sv = self.evaluate(ptr, data);
                let mut all_const = true;
                for idx in &indices {
                    if self.evaluate(*idx, data).kind != ValueKind::Constant {
                        all_const = false;
                        break;
                    }
                }
                let kind = if all_const { ptr_sv.kind } else { ValueKind::Unknown };
                let sv = StoredValue::new(value, kind);
                if all_const {
                    data.temporaries.insert(value, sv);
                }
                sv
            }

            Instruction::Cast { value: operand, .. } => {
                let result_is_ptr = value.is_pointer(self.context);
                let operand_is_ptr = operand.is_pointer(self.context);
                let operand_sv = self.evaluate(operand, data);
                let sv = if result_is_ptr {
                    if operand_is_ptr {
                        StoredValue::new(value, operand_sv.kind)
                    } else {
                        StoredValue::new(value, ValueKind::Unknown)
                    }
                } else if operand_sv.kind == ValueKind::Constant {
                    StoredValue::new(value, ValueKind::Constant)
                } else {
                    StoredValue::new(value, ValueKind::Primitive)
                };
                if operand_sv.kind == ValueKind::Constant {
                    data.temporaries.insert(value, sv);
                }
                sv
            }

            Instruction::BinaryOp { lhs, rhs, .. } => {
                let result_is_ptr = value.is_pointer(self.context);
                let lhs_is_ptr = lhs.is_pointer(self.context);
                let rhs_is_ptr = rhs.is_pointer(self.context);
                let lhs_sv = self.evaluate(lhs, data);
                let rhs_sv = self.evaluate(rhs, data);
                let both_const =
                    lhs_sv.kind == ValueKind::Constant && rhs_sv.kind == ValueKind::Constant;

                let sv = if result_is_ptr {
                    if lhs_is_ptr && !rhs_is_ptr && rhs_sv.kind == ValueKind::Constant {
                        StoredValue::new(value, lhs_sv.kind)
                    } else if rhs_is_ptr && !lhs_is_ptr && lhs_sv.kind == ValueKind::Constant {
                        StoredValue::new(value, rhs_sv.kind)
                    } else {
                        StoredValue::new(value, ValueKind::Unknown)
                    }
                } else if both_const {
                    StoredValue::new(value, ValueKind::Constant)
                } else {
                    StoredValue::new(value, ValueKind::Primitive)
                };
                if both_const {
                    data.temporaries.insert(value, sv);
                }
                sv
            }

            Instruction::Call {
                callee: Callee::Direct(callee_fn),
                ..
            } => {
                if self.allocators.is_allocator(callee_fn.get_name(self.context)) {
                    StoredValue::new(value, ValueKind::Heap)
                } else {
                    StoredValue::top()
                }
            }
            Instruction::Call {
                callee: Callee::Indirect(_),
                ..
            } => StoredValue::top(),

            // Phi nodes, branches and everything else C1 doesn't specialise: treated
            // conservatively as Unknown. Merging provenance across blocks is C3's job, not
            // C1's — see `locality::evaluator`.
            _ => {
                let sv = StoredValue::new(value, ValueKind::Unknown);
                data.temporaries.insert(value, sv);
                sv
            }
        }
    }
}
