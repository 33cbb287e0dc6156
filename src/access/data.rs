use rustc_hash::{FxHashMap, FxHashSet};

use crate::ir::Value;

use super::value::{StoredValue, ValueKind};

/// The abstract state of one basic block (or, after fixpoint, one function): which pointers
/// have been written and what was most recently stored through them, bucketed by origin.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccessData {
    /// The joined value most recently written through each pointer-origin value.
    pub stores: FxHashMap<Value, StoredValue>,

    pub stack_stores: FxHashSet<Value>,
    pub global_stores: FxHashSet<Value>,
    pub argument_stores: FxHashSet<Value>,
    pub heap_stores: FxHashSet<Value>,
    pub unknown_stores: FxHashSet<Value>,

    pub function_calls: FxHashSet<Value>,
    pub indirect_function_calls: FxHashSet<Value>,

    /// The Evaluator's per-block memo of already-computed, non-`load` `StoredValue`s — `load`
    /// results are never placed here since they depend on the mutable store map.
    pub temporaries: FxHashMap<Value, StoredValue>,
}

impl MemoryAccessData {
    pub fn new() -> Self {
        Self::default()
    }

    fn classification_set_mut(&mut self, kind: ValueKind) -> &mut FxHashSet<Value> {
        match kind {
            ValueKind::Stack => &mut self.stack_stores,
            ValueKind::Global => &mut self.global_stores,
            ValueKind::Argument => &mut self.argument_stores,
            ValueKind::Heap => &mut self.heap_stores,
            ValueKind::Unknown | ValueKind::Primitive | ValueKind::Constant => {
                &mut self.unknown_stores
            }
        }
    }

    /// Records a store through `ptr` (already resolved to its carrier identity) of abstract
    /// value `value`, joining into any prior recorded value and classifying `ptr` by `kind`.
    pub fn record_store(&mut self, ptr: Value, value: StoredValue, kind: ValueKind) {
        let joined = match self.stores.get(&ptr) {
            None => value,
            Some(prev) => prev.join(&value),
        };
        self.stores.insert(ptr, joined);
        self.classification_set_mut(kind).insert(ptr);
    }

    /// Pointwise join of `other` into `self`. Returns whether anything changed, so callers can
    /// decide whether to re-enqueue dependent blocks. Idempotent, commutative, monotone.
    pub fn join_in_place(&mut self, other: &Self) -> bool {
        let mut changed = false;

        for (ptr, val) in other.stores.iter() {
            match self.stores.get(ptr) {
                None => {
                    self.stores.insert(*ptr, *val);
                    changed = true;
                }
                Some(prev) => {
                    let joined = prev.join(val);
                    if &joined != prev {
                        self.stores.insert(*ptr, joined);
                        changed = true;
                    }
                }
            }
        }
        for (ptr, val) in other.temporaries.iter() {
            match self.temporaries.get(ptr) {
                None => {
                    self.temporaries.insert(*ptr, *val);
                    changed = true;
                }
                Some(prev) => {
                    let joined = prev.join(val);
                    if &joined != prev {
                        self.temporaries.insert(*ptr, joined);
                        changed = true;
                    }
                }
            }
        }

        macro_rules! union_set {
            ($field:ident) => {
                for v in other.$field.iter() {
                    changed |= self.$field.insert(*v);
                }
            };
        }
        union_set!(stack_stores);
        union_set!(global_stores);
        union_set!(argument_stores);
        union_set!(heap_stores);
        union_set!(unknown_stores);
        union_set!(function_calls);
        union_set!(indirect_function_calls);

        changed
    }

    pub fn join(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.join_in_place(other);
        result
    }
}
