use crate::ir::Value;

/// Which of the five disjoint origins a pointer (or scalar) was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Top: nothing known.
    Unknown,
    /// A non-pointer scalar of unknown concrete value.
    Primitive,
    /// A literal constant.
    Constant,
    /// An `alloca` in the current function.
    Stack,
    /// A program global symbol.
    Global,
    /// Originates from a recognised allocator call.
    Heap,
    /// A pointer-typed incoming parameter of the current function.
    Argument,
}

/// The abstract value domain of the interpreter: a pair `(carrier, kind)`. `Top` (no carrier,
/// `Unknown`) represents "no information" and absorbs any disagreement under [`join`](StoredValue::join).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredValue {
    pub carrier: Option<Value>,
    pub kind: ValueKind,
}

impl StoredValue {
    pub const fn top() -> Self {
        StoredValue {
            carrier: None,
            kind: ValueKind::Unknown,
        }
    }

    pub fn new(carrier: Value, kind: ValueKind) -> Self {
        StoredValue {
            carrier: Some(carrier),
            kind,
        }
    }

    pub fn is_top(&self) -> bool {
        self.carrier.is_none() && self.kind == ValueKind::Unknown
    }

    /// Equal values join unchanged; any disagreement collapses to `Top`.
    pub fn join(&self, other: &StoredValue) -> StoredValue {
        if self == other {
            *self
        } else {
            StoredValue::top()
        }
    }
}

impl Default for StoredValue {
    fn default() -> Self {
        StoredValue::top()
    }
}
