use crate::ir::Value;

/// The abstract domain of C3: where a pointer ultimately comes from, as seen from the
/// perspective of the function currently being traced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PointerSource {
    /// A non-pointer scalar; traced no further.
    Primitive,
    /// An `alloca` local to the named function.
    Local(String),
    /// A program global symbol.
    Global(String),
    /// An incoming argument of the function currently being traced, not yet bound to a caller's
    /// source (the root of the call graph, or a function whose sources weren't supplied).
    Argument(Value),
    /// A pointer that transitively derives from a call result, or from a caller's `Local`
    /// promoted across the call boundary into this frame.
    Function(String),
    /// Nothing could be resolved.
    Unknown,
}

impl PointerSource {
    /// A caller's `Local(f)` becomes a `Function(f)` once observed from inside a different
    /// frame: a local in a caller becomes a function-scoped pointer from this frame's
    /// perspective.
    pub fn promote_across_call(self) -> PointerSource {
        match self {
            PointerSource::Local(f) => PointerSource::Function(f),
            other => other,
        }
    }
}
