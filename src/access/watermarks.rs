/// The four configurable bail-out thresholds the interpreter uses to guarantee termination on
/// pathological functions. Each defaults to 10, matching the original pass's hard-coded
/// constants.
#[derive(Debug, Clone, Copy)]
pub struct Watermarks {
    /// Total basic-block visits during chaotic iteration (summed across the whole function, not
    /// per block) beyond which the fixpoint is abandoned.
    pub visit_block: u32,
    /// Functions with more distinct argument-pointer stores than this are never summarisable.
    pub argument_access: u32,
    /// Functions with more distinct global-pointer stores than this are never summarisable.
    pub global_access: u32,
    /// Functions with more direct call sites than this are never summarisable.
    pub function_call_count: u32,
}

impl Default for Watermarks {
    fn default() -> Self {
        Watermarks {
            visit_block: 10,
            argument_access: 10,
            global_access: 10,
            function_call_count: 10,
        }
    }
}
