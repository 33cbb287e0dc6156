use generational_arena::Arena;

use super::*;

/// Owns every arena-allocated piece of the IR for one analysis run. All handles
/// (`Value`/`Block`/`Function`/`Global`/`Module`) are `Copy`, compare by the identity of their
/// underlying arena index, and remain valid for the lifetime of this `Context`.
pub struct Context {
    pub(crate) modules: Arena<ModuleContent>,
    pub(crate) functions: Arena<FunctionContent>,
    pub(crate) blocks: Arena<BlockContent>,
    pub(crate) values: Arena<ValueContent>,
    pub(crate) globals: Arena<GlobalContent>,
}

impl Context {
    pub fn new() -> Context {
        Context {
            modules: Arena::new(),
            functions: Arena::new(),
            blocks: Arena::new(),
            values: Arena::new(),
            globals: Arena::new(),
        }
    }

    pub fn module_iter(&self) -> ModuleIterator {
        ModuleIterator::new(self)
    }

    pub fn find_function_named(&self, name: &str) -> Option<Function> {
        self.functions
            .iter()
            .find(|(_, content)| content.name == name)
            .map(|(idx, _)| Function(idx))
    }

    pub fn find_global_named(&self, name: &str) -> Option<Global> {
        self.globals
            .iter()
            .find(|(_, content)| content.name == name)
            .map(|(idx, _)| Global(idx))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
