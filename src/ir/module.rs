use super::*;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Module(pub(crate) generational_arena::Index);

pub struct ModuleContent {
    pub(crate) name: String,
    pub(crate) functions: Vec<Function>,
    pub(crate) globals: Vec<Global>,
}

impl Module {
    pub fn new(context: &mut Context, name: &str) -> Module {
        let content = ModuleContent {
            name: name.to_owned(),
            functions: Vec::new(),
            globals: Vec::new(),
        };
        Module(context.modules.insert(content))
    }

    pub fn get_name<'a>(&self, context: &'a Context) -> &'a str {
        &context.modules[self.0].name
    }

    pub fn function_iter(&self, context: &Context) -> FunctionIterator {
        FunctionIterator::new(context, self)
    }

    pub fn global_iter<'a>(&self, context: &'a Context) -> impl Iterator<Item = Global> + 'a {
        context.modules[self.0].globals.iter().copied()
    }
}

pub struct ModuleIterator {
    modules: Vec<generational_arena::Index>,
    next: usize,
}

impl ModuleIterator {
    pub fn new(context: &Context) -> ModuleIterator {
        ModuleIterator {
            modules: context.modules.iter().map(|pair| pair.0).collect(),
            next: 0,
        }
    }
}

impl Iterator for ModuleIterator {
    type Item = Module;

    fn next(&mut self) -> Option<Module> {
        if self.next < self.modules.len() {
            let idx = self.next;
            self.next += 1;
            Some(Module(self.modules[idx]))
        } else {
            None
        }
    }
}
