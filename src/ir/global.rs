use super::*;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Global(pub(crate) generational_arena::Index);

pub struct GlobalContent {
    pub(crate) name: String,
    pub(crate) ty: Type,
}

impl Global {
    pub fn new(context: &mut Context, module: Module, name: String, ty: Type) -> Global {
        let content = GlobalContent { name, ty };
        let global = Global(context.globals.insert(content));
        context.modules[module.0].globals.push(global);
        global
    }

    pub fn get_name<'a>(&self, context: &'a Context) -> &'a str {
        &context.globals[self.0].name
    }

    pub fn get_type(&self, context: &Context) -> Type {
        context.globals[self.0].ty.clone()
    }
}
