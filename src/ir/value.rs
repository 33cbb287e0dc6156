use super::*;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Value(pub(crate) generational_arena::Index);

#[derive(Clone)]
pub enum ValueContent {
    Argument(Type),
    Constant(Constant),
    Global(Global),
    Instruction(Instruction),
}

impl Value {
    pub fn new_argument(context: &mut Context, ty: Type) -> Value {
        Value(context.values.insert(ValueContent::Argument(ty)))
    }

    pub fn new_constant(context: &mut Context, constant: Constant) -> Value {
        Value(context.values.insert(ValueContent::Constant(constant)))
    }

    pub fn new_global(context: &mut Context, global: Global) -> Value {
        Value(context.values.insert(ValueContent::Global(global)))
    }

    pub fn new_instruction(context: &mut Context, instruction: Instruction) -> Value {
        Value(context.values.insert(ValueContent::Instruction(instruction)))
    }

    pub fn is_constant(&self, context: &Context) -> bool {
        matches!(context.values[self.0], ValueContent::Constant(_))
    }

    pub fn is_argument(&self, context: &Context) -> bool {
        matches!(context.values[self.0], ValueContent::Argument(_))
    }

    pub fn is_global(&self, context: &Context) -> bool {
        matches!(context.values[self.0], ValueContent::Global(_))
    }

    pub fn as_constant<'a>(&self, context: &'a Context) -> Option<&'a Constant> {
        match &context.values[self.0] {
            ValueContent::Constant(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_global(&self, context: &Context) -> Option<Global> {
        match &context.values[self.0] {
            ValueContent::Global(g) => Some(*g),
            _ => None,
        }
    }

    pub fn get_instruction<'a>(&self, context: &'a Context) -> Option<&'a Instruction> {
        match &context.values[self.0] {
            ValueContent::Instruction(ins) => Some(ins),
            _ => None,
        }
    }

    pub fn get_type(&self, context: &Context) -> Option<Type> {
        match &context.values[self.0] {
            ValueContent::Argument(ty) => Some(ty.clone()),
            ValueContent::Constant(c) => Some(c.ty.clone()),
            ValueContent::Global(g) => Some(Type::ptr_to(g.get_type(context))),
            ValueContent::Instruction(ins) => ins.get_type(context),
        }
    }

    pub fn is_pointer(&self, context: &Context) -> bool {
        self.get_type(context).map(|t| t.is_pointer()).unwrap_or(false)
    }
}
