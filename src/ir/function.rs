use super::*;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Function(pub(crate) generational_arena::Index);

pub struct FunctionContent {
    pub(crate) name: String,
    pub(crate) arguments: Vec<(String, Value)>,
    pub(crate) return_type: Type,
    pub(crate) blocks: Vec<Block>,
    pub(crate) is_public: bool,

    next_label_idx: u64,
}

impl Function {
    /// Creates a function with no blocks. A function with an empty block list is a
    /// *declaration* — an extern/intrinsic the module never defines a body for, such as
    /// `malloc` or `klee_assume`.
    pub fn new(
        context: &mut Context,
        module: Module,
        name: String,
        args: Vec<(String, Type)>,
        return_type: Type,
        is_public: bool,
    ) -> Function {
        let arguments = args
            .into_iter()
            .map(|(name, ty)| (name, Value::new_argument(context, ty)))
            .collect();
        let content = FunctionContent {
            name,
            arguments,
            return_type,
            blocks: Vec::new(),
            is_public,
            next_label_idx: 0,
        };
        let func = Function(context.functions.insert(content));
        context.modules[module.0].functions.push(func);
        func
    }

    pub fn create_block(&self, context: &mut Context, label: Option<Label>) -> Block {
        let block = Block::new(context, *self, label);
        let func = context.functions.get_mut(self.0).unwrap();
        func.blocks.push(block);
        block
    }

    pub fn get_unique_label(&self, context: &mut Context, hint: Option<String>) -> String {
        match hint {
            Some(hint) => {
                if context.functions[self.0]
                    .blocks
                    .iter()
                    .any(|block| context.blocks[block.0].label == hint)
                {
                    let func = context.functions.get_mut(self.0).unwrap();
                    let idx = func.next_label_idx;
                    func.next_label_idx += 1;
                    format!("{}{}", hint, idx)
                } else {
                    hint
                }
            }
            None => {
                let func = context.functions.get_mut(self.0).unwrap();
                let idx = func.next_label_idx;
                func.next_label_idx += 1;
                format!("block{}", idx)
            }
        }
    }

    pub fn get_name<'a>(&self, context: &'a Context) -> &'a str {
        &context.functions[self.0].name
    }

    pub fn get_return_type(&self, context: &Context) -> Type {
        context.functions[self.0].return_type.clone()
    }

    pub fn is_declaration(&self, context: &Context) -> bool {
        context.functions[self.0].blocks.is_empty()
    }

    pub fn get_entry_block(&self, context: &Context) -> Option<Block> {
        context.functions[self.0].blocks.first().copied()
    }

    pub fn num_args(&self, context: &Context) -> usize {
        context.functions[self.0].arguments.len()
    }

    pub fn get_arg(&self, context: &Context, index: usize) -> Option<Value> {
        context.functions[self.0]
            .arguments
            .get(index)
            .map(|(_, val)| *val)
    }

    pub fn get_arg_named(&self, context: &Context, name: &str) -> Option<Value> {
        context.functions[self.0]
            .arguments
            .iter()
            .find_map(|(arg_name, val)| if arg_name == name { Some(*val) } else { None })
    }

    /// The index of `value` among this function's incoming arguments, if it is one.
    pub fn arg_index(&self, context: &Context, value: Value) -> Option<usize> {
        context.functions[self.0]
            .arguments
            .iter()
            .position(|(_, arg_val)| *arg_val == value)
    }

    pub fn args_iter<'a>(
        &self,
        context: &'a Context,
    ) -> impl Iterator<Item = &'a (String, Value)> {
        context.functions[self.0].arguments.iter()
    }

    pub fn block_iter(&self, context: &Context) -> BlockIterator {
        BlockIterator::new(context, self)
    }

    pub fn instruction_iter<'a>(
        &self,
        context: &'a Context,
    ) -> impl Iterator<Item = (Block, Value)> + 'a {
        context.functions[self.0]
            .blocks
            .iter()
            .flat_map(move |block| {
                context.blocks[block.0]
                    .instructions
                    .iter()
                    .map(move |ins_val| (*block, *ins_val))
            })
    }
}

pub struct FunctionIterator {
    functions: Vec<generational_arena::Index>,
    next: usize,
}

impl FunctionIterator {
    pub fn new(context: &Context, module: &Module) -> FunctionIterator {
        FunctionIterator {
            functions: context.modules[module.0]
                .functions
                .iter()
                .map(|func| func.0)
                .collect(),
            next: 0,
        }
    }
}

impl Iterator for FunctionIterator {
    type Item = Function;

    fn next(&mut self) -> Option<Function> {
        if self.next < self.functions.len() {
            let idx = self.next;
            self.next += 1;
            Some(Function(self.functions[idx]))
        } else {
            None
        }
    }
}
