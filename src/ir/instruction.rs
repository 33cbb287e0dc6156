use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOpKind {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callee {
    Direct(Function),
    Indirect(Value),
}

#[derive(Debug, Clone)]
pub enum Instruction {
    Alloca(Type),
    Load(Value),
    Store {
        ptr: Value,
        value: Value,
    },
    GetElementPtr {
        ptr: Value,
        indices: Vec<Value>,
    },
    Cast {
        value: Value,
        ty: Type,
    },
    BinaryOp {
        op: BinaryOpKind,
        lhs: Value,
        rhs: Value,
        ty: Type,
    },
    Call {
        callee: Callee,
        args: Vec<Value>,
    },
    Branch(Block),
    ConditionalBranch {
        cond_value: Value,
        true_block: Block,
        false_block: Block,
    },
    Phi {
        ty: Type,
        incoming: Vec<(Block, Value)>,
    },
    Ret(Value, Type),
}

impl Instruction {
    pub fn get_type(&self, context: &Context) -> Option<Type> {
        match self {
            Instruction::Alloca(ty) => Some(Type::ptr_to(ty.clone())),
            Instruction::Load(ptr) => ptr.get_type(context).and_then(|t| t.pointee().cloned()),
            Instruction::GetElementPtr { ptr, .. } => ptr.get_type(context),
            Instruction::Cast { ty, .. } => Some(ty.clone()),
            Instruction::BinaryOp { ty, .. } => Some(ty.clone()),
            Instruction::Call {
                callee: Callee::Direct(f),
                ..
            } => Some(f.get_return_type(context)),
            Instruction::Call {
                callee: Callee::Indirect(_),
                ..
            } => None,
            Instruction::Phi { ty, .. } => Some(ty.clone()),

            // Terminators return nothing.
            Instruction::Branch(_) => None,
            Instruction::ConditionalBranch { .. } => None,
            Instruction::Ret(..) => None,

            // Writes a value, returns none.
            Instruction::Store { .. } => None,
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Instruction::Branch(_) | Instruction::ConditionalBranch { .. } | Instruction::Ret(..)
        )
    }
}

pub struct InstructionInserter<'a> {
    context: &'a mut Context,
    block: Block,
}

impl<'a> InstructionInserter<'a> {
    pub fn new(context: &'a mut Context, block: Block) -> InstructionInserter<'a> {
        InstructionInserter { context, block }
    }

    fn append(self, instruction: Instruction) -> Value {
        let val = Value::new_instruction(self.context, instruction);
        self.context.blocks[self.block.0].instructions.push(val);
        val
    }

    pub fn alloca(self, ty: Type) -> Value {
        self.append(Instruction::Alloca(ty))
    }

    pub fn load(self, ptr: Value) -> Value {
        self.append(Instruction::Load(ptr))
    }

    pub fn store(self, ptr: Value, value: Value) -> Value {
        self.append(Instruction::Store { ptr, value })
    }

    pub fn get_elem_ptr(self, ptr: Value, indices: Vec<Value>) -> Value {
        self.append(Instruction::GetElementPtr { ptr, indices })
    }

    pub fn cast(self, value: Value, ty: Type) -> Value {
        self.append(Instruction::Cast { value, ty })
    }

    pub fn binary_op(self, op: BinaryOpKind, lhs: Value, rhs: Value, ty: Type) -> Value {
        self.append(Instruction::BinaryOp { op, lhs, rhs, ty })
    }

    pub fn call(self, callee: Callee, args: Vec<Value>) -> Value {
        self.append(Instruction::Call { callee, args })
    }

    pub fn branch(self, to_block: Block) -> Value {
        self.append(Instruction::Branch(to_block))
    }

    pub fn conditional_branch(self, cond_value: Value, true_block: Block, false_block: Block) -> Value {
        self.append(Instruction::ConditionalBranch {
            cond_value,
            true_block,
            false_block,
        })
    }

    pub fn phi(self, ty: Type, incoming: Vec<(Block, Value)>) -> Value {
        self.append(Instruction::Phi { ty, incoming })
    }

    pub fn ret(self, value: Value, ty: Type) -> Value {
        self.append(Instruction::Ret(value, ty))
    }
}
