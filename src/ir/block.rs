use smallvec::SmallVec;

use super::*;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Block(pub(crate) generational_arena::Index);

pub struct BlockContent {
    pub(crate) label: Label,
    pub(crate) function: Function,
    pub(crate) instructions: Vec<Value>,
}

pub type Label = String;

impl Block {
    pub fn new(context: &mut Context, function: Function, label: Option<String>) -> Block {
        let label = function.get_unique_label(context, label);
        let content = BlockContent {
            label,
            function,
            instructions: Vec::new(),
        };
        Block(context.blocks.insert(content))
    }

    pub fn get_function(&self, context: &Context) -> Function {
        context.blocks[self.0].function
    }

    pub fn get_label<'a>(&self, context: &'a Context) -> &'a str {
        &context.blocks[self.0].label
    }

    pub fn ins<'a>(&self, context: &'a mut Context) -> InstructionInserter<'a> {
        InstructionInserter::new(context, *self)
    }

    pub fn instruction_iter(&self, context: &Context) -> InstructionIterator {
        InstructionIterator::new(context, self)
    }

    pub fn num_instructions(&self, context: &Context) -> usize {
        context.blocks[self.0].instructions.len()
    }

    /// The leading run of `phi` instructions in program order.
    pub fn phis<'a>(&self, context: &'a Context) -> impl Iterator<Item = Value> + 'a {
        context.blocks[self.0]
            .instructions
            .iter()
            .copied()
            .take_while(|val| matches!(val.get_instruction(context), Some(Instruction::Phi { .. })))
    }

    pub fn terminator(&self, context: &Context) -> Option<Value> {
        context.blocks[self.0].instructions.last().copied()
    }

    /// Successor blocks, derived from this block's terminator instruction, used to drive C1's
    /// chaotic-iteration worklist.
    pub fn successors(&self, context: &Context) -> SmallVec<[Block; 2]> {
        match self.terminator(context).and_then(|v| v.get_instruction(context)) {
            Some(Instruction::Branch(to_block)) => smallvec::smallvec![*to_block],
            Some(Instruction::ConditionalBranch {
                true_block,
                false_block,
                ..
            }) => smallvec::smallvec![*true_block, *false_block],
            _ => SmallVec::new(),
        }
    }
}

pub struct BlockIterator {
    blocks: Vec<generational_arena::Index>,
    next: usize,
}

impl BlockIterator {
    pub fn new(context: &Context, function: &Function) -> Self {
        BlockIterator {
            blocks: context.functions[function.0]
                .blocks
                .iter()
                .map(|block| block.0)
                .collect(),
            next: 0,
        }
    }
}

impl Iterator for BlockIterator {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        if self.next < self.blocks.len() {
            let idx = self.next;
            self.next += 1;
            Some(Block(self.blocks[idx]))
        } else {
            None
        }
    }
}

pub struct InstructionIterator {
    instructions: Vec<generational_arena::Index>,
    next: usize,
}

impl InstructionIterator {
    pub fn new(context: &Context, block: &Block) -> Self {
        InstructionIterator {
            instructions: context.blocks[block.0]
                .instructions
                .iter()
                .map(|val| val.0)
                .collect(),
            next: 0,
        }
    }
}

impl Iterator for InstructionIterator {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if self.next < self.instructions.len() {
            let idx = self.next;
            self.next += 1;
            Some(Value(self.instructions[idx]))
        } else {
            None
        }
    }
}
