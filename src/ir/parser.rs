//! A tiny textual builder for the IR, used only by tests to write fixtures tersely instead of
//! issuing `Context`/`Function`/`Block` builder calls by hand.

use super::*;

pub fn parse(input: &str) -> Result<Context, String> {
    let ir_mod = ir_builder::parser::ir_descrs(input).map_err(|err| {
        let found = if input.len() - err.location.offset <= 20 {
            &input[err.location.offset..]
        } else {
            &input[err.location.offset..][..20]
        };
        format!("parse failed: {}, found: {}", err, found)
    })?;
    ir_builder::build_context(ir_mod)
}

mod ir_builder {
    peg::parser! {
        pub(in crate::ir::parser) grammar parser() for str {
            pub(in crate::ir::parser) rule ir_descrs() -> IrAstModule
                = _ m:module() eoi() { m }

            rule module() -> IrAstModule
                = "module" _ name:id() "{" _ globals:global_decl()* fn_decls:fn_decl()* "}" _ {
                    IrAstModule { name, globals, fn_decls }
                }

            rule global_decl() -> (String, IrAstTy)
                = "global" _ ty:ast_ty() "@" name:bare_id() _ {
                    (name, ty)
                }

            rule fn_decl() -> IrAstFnDecl
                = is_extern:("extern" _ {true})? "fn" _ name:bare_id() "(" _ args:(fn_arg() ** comma()) ")" _ "->" _ ret_type:ast_ty()
                  body:fn_body()? {
                    IrAstFnDecl {
                        name,
                        args,
                        ret_type,
                        blocks: body.unwrap_or_default(),
                        is_extern: is_extern.unwrap_or(false),
                    }
                }

            rule fn_body() -> Vec<IrAstBlock>
                = "{" _ blocks:block_decl()* "}" _ { blocks }

            rule fn_arg() -> (String, IrAstTy)
                = name:bare_id() ":" _ ty:ast_ty() {
                    (name, ty)
                }

            rule block_decl() -> IrAstBlock
                = label:bare_id() ":" _ instructions:instr_decl()+ {
                    IrAstBlock { label, instructions }
                }

            rule instr_decl() -> IrAstInstruction
                = value_name:value_assign()? op:operation() {
                    IrAstInstruction { value_name, op }
                }

            rule value_assign() -> String
                = "%" name:bare_id() "=" _ { name }

            rule operation() -> IrAstOperation
                = op_alloca()
                / op_load()
                / op_store()
                / op_gep()
                / op_cast()
                / op_binop()
                / op_call()
                / op_branch()
                / op_cbr()
                / op_phi()
                / op_ret()
                / op_const()

            rule op_alloca() -> IrAstOperation
                = "alloca" _ ty:ast_ty() { IrAstOperation::Alloca(ty) }

            rule op_load() -> IrAstOperation
                = "load" _ p:operand() { IrAstOperation::Load(p) }

            rule op_store() -> IrAstOperation
                = "store" _ v:operand() comma() p:operand() { IrAstOperation::Store(v, p) }

            rule op_gep() -> IrAstOperation
                = "gep" _ p:operand() comma() "[" _ idcs:(operand() ** comma()) "]" _ {
                    IrAstOperation::Gep(p, idcs)
                }

            rule op_cast() -> IrAstOperation
                = "cast" _ v:operand() "to" _ ty:ast_ty() { IrAstOperation::Cast(v, ty) }

            rule op_binop() -> IrAstOperation
                = op:binop_kind() a:operand() comma() b:operand() "->" _ ty:ast_ty() {
                    IrAstOperation::BinaryOp(op, a, b, ty)
                }

            rule binop_kind() -> BinaryOpKind
                = "add" _ { BinaryOpKind::Add }
                / "sub" _ { BinaryOpKind::Sub }
                / "mul" _ { BinaryOpKind::Mul }
                / "div" _ { BinaryOpKind::Div }

            rule op_call() -> IrAstOperation
                = "call" _ "*" _ f:operand() "(" _ args:(operand() ** comma()) ")" _ {
                    IrAstOperation::CallIndirect(f, args)
                }
                / "call" _ callee:bare_id() "(" _ args:(operand() ** comma()) ")" _ {
                    IrAstOperation::Call(callee, args)
                }

            rule op_branch() -> IrAstOperation
                = "br" _ to_block:bare_id() { IrAstOperation::Br(to_block) }

            rule op_cbr() -> IrAstOperation
                = "cbr" _ cond:operand() comma() tblock:bare_id() comma() fblock:bare_id() {
                    IrAstOperation::Cbr(cond, tblock, fblock)
                }

            rule op_phi() -> IrAstOperation
                = "phi" _ ty:ast_ty() "[" _ pairs:(phi_pair() ** comma()) "]" _ {
                    IrAstOperation::Phi(ty, pairs)
                }

            rule phi_pair() -> (String, IrAstOperand)
                = bl:bare_id() ":" _ v:operand() { (bl, v) }

            rule op_ret() -> IrAstOperation
                = "ret" _ ty:ast_ty() v:operand() { IrAstOperation::Ret(ty, v) }

            rule op_const() -> IrAstOperation
                = "const" _ ty:ast_ty() cv:const_lit() { IrAstOperation::Const(ty, cv) }

            rule operand() -> IrAstOperand
                = "%" name:bare_id() { IrAstOperand::Local(name) }
                / "@" name:bare_id() { IrAstOperand::Global(name) }

            rule const_lit() -> IrAstConstValue
                = "undef" _ { IrAstConstValue::Undef }
                / "()" _ { IrAstConstValue::Unit }
                / "null" _ { IrAstConstValue::Null }
                / "true" _ { IrAstConstValue::Bool(true) }
                / "false" _ { IrAstConstValue::Bool(false) }
                / n:decimal() { IrAstConstValue::Int(n) }
                / s:string_lit() { IrAstConstValue::String(s) }

            rule string_lit() -> String
                = "\"" chs:$(str_char()*) "\"" _ { chs.to_owned() }

            rule str_char()
                = [^ '"' | '\\'] / "\\" ['\\' | 't' | 'n' | 'r' | '"']

            rule ast_ty() -> IrAstTy
                = ("unit" / "()") _ { IrAstTy::Unit }
                / "bool" _ { IrAstTy::Bool }
                / "i" nbits:decimal() "*" _ { IrAstTy::Ptr(Box::new(IrAstTy::Int(nbits as u8))) }
                / "i" nbits:decimal() _ { IrAstTy::Int(nbits as u8) }

            rule bare_id() -> String
                = id:$(id_char0() id_char()*) _ { id.to_owned() }

            rule id() -> String = bare_id()

            rule id_char0() = quiet!{ ['A'..='Z' | 'a'..='z' | '_'] }
            rule id_char() = quiet!{ id_char0() / ['0'..='9'] }

            rule decimal() -> u64
                = ds:$("0" / ['1'..='9'] ['0'..='9']*) _ { ds.parse::<u64>().unwrap() }

            rule comma() = quiet!{ "," _ }

            rule _() = quiet!{ (ws() / comment())* }
            rule ws() = [' ' | '\t' | '\n' | '\r']
            rule comment() = "//" (!['\n'] [_])* "\n"
            rule eoi() = ![_] / expected!("end of input")
        }
    }

    #[derive(Debug)]
    pub(super) struct IrAstModule {
        name: String,
        globals: Vec<(String, IrAstTy)>,
        fn_decls: Vec<IrAstFnDecl>,
    }

    #[derive(Debug)]
    struct IrAstFnDecl {
        name: String,
        args: Vec<(String, IrAstTy)>,
        ret_type: IrAstTy,
        blocks: Vec<IrAstBlock>,
        is_extern: bool,
    }

    #[derive(Debug)]
    struct IrAstBlock {
        label: String,
        instructions: Vec<IrAstInstruction>,
    }

    #[derive(Debug)]
    struct IrAstInstruction {
        value_name: Option<String>,
        op: IrAstOperation,
    }

    #[derive(Debug)]
    enum IrAstOperand {
        Local(String),
        Global(String),
    }

    #[derive(Debug)]
    enum IrAstOperation {
        Alloca(IrAstTy),
        Load(IrAstOperand),
        Store(IrAstOperand, IrAstOperand),
        Gep(IrAstOperand, Vec<IrAstOperand>),
        Cast(IrAstOperand, IrAstTy),
        BinaryOp(BinaryOpKind, IrAstOperand, IrAstOperand, IrAstTy),
        Call(String, Vec<IrAstOperand>),
        CallIndirect(IrAstOperand, Vec<IrAstOperand>),
        Br(String),
        Cbr(IrAstOperand, String, String),
        Phi(IrAstTy, Vec<(String, IrAstOperand)>),
        Ret(IrAstTy, IrAstOperand),
        Const(IrAstTy, IrAstConstValue),
    }

    #[derive(Debug)]
    enum IrAstConstValue {
        Undef,
        Unit,
        Null,
        Bool(bool),
        Int(u64),
        String(String),
    }

    #[derive(Clone, Debug)]
    enum IrAstTy {
        Unit,
        Bool,
        Int(u8),
        Ptr(Box<IrAstTy>),
    }

    impl IrAstTy {
        fn to_ir_type(&self) -> Type {
            match self {
                IrAstTy::Unit => Type::Unit,
                IrAstTy::Bool => Type::Bool,
                IrAstTy::Int(n) => Type::Int(*n),
                IrAstTy::Ptr(inner) => Type::ptr_to(inner.to_ir_type()),
            }
        }
    }

    impl IrAstConstValue {
        fn as_value(&self, context: &mut Context, ty: &IrAstTy) -> Value {
            match self {
                IrAstConstValue::Undef => Constant::get_undef(context, ty.to_ir_type()),
                IrAstConstValue::Unit => Constant::get_unit(context),
                IrAstConstValue::Null => Constant::get_null(context),
                IrAstConstValue::Bool(b) => Constant::get_bool(context, *b),
                IrAstConstValue::Int(n) => {
                    let nbits = match ty {
                        IrAstTy::Int(n) => *n,
                        _ => 64,
                    };
                    Constant::get_int(context, nbits, *n)
                }
                IrAstConstValue::String(s) => Constant::get_string(context, s.clone()),
            }
        }
    }

    use crate::ir::*;
    use std::collections::HashMap;

    pub(super) fn build_context(ir_mod: IrAstModule) -> Result<Context, String> {
        let mut ctx = Context::new();
        let module = Module::new(&mut ctx, &ir_mod.name);

        let mut global_map = HashMap::new();
        for (name, ty) in ir_mod.globals {
            let global = Global::new(&mut ctx, module, name.clone(), ty.to_ir_type());
            global_map.insert(name, global);
        }

        // Pre-declare every function so forward/mutually-recursive calls resolve.
        let mut fn_map = HashMap::new();
        for fn_decl in &ir_mod.fn_decls {
            let args = fn_decl
                .args
                .iter()
                .map(|(name, ty)| (name.clone(), ty.to_ir_type()))
                .collect();
            let func = Function::new(
                &mut ctx,
                module,
                fn_decl.name.clone(),
                args,
                fn_decl.ret_type.to_ir_type(),
                !fn_decl.is_extern,
            );
            fn_map.insert(fn_decl.name.clone(), func);
        }

        for fn_decl in ir_mod.fn_decls {
            let func = fn_map[&fn_decl.name];
            build_fn_body(&mut ctx, func, fn_decl, &fn_map, &global_map)?;
        }
        Ok(ctx)
    }

    fn build_fn_body(
        context: &mut Context,
        func: Function,
        fn_decl: IrAstFnDecl,
        fn_map: &HashMap<String, Function>,
        global_map: &HashMap<String, Global>,
    ) -> Result<(), String> {
        if fn_decl.blocks.is_empty() {
            return Ok(());
        }

        let mut val_map: HashMap<String, Value> = HashMap::new();
        for (name, val) in func.args_iter(context).cloned().collect::<Vec<_>>() {
            val_map.insert(name, val);
        }

        let named_blocks: HashMap<String, Block> = fn_decl
            .blocks
            .iter()
            .map(|b| (b.label.clone(), func.create_block(context, Some(b.label.clone()))))
            .collect();

        for block in fn_decl.blocks {
            let cur_block = named_blocks[&block.label];
            for ins in block.instructions {
                let operand = |op: &IrAstOperand, val_map: &HashMap<String, Value>| -> Value {
                    match op {
                        IrAstOperand::Local(name) => *val_map
                            .get(name)
                            .unwrap_or_else(|| panic!("undefined value %{}", name)),
                        IrAstOperand::Global(name) => {
                            let global = *global_map
                                .get(name)
                                .unwrap_or_else(|| panic!("undefined global @{}", name));
                            Value::new_global(context, global)
                        }
                    }
                };
                let ins_val = match &ins.op {
                    IrAstOperation::Alloca(ty) => cur_block.ins(context).alloca(ty.to_ir_type()),
                    IrAstOperation::Load(p) => {
                        let p = operand(p, &val_map);
                        cur_block.ins(context).load(p)
                    }
                    IrAstOperation::Store(v, p) => {
                        let v = operand(v, &val_map);
                        let p = operand(p, &val_map);
                        cur_block.ins(context).store(p, v)
                    }
                    IrAstOperation::Gep(p, idcs) => {
                        let p = operand(p, &val_map);
                        let idcs = idcs.iter().map(|o| operand(o, &val_map)).collect();
                        cur_block.ins(context).get_elem_ptr(p, idcs)
                    }
                    IrAstOperation::Cast(v, ty) => {
                        let v = operand(v, &val_map);
                        cur_block.ins(context).cast(v, ty.to_ir_type())
                    }
                    IrAstOperation::BinaryOp(op, a, b, ty) => {
                        let a = operand(a, &val_map);
                        let b = operand(b, &val_map);
                        cur_block.ins(context).binary_op(*op, a, b, ty.to_ir_type())
                    }
                    IrAstOperation::Call(callee, args) => {
                        let function = *fn_map
                            .get(callee)
                            .unwrap_or_else(|| panic!("undefined function {}", callee));
                        let args = args.iter().map(|o| operand(o, &val_map)).collect();
                        cur_block.ins(context).call(Callee::Direct(function), args)
                    }
                    IrAstOperation::CallIndirect(f, args) => {
                        let f = operand(f, &val_map);
                        let args = args.iter().map(|o| operand(o, &val_map)).collect();
                        cur_block.ins(context).call(Callee::Indirect(f), args)
                    }
                    IrAstOperation::Br(to_block) => {
                        cur_block.ins(context).branch(named_blocks[to_block])
                    }
                    IrAstOperation::Cbr(cond, tblock, fblock) => {
                        let cond = operand(cond, &val_map);
                        cur_block.ins(context).conditional_branch(
                            cond,
                            named_blocks[tblock],
                            named_blocks[fblock],
                        )
                    }
                    IrAstOperation::Phi(ty, pairs) => {
                        let incoming = pairs
                            .iter()
                            .map(|(bl, v)| (named_blocks[bl], operand(v, &val_map)))
                            .collect();
                        cur_block.ins(context).phi(ty.to_ir_type(), incoming)
                    }
                    IrAstOperation::Ret(ty, v) => {
                        let v = operand(v, &val_map);
                        cur_block.ins(context).ret(v, ty.to_ir_type())
                    }
                    IrAstOperation::Const(ty, cv) => cv.as_value(context, ty),
                };
                if let Some(name) = ins.value_name {
                    val_map.insert(name, ins_val);
                }
            }
        }
        Ok(())
    }
}
