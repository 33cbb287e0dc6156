use super::*;

#[test]
fn builds_alloca_and_store_via_textual_parser() {
    let ctx = parser::parse(
        r#"
        module test {
            fn f() -> i32 {
            entry:
                %a = alloca i32
                %c = const i32 7
                store %c, %a
                ret i32 %c
            }
        }
        "#,
    )
    .unwrap();

    let module = ctx.module_iter().next().unwrap();
    let func = module.function_iter(&ctx).next().unwrap();
    assert_eq!(func.get_name(&ctx), "f");
    let entry = func.get_entry_block(&ctx).unwrap();
    assert_eq!(entry.num_instructions(&ctx), 3);
}

#[test]
fn builds_call_and_indirect_call() {
    let ctx = parser::parse(
        r#"
        module test {
            fn malloc(size: i32) -> i8*

            fn g(fp: i32*) -> i32 {
            entry:
                %m = call malloc(%fp)
                %r = call *%fp(%m)
                ret i32 %r
            }
        }
        "#,
    )
    .unwrap();

    let module = ctx.module_iter().next().unwrap();
    let g = module
        .function_iter(&ctx)
        .find(|f| f.get_name(&ctx) == "g")
        .unwrap();
    let entry = g.get_entry_block(&ctx).unwrap();
    let mut instrs = entry.instruction_iter(&ctx);
    let call1 = instrs.next().unwrap().get_instruction(&ctx).cloned();
    assert!(matches!(
        call1,
        Some(Instruction::Call {
            callee: Callee::Direct(_),
            ..
        })
    ));
    let call2 = instrs.next().unwrap().get_instruction(&ctx).cloned();
    assert!(matches!(
        call2,
        Some(Instruction::Call {
            callee: Callee::Indirect(_),
            ..
        })
    ));
}

#[test]
fn block_successors_from_terminator() {
    let ctx = parser::parse(
        r#"
        module test {
            fn h(cond: bool) -> unit {
            entry:
                cbr %cond, t, f
            t:
                br done
            f:
                br done
            done:
                ret unit %cond
            }
        }
        "#,
    )
    .unwrap();
    let module = ctx.module_iter().next().unwrap();
    let h = module.function_iter(&ctx).next().unwrap();
    let entry = h.get_entry_block(&ctx).unwrap();
    assert_eq!(entry.successors(&ctx).len(), 2);
}

#[test]
fn global_operand_resolves_to_pointer_type() {
    let ctx = parser::parse(
        r#"
        module test {
            global i32 @G

            fn i() -> unit {
            entry:
                %q = load @G
                store %q, @G
                ret unit %q
            }
        }
        "#,
    )
    .unwrap();
    let module = ctx.module_iter().next().unwrap();
    let global = module.global_iter(&ctx).next().unwrap();
    assert_eq!(global.get_name(&ctx), "G");
}
