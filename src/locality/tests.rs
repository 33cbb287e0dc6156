use crate::host::fixtures::FixtureRoot;
use crate::host::{MemDepResult, StandardAllocators};
use crate::ir::parser::parse;
use tracing_test::traced_test;

use super::tracer::trace_module;

// `main` calls `k`, which loads from `@G`. The tracer emits `main -> k` and `k -> "Global
// objects"`.
#[test]
fn global_load_emits_global_objects_edge() {
    let ctx = parse(
        r#"
        module test {
            global i32 @G

            fn k() -> unit {
                entry:
                %q = load @G
                %r = const unit ()
                ret unit %r
            }

            fn main() -> unit {
                entry:
                %r1 = call k()
                %r = const unit ()
                ret unit %r
            }
        }
        "#,
    )
    .unwrap();

    let k = ctx.find_function_named("k").unwrap();
    let load = k
        .instruction_iter(&ctx)
        .map(|(_, v)| v)
        .find(|v| v.get_instruction(&ctx).map(|i| matches!(i, crate::ir::Instruction::Load(_))).unwrap_or(false))
        .unwrap();

    let mem_dep = crate::host::fixtures::FixtureMemDep::new();
    mem_dep.set(load, MemDepResult::Unknown);
    let allocators = StandardAllocators;
    let root = FixtureRoot(None);

    let graph = trace_module(&ctx, &mem_dep, &allocators, &root);

    assert!(graph.has_edge("main", "k"));
    assert!(graph.has_edge("k", super::graph::GLOBAL_OBJECTS_SINK));
}

// A self-recursive function `r` calling itself emits
// `r -> "Unknown locality (INACCURACY, Recursion)"`.
#[test]
fn self_recursion_emits_recursion_sink() {
    let ctx = parse(
        r#"
        module test {
            fn r() -> unit {
                entry:
                %r1 = call r()
                %u = const unit ()
                ret unit %u
            }
        }
        "#,
    )
    .unwrap();

    let mem_dep = crate::host::fixtures::FixtureMemDep::new();
    let allocators = StandardAllocators;
    let r = ctx.find_function_named("r").unwrap();
    let root = FixtureRoot(Some(r));

    let graph = trace_module(&ctx, &mem_dep, &allocators, &root);

    assert!(graph.has_edge("r", &super::graph::unknown_locality_sink("Recursion")));
}

// An unresolved load through a pointer the evaluator can't classify logs a diagnostic rather
// than panicking, and still yields a well-formed "Unknown locality" edge.
#[traced_test]
#[test]
fn unresolved_load_logs_diagnostic_and_falls_back_to_unknown() {
    let ctx = parse(
        r#"
        module test {
            fn m() -> unit {
                entry:
                %c = const i32 1
                %b = add %c, %c -> i32
                %q = load %b
                %r = const unit ()
                ret unit %r
            }

            fn main() -> unit {
                entry:
                %r1 = call m()
                %r = const unit ()
                ret unit %r
            }
        }
        "#,
    )
    .unwrap();

    let mem_dep = crate::host::fixtures::FixtureMemDep::new();
    let allocators = StandardAllocators;
    let root = FixtureRoot(None);

    let graph = trace_module(&ctx, &mem_dep, &allocators, &root);

    assert!(graph.has_edge("m", &super::graph::unknown_locality_sink("Pointer Evaluation")));
    assert!(logs_contain("defaulting to Unknown"));
}
