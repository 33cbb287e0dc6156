use crate::host::StandardAllocators;
use crate::ir::parser::parse;

use super::cache::SummaryCache;
use super::value::ValueKind;
use super::watermarks::Watermarks;

// `%a = alloca i32; store i32 7, %a` classifies `%a` as a stack store with the constant value
// joined in, and leaves the function summarisable with no recorded calls.
#[test]
fn alloca_store_is_stack_and_summarisable() {
    let ctx = parse(
        r#"
        module test {
            fn f() -> unit {
                entry:
                %a = alloca i32
                %c = const i32 7
                store %c, %a
                %r = const unit ()
                ret unit %r
            }
        }
        "#,
    )
    .unwrap();

    let f = ctx.find_function_named("f").unwrap();
    let allocators = StandardAllocators;
    let mut cache = SummaryCache::new(&ctx, &allocators, Watermarks::default());
    let summary = cache.get_summary(f);

    assert_eq!(summary.data.stack_stores.len(), 1);
    let ptr = *summary.data.stack_stores.iter().next().unwrap();
    let stored = summary.data.stores.get(&ptr).unwrap();
    assert_eq!(stored.kind, ValueKind::Constant);
    assert!(summary.is_summarisable);
    assert!(summary.data.function_calls.is_empty());
    assert!(summary.data.indirect_function_calls.is_empty());
}

// `g(i32* %p)` with `store i32 7, %p` classifies `%p` as an argument store with the constant
// value joined in, and the function remains summarisable.
#[test]
fn store_through_argument_pointer_is_summarisable() {
    let ctx = parse(
        r#"
        module test {
            fn g(p: i32*) -> unit {
                entry:
                %c = const i32 7
                store %c, %p
                %r = const unit ()
                ret unit %r
            }
        }
        "#,
    )
    .unwrap();

    let g = ctx.find_function_named("g").unwrap();
    let allocators = StandardAllocators;
    let mut cache = SummaryCache::new(&ctx, &allocators, Watermarks::default());
    let summary = cache.get_summary(g);

    assert_eq!(summary.data.argument_stores.len(), 1);
    let ptr = *summary.data.argument_stores.iter().next().unwrap();
    let stored = summary.data.stores.get(&ptr).unwrap();
    assert_eq!(stored.kind, ValueKind::Constant);
    assert!(summary.is_summarisable);
}

// `%m = call i8* @malloc(i64 16); store i8 0, %m` classifies `%m` as a heap store, which alone
// disqualifies the function from being summarisable.
#[test]
fn heap_store_disqualifies_summary() {
    let ctx = parse(
        r#"
        module test {
            extern fn malloc(n: i64) -> i8*

            fn h() -> unit {
                entry:
                %n = const i64 16
                %m = call malloc(%n)
                %z = const i8 0
                store %z, %m
                %r = const unit ()
                ret unit %r
            }
        }
        "#,
    )
    .unwrap();

    let h = ctx.find_function_named("h").unwrap();
    let allocators = StandardAllocators;
    let mut cache = SummaryCache::new(&ctx, &allocators, Watermarks::default());
    let summary = cache.get_summary(h);

    assert_eq!(summary.data.heap_stores.len(), 1);
    assert!(!summary.is_summarisable);
}

// `%q = load i32*, i32** @G; store i32 0, %q` loads a pointer the block's store map doesn't
// resolve, so the subsequent store through it is classified unknown and the function is not
// summarisable.
#[test]
fn store_through_unresolved_load_is_unknown() {
    let ctx = parse(
        r#"
        module test {
            global i32* @G

            fn i() -> unit {
                entry:
                %q = load @G
                %z = const i32 0
                store %z, %q
                %r = const unit ()
                ret unit %r
            }
        }
        "#,
    )
    .unwrap();

    let i = ctx.find_function_named("i").unwrap();
    let allocators = StandardAllocators;
    let mut cache = SummaryCache::new(&ctx, &allocators, Watermarks::default());
    let summary = cache.get_summary(i);

    assert_eq!(summary.data.unknown_stores.len(), 1);
    assert!(!summary.is_summarisable);
}

// `j` calls `g(@G)` where `@G` is a global `i32`. After the inter-procedural join, `j`'s summary
// classifies `@G` as a global store, carrying forward the value `g` stored through its formal
// parameter rather than leaving it unrecorded.
#[test]
fn interprocedural_join_maps_argument_store_to_global() {
    let ctx = parse(
        r#"
        module test {
            global i32 @G

            fn g(p: i32*) -> unit {
                entry:
                %c = const i32 7
                store %c, %p
                %r = const unit ()
                ret unit %r
            }

            fn j() -> unit {
                entry:
                %r1 = call g(@G)
                %r = const unit ()
                ret unit %r
            }
        }
        "#,
    )
    .unwrap();

    let j = ctx.find_function_named("j").unwrap();
    let allocators = StandardAllocators;
    let mut cache = SummaryCache::new(&ctx, &allocators, Watermarks::default());
    let summary = cache.get_summary(j);

    assert!(!summary.data.global_stores.is_empty());
    let global = *summary.data.global_stores.iter().next().unwrap();
    let stored = summary.data.stores.get(&global).unwrap();
    assert_eq!(stored.kind, ValueKind::Constant);
}

// A predeclared intrinsic short-circuits to an empty, non-summarisable summary.
#[test]
fn intrinsic_short_circuits_to_empty_summary() {
    let ctx = parse(
        r#"
        module test {
            fn malloc(n: i64) -> i8* {
                entry:
                %u = const unit ()
                ret unit %u
            }
        }
        "#,
    )
    .unwrap();

    let malloc = ctx.find_function_named("malloc").unwrap();
    let allocators = StandardAllocators;
    let mut cache = SummaryCache::new(&ctx, &allocators, Watermarks::default());
    let summary = cache.get_summary(malloc);

    assert!(summary.data.stores.is_empty());
    assert!(!summary.is_summarisable);
}

// Join is monotone, idempotent and commutative.
#[test]
fn join_is_idempotent_and_commutative() {
    use super::data::MemoryAccessData;
    use super::value::StoredValue;
    use crate::ir::Constant;

    let mut ctx = crate::ir::Context::new();
    let a = Constant::get_int(&mut ctx, 32, 1);
    let b = Constant::get_int(&mut ctx, 32, 2);

    let mut data_a = MemoryAccessData::new();
    data_a.record_store(a, StoredValue::new(a, ValueKind::Constant), ValueKind::Stack);

    let mut data_b = MemoryAccessData::new();
    data_b.record_store(b, StoredValue::new(b, ValueKind::Constant), ValueKind::Stack);

    let joined_ab = data_a.join(&data_b);
    let joined_ba = data_b.join(&data_a);
    assert_eq!(joined_ab.stack_stores, joined_ba.stack_stores);

    let joined_twice = joined_ab.join(&joined_ab);
    assert_eq!(joined_twice.stack_stores, joined_ab.stack_stores);
}
