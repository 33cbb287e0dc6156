use std::fmt::Write as _;

use rustc_hash::FxHashSet;

use crate::ir::{Callee, Context, Instruction, Value};

use super::data::MemoryAccessData;
use super::value::StoredValue;
use super::visitor::FunctionSummary;

fn format_value(context: &Context, value: Value) -> String {
    if let Some(global) = value.as_global(context) {
        return format!("@{}", global.get_name(context));
    }
    if let Some(constant) = value.as_constant(context) {
        return format!("{:?}", constant.value);
    }
    if value.is_argument(context) {
        format!("%arg{:?}", value.0)
    } else {
        format!("%v{:?}", value.0)
    }
}

fn format_stored_value(context: &Context, sv: &StoredValue) -> String {
    match sv.carrier {
        None => "Top".to_string(),
        Some(carrier) => format!("({}, {:?})", format_value(context, carrier), sv.kind),
    }
}

fn format_section(out: &mut String, context: &Context, data: &MemoryAccessData, header: &str, keys: &FxHashSet<Value>) {
    writeln!(out, "{header}").unwrap();
    let mut entries: Vec<_> = keys
        .iter()
        .map(|k| (format_value(context, *k), data.stores.get(k)))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    for (label, sv) in entries {
        let sv = sv.copied().unwrap_or_default();
        writeln!(out, "> {} <- {}", label, format_stored_value(context, &sv)).unwrap();
    }
}

/// The stable textual dump format for a function's summary, grouped by store classification.
pub fn format_summary(context: &Context, function_name: &str, summary: &FunctionSummary) -> String {
    let mut out = String::new();
    writeln!(out, "Function: {function_name}").unwrap();

    format_section(&mut out, context, &summary.data, "Stores to stack:", &summary.data.stack_stores);
    format_section(&mut out, context, &summary.data, "Stores to globals:", &summary.data.global_stores);
    format_section(
        &mut out,
        context,
        &summary.data,
        "Stores to argument pointers:",
        &summary.data.argument_stores,
    );
    format_section(&mut out, context, &summary.data, "Stores to the heap:", &summary.data.heap_stores);
    format_section(
        &mut out,
        context,
        &summary.data,
        "Stores to THE UNKNOWN:",
        &summary.data.unknown_stores,
    );

    write!(
        out,
        "Function calls: Indirect: {} Direct: ",
        summary.data.indirect_function_calls.len()
    )
    .unwrap();
    let mut callees: Vec<String> = summary
        .data
        .function_calls
        .iter()
        .filter_map(|v| match v.get_instruction(context) {
            Some(Instruction::Call {
                callee: Callee::Direct(f),
                ..
            }) => Some(f.get_name(context).to_string()),
            _ => None,
        })
        .collect();
    callees.sort();
    writeln!(out, "{}", callees.join(", ")).unwrap();

    writeln!(out, "Is summarise: {}", summary.is_summarisable).unwrap();
    out
}
