//! Names shared between the resolver and the evaluator.
//!
//! The resolver seeds its module scope with these so that references to
//! globals resolve at a stable distance; the evaluator installs a value
//! for each of them when it opens a module. The two lists must agree,
//! which is why this lives in the IR crate both depend on.

/// Global names installed in every module.
pub const GLOBALS: &[&str] = &[
    "Object",
    "Function",
    "Error",
    "Boolean",
    "Number",
    "String",
    "Array",
    "Hash",
    "puts",
    "get_slot",
    "set_slot",
    "slot_names",
    "get_proto",
    "is_a",
];
