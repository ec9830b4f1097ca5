//! End-to-end interpreter tests: source text through
//! lex → parse → resolve → eval, asserting on inspect-strings,
//! captured output, or rendered errors.

mod basics;
mod closures;
mod errors_tests;
mod objects;
mod support;

pub(crate) use support::Runner;
