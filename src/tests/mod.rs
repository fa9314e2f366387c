//! Integration-style property tests, kept as plain modules behind
//! `mod tests;` the way the teacher places its own `src/tests/*.rs`
//! suite.

mod canonical_form;
