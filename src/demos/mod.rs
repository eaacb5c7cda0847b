//! A small JSON-like grammar built purely from the public combinators, kept
//! as an integration-test fixture (analogous to the teacher's own
//! `examples` module). Not part of the engine: no engine code depends on
//! this module.

pub mod json;
