//! jsonk-core: per-parse memory budget accounting for the jsonk JSON
//! library.
//!
//! This crate carries no JSON semantics; it only knows about byte counts
//! and a cap. `jsonk-runtime` builds the value tree, parser, serializer,
//! and patch engine on top of it, debiting a [`Budget`] on every
//! allocation a single parse or patch call makes.

pub mod budget;

pub use budget::Budget;
