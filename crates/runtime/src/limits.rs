//! Compile-time limits enforced by the parser, serializer, and patch engine.
//!
//! These are deliberately plain `const`s rather than a runtime
//! configuration struct: every one of them is a structural safety bound in
//! a constrained host, and changing one means re-auditing the worst-case
//! memory and stack usage of a parse, so it is recompiled, not reconfigured.

/// Deepest permitted nesting of arrays/objects during parsing, deep copy,
/// and patch merge.
pub const MAX_DEPTH: usize = 32;

/// Longest permitted string value, in bytes, after unescaping.
pub const MAX_STRING_LEN: usize = 1024 * 1024;

/// Largest permitted array, in element count.
pub const MAX_ARRAY_LEN: usize = 10_000;

/// Largest permitted object, in member count.
pub const MAX_OBJECT_MEMBERS: usize = 1_000;

/// Longest permitted object key, in bytes.
pub const MAX_KEY_LEN: usize = 256;

/// Total bytes a single parse call may debit from its [`jsonk_core::Budget`]
/// before it fails with a resource error.
pub const MAX_PARSE_MEMORY: usize = 64 * 1024 * 1024;

/// Reserved upper bound on a single dot-path's encoded length.
pub const MAX_PATH_LEN: usize = 256;
