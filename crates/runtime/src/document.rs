//! `Document`: a small convenience wrapper over the free functions in this
//! crate, so the safe Rust surface reads as method calls. Every method
//! here is sugar over [`crate::parser`], [`crate::serializer`],
//! [`crate::path`], and [`crate::patch`] — nothing here has independent
//! semantics.

use jsonk_core::Budget;

use crate::error::Result;
use crate::limits;
use crate::parser::parse;
use crate::patch::{apply_patch, PatchOutcome};
use crate::path::{get_by_path, set_by_path};
use crate::serializer::serialize;
use crate::value::Value;

pub struct Document {
    root: Value,
}

impl Document {
    /// Parse `bytes` into a `Document`, using the default per-parse
    /// memory budget.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let budget = Budget::new(limits::MAX_PARSE_MEMORY);
        let root = parse(bytes, &budget)?;
        Ok(Document { root })
    }

    pub fn from_value(root: Value) -> Self {
        Document { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn serialize_to(&self, buf: &mut [u8]) -> Result<usize> {
        serialize(&self.root, buf)
    }

    pub fn get_path(&self, path: &str) -> Result<Value> {
        get_by_path(&self.root, path)
    }

    pub fn set_path(&self, path: &str, value: &Value) -> Result<()> {
        set_by_path(&self.root, path, value)
    }

    /// Apply a merge patch to this document's serialized form, returning
    /// a fresh `Document` built from the result, alongside the outcome.
    /// On any error outcome the original document is returned unchanged.
    pub fn apply_merge_patch(&self, patch_bytes: &[u8]) -> (PatchOutcome, Document) {
        let mut scratch = vec![0u8; limits::MAX_STRING_LEN * 4];
        let (outcome, len) = loop {
            let current = scratch.len();
            let target_buf = {
                let mut buf = vec![0u8; current];
                match self.serialize_to(&mut buf) {
                    Ok(n) => {
                        buf.truncate(n);
                        buf
                    }
                    Err(_) => {
                        scratch.resize(current * 2, 0);
                        continue;
                    }
                }
            };
            let (outcome, n) = apply_patch(&target_buf, patch_bytes, &mut scratch);
            if outcome == PatchOutcome::ErrorOverflow && scratch.len() < limits::MAX_PARSE_MEMORY {
                scratch.resize(scratch.len() * 2, 0);
                continue;
            }
            break (outcome, n);
        };

        if matches!(outcome, PatchOutcome::Success | PatchOutcome::NoChange) {
            if let Ok(doc) = Document::parse(&scratch[..len]) {
                return (outcome, doc);
            }
        }
        (outcome, Document::from_value(self.root.clone()))
    }
}
