//! Atomic merge-patch engine.
//!
//! Applies a JSON merge patch to a target document with all-or-nothing
//! semantics: a deep copy of the parsed target is mutated in place by the
//! recursive merge, then serialized; on any failure before that final
//! serialization, nothing about the caller-visible result has changed
//! (except the documented ill-formed-patch fallback below).

use jsonk_core::Budget;

use crate::deep_copy::deep_copy;
use crate::limits;
use crate::parser::parse;
use crate::serializer::serialize;
use crate::value::Value;

/// The outcome of a merge-patch application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Merge occurred and at least one key changed.
    Success,
    /// Merge completed but nothing changed, or the patch was ill-formed
    /// and the target was copied through verbatim.
    NoChange,
    /// The target failed to parse.
    ErrorParse,
    /// The target or patch parsed to a non-Object.
    ErrorType,
    /// An allocation failed during the operation.
    ErrorMemory,
    /// The result buffer was too small to hold the serialized outcome.
    ErrorOverflow,
}

/// Apply `patch_bytes` as a merge patch to `target_bytes`, writing the
/// result into `out_buf`. Returns the outcome and the number of bytes
/// written (zero unless the outcome is `Success` or `NoChange`).
pub fn apply_patch(target_bytes: &[u8], patch_bytes: &[u8], out_buf: &mut [u8]) -> (PatchOutcome, usize) {
    let target_budget = Budget::new(limits::MAX_PARSE_MEMORY);
    let target = match parse(target_bytes, &target_budget) {
        Ok(v) => v,
        Err(_) => return (PatchOutcome::ErrorParse, 0),
    };
    if !target.is_object() {
        return (PatchOutcome::ErrorType, 0);
    }

    let patch_budget = Budget::new(limits::MAX_PARSE_MEMORY);
    let patch = match parse(patch_bytes, &patch_budget) {
        Ok(v) => v,
        Err(_) => return fallback_to_target(target_bytes, out_buf),
    };
    if !patch.is_object() {
        return (PatchOutcome::ErrorType, 0);
    }

    let working = match deep_copy(&target) {
        Ok(v) => v,
        Err(_) => return (PatchOutcome::ErrorMemory, 0),
    };

    let changed = merge_object(&working, &patch);

    match serialize(&working, out_buf) {
        Ok(n) if changed => (PatchOutcome::Success, n),
        Ok(n) => (PatchOutcome::NoChange, n),
        Err(_) => (PatchOutcome::ErrorOverflow, 0),
    }
}

/// A deliberate leniency: an ill-formed patch degrades to a no-op rather
/// than an error, as long as the (already-valid) target's own bytes fit
/// in the caller's buffer.
fn fallback_to_target(target_bytes: &[u8], out_buf: &mut [u8]) -> (PatchOutcome, usize) {
    if target_bytes.len() > out_buf.len() {
        return (PatchOutcome::ErrorOverflow, 0);
    }
    out_buf[..target_bytes.len()].copy_from_slice(target_bytes);
    (PatchOutcome::NoChange, target_bytes.len())
}

/// Recursively merge `patch`'s members into `target` (both must be
/// Objects), applying "empty means delete" semantics. Returns whether any
/// insert, delete, or replace occurred at any depth.
fn merge_object(target: &Value, patch: &Value) -> bool {
    let mut changed = false;
    let Some(patch_members) = patch.object_members() else {
        return false;
    };
    for (key, patch_value) in patch_members {
        if patch_value.is_empty_for_patch() {
            if target.object_remove(&key) {
                changed = true;
            }
            continue;
        }
        match target.object_find(&key) {
            None => {
                if let Ok(copy) = deep_copy(&patch_value) {
                    target.object_set(&key, copy);
                    changed = true;
                }
            }
            Some(existing) if existing.is_object() && patch_value.is_object() => {
                if merge_object(&existing, &patch_value) {
                    changed = true;
                }
            }
            Some(existing) => {
                if existing == patch_value {
                    continue;
                }
                if let Ok(copy) = deep_copy(&patch_value) {
                    target.object_set(&key, copy);
                    changed = true;
                }
            }
        }
    }
    changed
}
