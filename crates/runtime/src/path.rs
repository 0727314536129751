//! Dot-path accessor: `get`/`set` on object trees using a dot-separated
//! sequence of key components (e.g. `user.profile.name`). There is no
//! array indexing and no escaping for `.` within a key — a component may
//! never itself contain `.`.

use crate::deep_copy::deep_copy;
use crate::error::{ErrorKind, JsonkError, Result};
use crate::limits;
use crate::value::Value;

fn split_path(path: &str) -> Result<Vec<&str>> {
    if path.len() > limits::MAX_PATH_LEN {
        return Err(JsonkError::new(ErrorKind::LimitExceeded, "path too long"));
    }
    if path.is_empty() {
        return Err(JsonkError::new(ErrorKind::Lookup, "empty path"));
    }
    Ok(path.split('.').collect())
}

/// Descend `root` (which must be an Object) through `path`'s components,
/// returning the terminal value. Fails if any non-terminal hop is missing
/// or is not itself an Object.
pub fn get_by_path(root: &Value, path: &str) -> Result<Value> {
    if !root.is_object() {
        return Err(JsonkError::new(ErrorKind::Type, "root is not an object"));
    }
    let components = split_path(path)?;
    let mut current = root.clone();
    for (i, component) in components.iter().enumerate() {
        let next = current.object_find(component.as_bytes()).ok_or_else(|| {
            JsonkError::new(ErrorKind::Lookup, format!("missing path component `{component}`"))
        })?;
        let is_last = i == components.len() - 1;
        if !is_last && !next.is_object() {
            return Err(JsonkError::new(
                ErrorKind::Lookup,
                format!("path component `{component}` is not an object"),
            ));
        }
        current = next;
    }
    Ok(current)
}

/// Descend `root` through `path`, creating empty intermediate objects for
/// missing non-terminal components (replacing any non-terminal hop that
/// isn't an Object), and set the terminal component to a deep copy of
/// `value` so the caller retains an independent reference.
pub fn set_by_path(root: &Value, path: &str, value: &Value) -> Result<()> {
    if !root.is_object() {
        return Err(JsonkError::new(ErrorKind::Type, "root is not an object"));
    }
    let components = split_path(path)?;
    let mut current = root.clone();
    for (i, component) in components.iter().enumerate() {
        let is_last = i == components.len() - 1;
        if is_last {
            let copy = deep_copy(value)?;
            current.object_set(component.as_bytes(), copy);
            return Ok(());
        }
        let next = match current.object_find(component.as_bytes()) {
            Some(existing) if existing.is_object() => existing,
            _ => {
                let fresh = Value::empty_object();
                current.object_set(component.as_bytes(), fresh.clone());
                fresh
            }
        };
        current = next;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_resolves_nested_component() {
        let root = Value::empty_object();
        let profile = Value::empty_object();
        profile.object_set(b"name", Value::string("ada"));
        root.object_set(b"profile", profile);
        let found = get_by_path(&root, "profile.name").unwrap();
        assert_eq!(found.as_string().unwrap(), b"ada");
    }

    #[test]
    fn get_fails_on_missing_component() {
        let root = Value::empty_object();
        assert!(get_by_path(&root, "missing").is_err());
    }

    #[test]
    fn get_fails_when_non_terminal_is_not_object() {
        let root = Value::empty_object();
        root.object_set(b"leaf", Value::integer(1));
        assert!(get_by_path(&root, "leaf.deeper").is_err());
    }

    #[test]
    fn set_creates_missing_intermediate_objects() {
        let root = Value::empty_object();
        set_by_path(&root, "user.profile.age", &Value::integer(30)).unwrap();
        let age = get_by_path(&root, "user.profile.age").unwrap();
        assert_eq!(age.as_number().unwrap().as_i64(), 30);
    }

    #[test]
    fn set_replaces_non_object_intermediate() {
        let root = Value::empty_object();
        root.object_set(b"user", Value::integer(1));
        set_by_path(&root, "user.name", &Value::string("m")).unwrap();
        let name = get_by_path(&root, "user.name").unwrap();
        assert_eq!(name.as_string().unwrap(), b"m");
    }

    #[test]
    fn set_writes_independent_copy() {
        let root = Value::empty_object();
        let payload = Value::string("original");
        set_by_path(&root, "k", &payload).unwrap();
        payload.object_set(b"ignored", Value::null()); // no-op: payload is a string
        let stored = get_by_path(&root, "k").unwrap();
        assert_eq!(stored.as_string().unwrap(), b"original");
    }
}
