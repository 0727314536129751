//! Structure-preserving deep copy, used by the merge-patch engine to build
//! an independent tentative post-state before committing it.
//!
//! Unlike a source that ignores allocation failure mid-traversal and
//! returns a partial copy, this implementation propagates failure: on any
//! depth-limit breach the partially built copy is simply dropped (via
//! normal `Value` refcounting) and `Err` is returned. There is no copy
//! half-built enough to be mistaken for a complete one.

use crate::error::{ErrorKind, JsonkError, Result};
use crate::limits;
use crate::value::{Node, Value};

pub fn deep_copy(value: &Value) -> Result<Value> {
    deep_copy_at(value, 0)
}

fn deep_copy_at(value: &Value, depth: usize) -> Result<Value> {
    if depth > limits::MAX_DEPTH {
        return Err(JsonkError::new(
            ErrorKind::LimitExceeded,
            "maximum nesting depth exceeded during deep copy",
        ));
    }
    value.with_node(|node| match node {
        Node::Null => Ok(Value::null()),
        Node::Bool(b) => Ok(Value::bool(*b)),
        Node::Number(n) => Ok(Value::number(*n)),
        Node::String(s) => Ok(Value::string(s.clone())),
        Node::Array(elements) => {
            let mut copied = Vec::with_capacity(elements.len());
            for element in elements {
                copied.push(deep_copy_at(element, depth + 1)?);
            }
            Ok(Value::array(copied))
        }
        Node::Object(members) => {
            let mut copied = Vec::with_capacity(members.len());
            for (key, val) in members {
                copied.push((key.clone(), deep_copy_at(val, depth + 1)?));
            }
            Ok(Value::object(copied))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_is_independent_of_original() {
        let original = Value::empty_object();
        original.object_set(b"a", Value::integer(1));
        let copy = deep_copy(&original).unwrap();
        copy.object_set(b"a", Value::integer(2));
        assert_eq!(original.object_find(b"a").unwrap().as_number().unwrap().as_i64(), 1);
        assert_eq!(copy.object_find(b"a").unwrap().as_number().unwrap().as_i64(), 2);
    }

    #[test]
    fn copy_preserves_nested_shape() {
        let original = Value::object(vec![(
            b"nested".to_vec(),
            Value::array(vec![Value::integer(1), Value::integer(2)]),
        )]);
        let copy = deep_copy(&original).unwrap();
        assert_eq!(copy, original);
    }

    #[test]
    fn copy_respects_depth_limit() {
        let mut v = Value::null();
        for _ in 0..(limits::MAX_DEPTH + 5) {
            v = Value::array(vec![v]);
        }
        assert!(deep_copy(&v).is_err());
    }

    #[test]
    fn copy_at_exact_depth_limit_succeeds() {
        let mut v = Value::null();
        for _ in 0..limits::MAX_DEPTH {
            v = Value::array(vec![v]);
        }
        assert!(deep_copy(&v).is_ok());
    }
}
