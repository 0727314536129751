//! Serializer: renders a [`Value`] tree into a caller-provided buffer.
//!
//! Never partially writes a token: the moment the next byte would not
//! fit, the whole call fails with `ErrorKind::Output` and the buffer's
//! logical content (as far as the caller is concerned) is whatever the
//! caller already had. No whitespace is emitted.

use crate::error::{ErrorKind, JsonkError, Result};
use crate::value::{JsonNumber, Node, Value};

struct Writer<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> Writer<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Writer { buf, len: 0 }
    }

    fn push_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.len + bytes.len() > self.buf.len() {
            return Err(JsonkError::new(ErrorKind::Output, "output buffer too small"));
        }
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    fn push_byte(&mut self, b: u8) -> Result<()> {
        self.push_bytes(&[b])
    }
}

/// Serialize `value` into `buf`, returning the number of bytes written.
pub fn serialize(value: &Value, buf: &mut [u8]) -> Result<usize> {
    let mut writer = Writer::new(buf);
    write_value(value, &mut writer)?;
    Ok(writer.len)
}

fn write_value(value: &Value, writer: &mut Writer) -> Result<()> {
    value.with_node(|node| write_node(node, writer))
}

fn write_node(node: &Node, writer: &mut Writer) -> Result<()> {
    match node {
        Node::Null => writer.push_bytes(b"null"),
        Node::Bool(true) => writer.push_bytes(b"true"),
        Node::Bool(false) => writer.push_bytes(b"false"),
        Node::Number(n) => write_number(n, writer),
        Node::String(s) => write_string(s, writer),
        Node::Array(elements) => {
            writer.push_byte(b'[')?;
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    writer.push_byte(b',')?;
                }
                write_value(element, writer)?;
            }
            writer.push_byte(b']')
        }
        Node::Object(members) => {
            writer.push_byte(b'{')?;
            for (i, (key, val)) in members.iter().enumerate() {
                if i > 0 {
                    writer.push_byte(b',')?;
                }
                write_string(key, writer)?;
                writer.push_byte(b':')?;
                write_value(val, writer)?;
            }
            writer.push_byte(b'}')
        }
    }
}

fn write_number(n: &JsonNumber, writer: &mut Writer) -> Result<()> {
    // Sign comes from the magnitude/negative pair directly; never negate a
    // value that is already signed, which would double the sign.
    let mut text = String::new();
    if n.negative && (n.integer != 0 || n.fraction != 0) {
        text.push('-');
    }
    text.push_str(&n.integer.to_string());
    if !n.is_integer {
        text.push('.');
        text.push_str(&format!(
            "{:0width$}",
            n.fraction,
            width = n.fraction_digits as usize
        ));
    }
    writer.push_bytes(text.as_bytes())
}

fn write_string(bytes: &[u8], writer: &mut Writer) -> Result<()> {
    writer.push_byte(b'"')?;
    for &b in bytes {
        match b {
            b'"' => writer.push_bytes(b"\\\"")?,
            b'\\' => writer.push_bytes(b"\\\\")?,
            0x08 => writer.push_bytes(b"\\b")?,
            0x0c => writer.push_bytes(b"\\f")?,
            b'\n' => writer.push_bytes(b"\\n")?,
            b'\r' => writer.push_bytes(b"\\r")?,
            b'\t' => writer.push_bytes(b"\\t")?,
            _ => writer.push_byte(b)?,
        }
    }
    writer.push_byte(b'"')
}
