//! Binary encoding of canonical trees.
//!
//! Layout: the domain separator, then one node in prefix form. Every node
//! starts with a tag byte; lengths and counts are u64 big-endian, integers are
//! i128 big-endian, floats are their 8-byte canonical bit pattern. Tags and
//! explicit lengths make the encoding injective.

use std::io::{self, Write};

use crate::node::{CanonicalNode, Scalar};

/// Domain separator written before every encoded tree.
pub const DOMAIN_SEPARATOR: &[u8] = b"objdigest:canonical:v1\0";

const TAG_NULL: u8 = 0x00;
const TAG_TEXT: u8 = 0x01;
const TAG_BOOL: u8 = 0x02;
const TAG_INT: u8 = 0x03;
const TAG_FLOAT: u8 = 0x04;
const TAG_SEQUENCE: u8 = 0x10;
const TAG_FIELD_MAP: u8 = 0x11;
const TAG_CIRCULAR: u8 = 0x20;
const TAG_UNSUPPORTED: u8 = 0x21;

/// Writes the domain separator followed by `node`.
pub fn encode<W: Write>(node: &CanonicalNode, out: &mut W) -> io::Result<()> {
    out.write_all(DOMAIN_SEPARATOR)?;
    encode_node(node, out)
}

/// Encodes into a fresh buffer.
pub fn encode_to_vec(node: &CanonicalNode) -> Vec<u8> {
    let mut buf = Vec::new();
    encode(node, &mut buf).expect("writing to a Vec cannot fail");
    buf
}

fn encode_node<W: Write>(node: &CanonicalNode, out: &mut W) -> io::Result<()> {
    match node {
        CanonicalNode::Null => out.write_all(&[TAG_NULL]),
        CanonicalNode::Scalar(scalar) => encode_scalar(scalar, out),
        CanonicalNode::Sequence(items) => {
            out.write_all(&[TAG_SEQUENCE])?;
            write_len(items.len(), out)?;
            for item in items {
                encode_node(item, out)?;
            }
            Ok(())
        }
        CanonicalNode::FieldMap(fields) => {
            out.write_all(&[TAG_FIELD_MAP])?;
            write_len(fields.len(), out)?;
            for (name, child) in fields {
                write_str(name, out)?;
                encode_node(child, out)?;
            }
            Ok(())
        }
        CanonicalNode::Circular => out.write_all(&[TAG_CIRCULAR]),
        CanonicalNode::Unsupported(type_name) => {
            out.write_all(&[TAG_UNSUPPORTED])?;
            write_str(type_name, out)
        }
    }
}

fn encode_scalar<W: Write>(scalar: &Scalar, out: &mut W) -> io::Result<()> {
    match scalar {
        Scalar::Text(s) => {
            out.write_all(&[TAG_TEXT])?;
            write_str(s, out)
        }
        Scalar::Bool(b) => out.write_all(&[TAG_BOOL, u8::from(*b)]),
        Scalar::Int(i) => {
            out.write_all(&[TAG_INT])?;
            out.write_all(&i.to_be_bytes())
        }
        Scalar::Float(f) => {
            out.write_all(&[TAG_FLOAT])?;
            out.write_all(&f.to_be_bytes())
        }
    }
}

fn write_len<W: Write>(len: usize, out: &mut W) -> io::Result<()> {
    out.write_all(&(len as u64).to_be_bytes())
}

fn write_str<W: Write>(s: &str, out: &mut W) -> io::Result<()> {
    write_len(s.len(), out)?;
    out.write_all(s.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::normalize;

    fn body(node: &CanonicalNode) -> Vec<u8> {
        encode_to_vec(node)[DOMAIN_SEPARATOR.len()..].to_vec()
    }

    #[test]
    fn starts_with_domain_separator() {
        assert!(encode_to_vec(&CanonicalNode::Null).starts_with(DOMAIN_SEPARATOR));
    }

    #[test]
    fn scalar_layouts() {
        assert_eq!(body(&CanonicalNode::Null), vec![TAG_NULL]);
        assert_eq!(
            body(&CanonicalNode::Scalar(Scalar::Bool(true))),
            vec![TAG_BOOL, 1]
        );
        assert_eq!(
            body(&CanonicalNode::text("hi")),
            vec![TAG_TEXT, 0, 0, 0, 0, 0, 0, 0, 2, b'h', b'i']
        );
        let float = body(&CanonicalNode::Scalar(Scalar::Float(normalize(1.0))));
        assert_eq!(float, vec![TAG_FLOAT, 0x3f, 0xf0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(body(&CanonicalNode::Scalar(Scalar::Int(1))).len(), 17);
    }

    #[test]
    fn null_differs_from_null_like_text() {
        assert_ne!(body(&CanonicalNode::Null), body(&CanonicalNode::text("")));
        assert_ne!(
            body(&CanonicalNode::Null),
            body(&CanonicalNode::text("[NULL]"))
        );
    }

    #[test]
    fn nesting_is_not_ambiguous() {
        let flat = CanonicalNode::Sequence(vec![CanonicalNode::Null, CanonicalNode::Null]);
        let nested = CanonicalNode::Sequence(vec![CanonicalNode::Sequence(vec![
            CanonicalNode::Null,
            CanonicalNode::Null,
        ])]);
        assert_ne!(body(&flat), body(&nested));

        let split = CanonicalNode::Sequence(vec![
            CanonicalNode::text("ab"),
            CanonicalNode::text("c"),
        ]);
        let joined = CanonicalNode::Sequence(vec![
            CanonicalNode::text("a"),
            CanonicalNode::text("bc"),
        ]);
        assert_ne!(body(&split), body(&joined));
    }
}
