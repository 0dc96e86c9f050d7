use crate::ast::{Literal, Node};
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x3c6e_f372_fe94_f82b;

const TAG_FUNCTION: u8 = 1;
const TAG_ACCESS: u8 = 2;
const TAG_INT: u8 = 3;
const TAG_DECIMAL: u8 = 4;
const TAG_BOOL: u8 = 5;
const TAG_STRING: u8 = 6;

/// Stable 128-bit digest of an expression tree.
///
/// Unlike `std::hash::Hash`, the value does not depend on the toolchain or process, so it can be
/// persisted as a cache key next to serialized trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AstFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

impl std::fmt::Display for AstFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

pub(crate) fn fingerprint_node(node: &Node) -> AstFingerprint {
    let mut h = StableHasher::new();
    write_node(&mut h, node);
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> AstFingerprint {
        let v = self.inner.digest128();
        AstFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_node(h: &mut StableHasher, node: &Node) {
    match node {
        Node::Function(f) => {
            h.write_u8(TAG_FUNCTION);
            h.write_str(f.name());
            h.write_u32(f.arguments().len() as u32);
            for arg in f.arguments() {
                write_node(h, arg);
            }
        }
        Node::Access(a) => {
            h.write_u8(TAG_ACCESS);
            h.write_bool(a.nulled());
            write_node(h, a.target());
            write_node(h, a.index());
        }
        Node::Value(lit) => write_literal(h, lit),
    }
}

fn write_literal(h: &mut StableHasher, lit: &Literal) {
    match lit {
        Literal::Int(v) => {
            h.write_u8(TAG_INT);
            h.write_i32(*v);
        }
        Literal::Decimal(v) => {
            // Normalized so that numerically equal decimals (2.1, 2.10) digest identically.
            h.write_u8(TAG_DECIMAL);
            h.write_str(&v.normalize().to_string());
        }
        Literal::Bool(v) => {
            h.write_u8(TAG_BOOL);
            h.write_bool(*v);
        }
        Literal::String(v) => {
            h.write_u8(TAG_STRING);
            h.write_str(v);
        }
    }
}
