//! Structural (`hash`) and semantic (`shash`) digests for objects.
//!
//! ```text
//! SHA-256(kind || 0x00 || part_0 || 0x1f || part_1 || 0x1f || ...)
//! ```
//!
//! The kind prefix keeps a leaf and a tree with the same content apart.
//! `hash` covers content plus structure (children, parent) and changes when
//! the object is re-attached; `shash` covers content only.

use sha2::{Digest, Sha256};

use crate::kind::ObjectKind;

const SEPARATOR: u8 = 0x1f;

/// Digest of `parts` under `kind`, as lowercase hex.
pub fn digest(kind: ObjectKind, parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_str().as_bytes());
    hasher.update([0]);
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update([SEPARATOR]);
        }
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}
