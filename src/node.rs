//! SIPP node identity and the arena of expanded/open records (`spec.md` §3).

use crate::time::Time;

/// `(i, j, interval_id)` — the identity used for equality, hashing, and
/// closed-set membership. Two nodes with the same identity represent the
/// same state; only the one with the best `g` (settled first, under the
/// `(f, g)` ordering) is kept.
pub type NodeId = (usize, usize, usize);

/// A record in the search arena. Parent links are arena indices rather than
/// owning pointers, so the closed set and open queue can both refer to a
/// node without shared mutable ownership or cyclic references.
#[derive(Debug, Clone, Copy)]
pub struct NodeRecord {
    pub id: NodeId,
    pub g: Time,
    pub h: Time,
    pub parent: Option<usize>,
}

impl NodeRecord {
    pub fn f(&self) -> Time {
        crate::time::time(self.g.0 + self.h.0)
    }
}
