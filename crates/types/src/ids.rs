//! Newtype wrappers for identities that cross the layout/draw boundary.
//!
//! Renderer identity keys the accessibility tag tree; anchor ids key the
//! per-document target map filled during layout.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_RENDERER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a renderer fragment.
///
/// Split and overflow fragments keep the id of the renderer that produced them,
/// so the tags of all fragments of one element share a key. `next_renderer`
/// allocates a fresh one.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RendererId(u64);

impl RendererId {
    /// Allocates a process-unique id.
    pub fn next() -> Self {
        Self(NEXT_RENDERER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RendererId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// An identifier for a document anchor (element `id`).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct AnchorId(Arc<str>);

impl AnchorId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AnchorId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<String> for AnchorId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for AnchorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_ids_are_unique() {
        let a = RendererId::next();
        let b = RendererId::next();
        assert_ne!(a, b);
        assert!(b.value() > a.value());
    }

    #[test]
    fn anchor_id_round_trips_str() {
        let id = AnchorId::from("chapter-1");
        assert_eq!(id.as_str(), "chapter-1");
        assert_eq!(id.to_string(), "chapter-1");
    }
}
