//! The cache-side trie: nodes with a per-node reader-writer lock, and
//! edges that lazily materialise their child on first traversal.
//!
//! This is deliberately not a transliteration of the source's `pathNode`
//! / `pathTuple` pair. The source mutates a child pointer under the
//! *parent*'s exclusive lock during refresh; here, an edge's child slot
//! is a [`OnceLock`] so that first-touch materialisation (spec §9,
//! "lazy child materialisation") doesn't need the parent's write lock at
//! all. Any reader holding the parent's read lock can initialise it.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::store::RouteData;

/// One outgoing edge from a trie node.
pub(crate) struct Edge<R: RouteData> {
    /// The generation the store reported for this edge the last time the
    /// parent node was refreshed. Compared against the child's own
    /// `local_generation` to detect a stale subtree.
    pub(crate) expected_generation: u64,
    /// Lazily materialised child. `OnceLock` gives first-touch creation
    /// without requiring exclusive access to the parent.
    pub(crate) child: OnceLock<Arc<TrieNode<R>>>,
}

impl<R: RouteData> Edge<R> {
    fn fresh(expected_generation: u64) -> Self {
        Edge {
            expected_generation,
            child: OnceLock::new(),
        }
    }

    /// Returns the child, materialising it with generation zero if this
    /// is the first time it has been requested.
    pub(crate) fn child(&self) -> Arc<TrieNode<R>> {
        self.child
            .get_or_init(|| Arc::new(TrieNode::new_empty(None)))
            .clone()
    }
}

pub(crate) struct TrieNodeInner<R: RouteData> {
    pub(crate) local_generation: u64,
    pub(crate) edges: HashMap<String, Edge<R>>,
    pub(crate) route: Option<R>,
}

/// A single prefix in the cache's trie.
///
/// Reference-counted and shared by edge: the node is exclusively owned
/// by the edge leading into it (or by the app record, for a root), but
/// multiple threads may hold a clone of the `Arc` while walking
/// concurrently, each taking the per-node lock independently.
pub struct TrieNode<R: RouteData> {
    pub(crate) inner: RwLock<TrieNodeInner<R>>,
}

impl<R: RouteData> TrieNode<R> {
    /// Builds a freshly-materialised node: no edges, the given route (if
    /// known already), and `local_generation: 0` so that the next
    /// refresh attempt against it is always forced. This is how both a
    /// lazily-materialised child and a freshly resolved app root end up
    /// with real contents.
    pub(crate) fn new_empty(route: Option<R>) -> Self {
        TrieNode {
            inner: RwLock::new(TrieNodeInner {
                local_generation: 0,
                edges: HashMap::new(),
                route,
            }),
        }
    }

    /// Rebuilds `edges` from a freshly-read store node's children,
    /// preserving already-materialised child subtrees so a refresh never
    /// discards in-flight work lower in the trie. Edges absent from the
    /// store node are dropped.
    pub(crate) fn rebuild_edges(
        inner: &mut TrieNodeInner<R>,
        children: HashMap<String, crate::store::ChildDescriptor>,
    ) {
        let mut rebuilt = HashMap::with_capacity(children.len());
        for (label, descriptor) in children {
            let edge = match inner.edges.remove(&label) {
                Some(existing) => Edge {
                    expected_generation: descriptor.generation,
                    child: existing.child,
                },
                None => Edge::fresh(descriptor.generation),
            };
            rebuilt.insert(label, edge);
        }
        inner.edges = rebuilt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct NoParams;
    impl RouteData for NoParams {
        fn params(&self) -> &[String] {
            &[]
        }
    }

    #[test]
    fn child_materialises_once_with_generation_zero() {
        let mut inner = TrieNodeInner::<NoParams> {
            local_generation: 5,
            edges: HashMap::new(),
            route: None,
        };
        inner.edges.insert(
            "a".to_string(),
            Edge::fresh(7),
        );
        let edge = inner.edges.get("a").unwrap();
        let first = edge.child();
        let second = edge.child();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.inner.read().local_generation, 0);
    }

    #[test]
    fn rebuild_preserves_existing_child_reference() {
        let mut inner = TrieNodeInner::<NoParams> {
            local_generation: 0,
            edges: HashMap::new(),
            route: None,
        };
        inner.edges.insert("a".to_string(), Edge::fresh(1));
        let child_before = inner.edges.get("a").unwrap().child();

        let mut children = HashMap::new();
        children.insert(
            "a".to_string(),
            crate::store::ChildDescriptor {
                name: "a".to_string(),
                generation: 2,
            },
        );
        TrieNode::rebuild_edges(&mut inner, children);

        let edge_after = inner.edges.get("a").unwrap();
        assert_eq!(edge_after.expected_generation, 2);
        let child_after = edge_after.child();
        assert!(Arc::ptr_eq(&child_before, &child_after));
    }

    #[test]
    fn rebuild_drops_edges_absent_from_store() {
        let mut inner = TrieNodeInner::<NoParams> {
            local_generation: 0,
            edges: HashMap::new(),
            route: None,
        };
        inner.edges.insert("a".to_string(), Edge::fresh(1));
        TrieNode::rebuild_edges(&mut inner, HashMap::new());
        assert!(inner.edges.is_empty());
    }
}
