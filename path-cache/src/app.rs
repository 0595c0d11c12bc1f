//! The top-level app map: app name -> app record.

use std::sync::Arc;
use std::time::Instant;

use crate::store::RouteData;
use crate::trie::TrieNode;

/// `{ generation, root_node?, expire_at }` from spec §3.
///
/// `root` is `None` for a negatively-cached app (app unknown at the
/// store as of the last lookup); it remains so until `expire_at` passes,
/// per invariant 3.
pub(crate) struct AppRecord<R: RouteData> {
    pub(crate) generation: u64,
    pub(crate) root: Option<Arc<TrieNode<R>>>,
    pub(crate) expire_at: Instant,
}

impl<R: RouteData> AppRecord<R> {
    pub(crate) fn is_fresh(&self, now: Instant) -> bool {
        now < self.expire_at
    }
}
