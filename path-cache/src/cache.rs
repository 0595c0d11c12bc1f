//! The cache proper: app resolution, path walking, and per-node refresh.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::app::AppRecord;
use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::store::{RouteData, RouteStore};
use crate::trie::TrieNode;

/// The result of a successful [`Cache::get_route`] lookup: the matched
/// route's payload plus the parameter bindings captured along the way.
#[derive(Clone, Debug)]
pub struct RouteMatch<R: RouteData> {
    pub route: R,
    pub params: HashMap<String, String>,
}

/// A lazily populated, generation-validated routing cache.
///
/// See the crate-level docs for the full design. In short: a two-level
/// structure (app map -> trie) with a reader-writer lock on the app map
/// and one per trie node, refreshed from `store` on TTL expiry (app
/// level) or generation staleness (node level), never on a schedule of
/// its own; there is no background task, all work happens on the
/// caller's thread inside `get_route`.
pub struct Cache<R: RouteData, S: RouteStore<R>> {
    store: S,
    positive_ttl: std::time::Duration,
    negative_ttl: std::time::Duration,
    apps: RwLock<HashMap<String, AppRecord<R>>>,
}

/// Outcome of one candidate-edge probe against a (possibly just
/// refreshed) node.
enum Matched<R: RouteData> {
    Edge {
        label: String,
        expected_generation: u64,
        child: Arc<TrieNode<R>>,
    },
    None,
}

impl<R: RouteData, S: RouteStore<R>> Cache<R, S> {
    pub fn new(store: S, config: CacheConfig) -> Self {
        Cache {
            store,
            positive_ttl: config.positive_ttl,
            negative_ttl: config.negative_ttl,
            apps: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves `app` to its route and captured parameters, if any.
    ///
    /// Returns `Ok(None)` for both "no such app" and "no route covers
    /// this path", the two are indistinguishable at this contract by
    /// design (spec §4.1): callers treat a null payload as "not a
    /// configured route" either way. Store communication errors bubble
    /// up unchanged and are never cached as a negative result.
    pub fn get_route(&self, app: &str, path: &str) -> Result<Option<RouteMatch<R>>, CacheError<S::Error>> {
        let (generation, root) = self.resolve_app(app)?;
        let root = match root {
            Some(root) => root,
            None => return Ok(None),
        };

        let normalized = if path == "/" { "" } else { path };
        let raw_parts: Vec<&str> = normalized.split('/').collect();
        let pieces: &[&str] = &raw_parts[1..];

        let mut expected_generation = generation;
        let mut node = root;
        let mut prefix = String::new();
        let mut captured: Vec<String> = Vec::new();

        let mut i = 0;
        while i < pieces.len() {
            let piece = pieces[i];
            let candidates = [piece, ":", "&"];
            let matched = self.next_part(app, &prefix, expected_generation, &node, &candidates)?;
            let (label, child_expected_generation, child) = match matched {
                Matched::Edge {
                    label,
                    expected_generation,
                    child,
                } => (label, expected_generation, child),
                Matched::None => return Ok(None),
            };

            prefix.push('/');
            prefix.push_str(&label);

            let stop = match label.as_str() {
                ":" => {
                    captured.push(piece.to_string());
                    false
                }
                "&" => {
                    captured.push(pieces[i..].join("/"));
                    true
                }
                _ => false,
            };

            expected_generation = child_expected_generation;
            node = child;
            if stop {
                break;
            }
            i += 1;
        }

        // Force a leaf refresh: this is the sole place the terminal
        // node's `route` gets populated if it was stale or never
        // visited before.
        let _ = self.next_part(app, &prefix, expected_generation, &node, &[])?;

        let route = {
            let inner = node.inner.read();
            match &inner.route {
                Some(route) => route.clone(),
                None => return Ok(None),
            }
        };

        let mut params = HashMap::with_capacity(route.params().len());
        for (name, value) in route.params().iter().zip(captured.into_iter()) {
            params.insert(name.clone(), value);
        }
        Ok(Some(RouteMatch { route, params }))
    }

    /// App resolution (spec §4.2): shared-read fast path, then an
    /// exclusive-lock refresh that re-checks freshness before touching
    /// the store, so two racing callers never both pay for a lookup.
    fn resolve_app(
        &self,
        app: &str,
    ) -> Result<(u64, Option<Arc<TrieNode<R>>>), CacheError<S::Error>> {
        let now = Instant::now();
        {
            let apps = self.apps.read();
            if let Some(record) = apps.get(app) {
                if record.is_fresh(now) {
                    log::trace!("app '{app}' cache hit, generation {}", record.generation);
                    return Ok((record.generation, record.root.clone()));
                }
            }
        }

        let mut apps = self.apps.write();
        if let Some(record) = apps.get(app) {
            if record.is_fresh(Instant::now()) {
                // Someone else refreshed it while we waited for the lock.
                return Ok((record.generation, record.root.clone()));
            }
        }

        log::debug!("refreshing app record for '{app}'");
        let fresh = match self.store.lookup_app(app)? {
            None => {
                log::debug!("app '{app}' not found in store, negatively caching");
                AppRecord {
                    generation: 0,
                    root: None,
                    expire_at: Instant::now() + self.negative_ttl,
                }
            }
            Some(node) => AppRecord {
                generation: node.generation,
                root: Some(Arc::new(TrieNode::new_empty(node.route))),
                expire_at: Instant::now() + self.positive_ttl,
            },
        };
        let result = (fresh.generation, fresh.root.clone());
        apps.insert(app.to_string(), fresh);
        Ok(result)
    }

    /// Node refresh and candidate match (spec §4.4).
    ///
    /// If `node`'s `local_generation` is at least `expected_generation`,
    /// no store call is made, we just pick the first present candidate.
    /// Otherwise the node is refreshed from the store under its
    /// exclusive lock (held across the store call; see crate docs on
    /// why this is acceptable) before picking.
    fn next_part(
        &self,
        app: &str,
        prefix: &str,
        expected_generation: u64,
        node: &Arc<TrieNode<R>>,
        candidates: &[&str],
    ) -> Result<Matched<R>, CacheError<S::Error>> {
        {
            let inner = node.inner.read();
            if inner.local_generation >= expected_generation {
                return Ok(pick(&inner, candidates));
            }
        }

        let mut inner = node.inner.write();
        if inner.local_generation < expected_generation {
            log::debug!(
                "refreshing node '{app}{prefix}' (local {} < expected {expected_generation})",
                inner.local_generation
            );
            match self.store.lookup_part(app, prefix)? {
                None => {
                    log::debug!("'{app}{prefix}' vanished mid-walk, treating as no-match");
                    return Ok(Matched::None);
                }
                Some(store_node) => {
                    inner.local_generation = store_node.generation;
                    inner.route = store_node.route;
                    TrieNode::rebuild_edges(&mut inner, store_node.children);
                }
            }
        }
        Ok(pick(&inner, candidates))
    }
}

fn pick<R: RouteData>(
    inner: &crate::trie::TrieNodeInner<R>,
    candidates: &[&str],
) -> Matched<R> {
    for &label in candidates {
        if let Some(edge) = inner.edges.get(label) {
            return Matched::Edge {
                label: label.to_string(),
                expected_generation: edge.expected_generation,
                child: edge.child(),
            };
        }
    }
    Matched::None
}
