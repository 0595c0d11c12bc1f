//! The store contract the cache assumes of its backing route database.
//!
//! None of the types here are implementations. They describe the wire
//! shape and the generation-propagation rule a backend must honor for the
//! cache's lazy, per-node invalidation to be sound (see the crate-level
//! docs for the generation scheme). `path-cache-store-mem` is one such
//! backend; any persistent store satisfying [`RouteStore`] /
//! [`RouteStoreAdmin`] is interchangeable with it.

use std::collections::HashMap;
use std::error::Error as StdError;

/// A caller-defined value attached to a terminal route.
///
/// The cache treats everything about `Self` as opaque except the ordered
/// list of parameter names bound by the pattern's wildcards, one name per
/// `:` or `&` hop, in encounter order. A mismatch between `params().len()`
/// and the number of wildcards actually traversed is a pattern-author
/// error (see `Cache::get_route`'s panic-free zip, which simply stops
/// early rather than index out of bounds).
pub trait RouteData: Clone {
    /// Ordered parameter names, one per wildcard in the pattern.
    fn params(&self) -> &[String];
}

/// A child edge descriptor, as carried in [`PathPart::children`].
///
/// `generation` is the generation the store reported for the edge leading
/// into this child the last time the parent was read. The cache compares
/// it against the child's own locally-cached generation to decide whether
/// the child subtree needs refreshing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildDescriptor {
    pub name: String,
    pub generation: u64,
}

/// The store's representation of one trie node, keyed by `app + prefix`.
///
/// This is the wire shape described in spec §6: `path` is informational,
/// `generation` is the node's own monotone counter, `children` maps edge
/// labels (literal hops, `":"`, or `"&"`) to their descriptors, and
/// `route` is present iff this prefix is itself a terminal route.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPart<R: RouteData> {
    pub path: String,
    pub generation: u64,
    pub children: HashMap<String, ChildDescriptor>,
    pub route: Option<R>,
}

impl<R: RouteData> PathPart<R> {
    pub fn new(path: impl Into<String>, generation: u64) -> Self {
        PathPart {
            path: path.into(),
            generation,
            children: HashMap::new(),
            route: None,
        }
    }
}

/// Read side of the store contract, consumed by the cache on every miss
/// or staleness detection.
///
/// Both methods return `Ok(None)` for "doesn't exist" rather than an
/// error. `LookupApp(app) -> None` is a definitive, negatively-cacheable
/// "app unknown"; `LookupPart(app, prefix) -> None` is a mid-walk
/// deletion race and is treated as a plain no-match without disturbing
/// any cached negative state. Only genuine communication/internal
/// failures should surface as `Err`.
pub trait RouteStore<R: RouteData> {
    type Error: StdError + Send + Sync + 'static;

    fn lookup_app(&self, app: &str) -> Result<Option<PathPart<R>>, Self::Error>;

    fn lookup_part(&self, app: &str, prefix: &str) -> Result<Option<PathPart<R>>, Self::Error>;
}

/// Write side of the store contract.
///
/// Not used by the cache itself. It's the contract callers populating
/// the store must honor so that the cache's generation-based
/// invalidation stays sound (spec §3 invariant 5): every ancestor node
/// along a written path, and every edge descended into, must receive the
/// new generation.
pub trait RouteStoreAdmin<R: RouteData>: RouteStore<R> {
    fn add_app(&self, app: &str) -> Result<(), Self::Error>;

    fn del_app(&self, app: &str) -> Result<(), Self::Error>;

    fn set_route(&self, app: &str, path: &str, data: R) -> Result<(), Self::Error>;

    fn del_route(&self, app: &str, path: &str) -> Result<(), Self::Error>;
}
