//! # path-cache
//!
//! A path-parameter routing cache: given an application name and a
//! request path, resolves the path against a tree of registered route
//! patterns (literal hops plus two wildcard kinds) and returns the
//! associated route payload and extracted parameter bindings.
//!
//! ## Architecture
//!
//! The cache sits between request handlers and an authoritative route
//! store (anything implementing [`store::RouteStore`]), amortising store
//! lookups while staying coherent with upstream edits through monotone
//! per-app generation numbers rather than a blanket TTL on every node:
//!
//! - **App map** (`app` name -> app record): TTL-bounded. A populated
//!   record is revalidated after `positive_ttl`; a negative "app
//!   unknown" record after `negative_ttl`.
//! - **Trie** (one per app): generation-bounded, not TTL-bounded. Each
//!   node tracks the generation it last observed; each edge into a
//!   child carries the generation that child is *expected* to be at.
//!   A node is refreshed from the store only when an incoming edge's
//!   expected generation has outrun the node's own.
//!
//! Match priority among overlapping patterns is fixed: a literal hop
//! beats a single-segment wildcard (`:`), which beats a rest-of-path
//! wildcard (`&`), enforced structurally by trying edges in that order
//! at each hop.
//!
//! ## Concurrency
//!
//! `get_route` may be called concurrently from any thread, for any app
//! or node, without external synchronization. There is no background
//! task. All refresh work happens inline on the calling thread, guarded
//! by a reader-writer lock on the app map and one per trie node. See
//! [`cache::Cache`] for the full walk-through.
//!
//! ## Example
//!
//! ```ignore
//! use path_cache::{Cache, CacheConfig};
//! use std::time::Duration;
//!
//! let cache = Cache::new(my_store, CacheConfig::new(
//!     Duration::from_secs(5),
//!     Duration::from_secs(1),
//! ));
//! if let Some(m) = cache.get_route("my-app", "/graph/42/stage/1")? {
//!     println!("{:?} {:?}", m.route, m.params);
//! }
//! # Ok::<(), path_cache::CacheError<std::convert::Infallible>>(())
//! ```

mod app;
mod cache;
mod config;
mod error;
mod store;
mod trie;

pub use cache::{Cache, RouteMatch};
pub use config::CacheConfig;
pub use error::CacheError;
pub use store::{ChildDescriptor, PathPart, RouteData, RouteStore, RouteStoreAdmin};
pub use trie::TrieNode;
