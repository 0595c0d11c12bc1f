//! # path-cache-store-mem
//!
//! The "trivial, interchangeable" in-memory backend named in the cache's
//! design scope, an authoritative `(app, prefix) -> PathPart` map behind
//! a single reader-writer lock, grounded on `original_source/database/db.go`'s
//! `InmemDb`, adapted to the single-shared-generation write discipline
//! the cache's invalidation scheme depends on: every `set_route` or
//! `del_route` call allocates one new generation `G` and stamps every
//! ancestor node and traversed edge with it, rather than bumping each
//! node's counter independently.

use std::collections::HashMap;
use std::fmt::Write as _;

use parking_lot::RwLock;
use thiserror::Error;

use path_cache::{ChildDescriptor, PathPart, RouteData, RouteStore, RouteStoreAdmin};

#[derive(Debug, Error)]
pub enum MemStoreError {
    #[error("app '{0}' does not exist")]
    AppNotFound(String),
    #[error("app '{0}' already exists")]
    AppAlreadyExists(String),
    #[error("app '{app}' has no route for '{path}'")]
    RouteNotFound { app: String, path: String },
}

/// In-memory reference store. Keyed by `app + prefix` exactly as the
/// wire `path` field describes it.
pub struct InMemoryStore<R: RouteData> {
    paths: RwLock<HashMap<String, PathPart<R>>>,
}

impl<R: RouteData> Default for InMemoryStore<R> {
    fn default() -> Self {
        InMemoryStore {
            paths: RwLock::new(HashMap::new()),
        }
    }
}

impl<R: RouteData> InMemoryStore<R> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: RouteData> RouteStore<R> for InMemoryStore<R> {
    type Error = MemStoreError;

    fn lookup_app(&self, app: &str) -> Result<Option<PathPart<R>>, Self::Error> {
        Ok(self.paths.read().get(app).cloned())
    }

    fn lookup_part(&self, app: &str, prefix: &str) -> Result<Option<PathPart<R>>, Self::Error> {
        let key = format!("{app}{prefix}");
        Ok(self.paths.read().get(&key).cloned())
    }
}

impl<R: RouteData> RouteStoreAdmin<R> for InMemoryStore<R> {
    fn add_app(&self, app: &str) -> Result<(), Self::Error> {
        let mut paths = self.paths.write();
        if paths.contains_key(app) {
            return Err(MemStoreError::AppAlreadyExists(app.to_string()));
        }
        paths.insert(app.to_string(), PathPart::new(app, 1));
        log::debug!("added app '{app}'");
        Ok(())
    }

    fn del_app(&self, app: &str) -> Result<(), Self::Error> {
        let mut paths = self.paths.write();
        if !paths.contains_key(app) {
            return Err(MemStoreError::AppNotFound(app.to_string()));
        }
        let descendant_prefix = format!("{app}/");
        paths.retain(|k, _| k != app && !k.starts_with(&descendant_prefix));
        log::debug!("deleted app '{app}' and all descendant prefixes");
        Ok(())
    }

    fn set_route(&self, app: &str, path: &str, data: R) -> Result<(), Self::Error> {
        let mut paths = self.paths.write();
        let root_generation = paths
            .get(app)
            .ok_or_else(|| MemStoreError::AppNotFound(app.to_string()))?
            .generation;
        let generation = root_generation + 1;

        let mut data = Some(data);
        for (prefix, next) in split_path(path) {
            let key = format!("{app}{prefix}");
            let node = paths
                .entry(key.clone())
                .or_insert_with(|| PathPart::new(key.clone(), generation));
            node.generation = generation;
            if next.is_empty() {
                node.route = data.take();
            } else {
                node.children
                    .entry(next.clone())
                    .and_modify(|c| c.generation = generation)
                    .or_insert(ChildDescriptor {
                        name: next,
                        generation,
                    });
            }
        }
        log::debug!("set_route '{app}{path}' at generation {generation}");
        Ok(())
    }

    fn del_route(&self, app: &str, path: &str) -> Result<(), Self::Error> {
        let mut paths = self.paths.write();
        if !paths.contains_key(app) {
            return Err(MemStoreError::AppNotFound(app.to_string()));
        }
        let leaf_key = format!("{app}{path}");
        match paths.get(&leaf_key) {
            Some(node) if node.route.is_some() => {}
            _ => {
                return Err(MemStoreError::RouteNotFound {
                    app: app.to_string(),
                    path: path.to_string(),
                })
            }
        }

        let generation = paths.get(app).unwrap().generation + 1;
        let mut erase = paths.get(&leaf_key).unwrap().children.is_empty();

        for (prefix, next) in split_path(path).into_iter().rev() {
            let key = format!("{app}{prefix}");
            if next.is_empty() {
                if let Some(node) = paths.get_mut(&key) {
                    node.route = None;
                }
            } else if erase {
                if let Some(node) = paths.get_mut(&key) {
                    node.children.remove(&next);
                }
            } else if let Some(node) = paths.get_mut(&key) {
                if let Some(child) = node.children.get_mut(&next) {
                    child.generation = generation;
                }
            }

            let now_empty = paths
                .get(&key)
                .map(|node| node.children.is_empty() && node.route.is_none() && !prefix.is_empty())
                .unwrap_or(false);

            if now_empty {
                paths.remove(&key);
                erase = true;
            } else {
                if let Some(node) = paths.get_mut(&key) {
                    node.generation = generation;
                }
                erase = false;
            }
        }
        log::debug!("del_route '{app}{path}' at generation {generation}");
        Ok(())
    }
}

impl<R: RouteData + std::fmt::Debug> InMemoryStore<R> {
    /// Dumps every stored prefix, its generation, its children's
    /// generations, and its route data (if any), sorted by key. Intended
    /// for test assertions and manual inspection, not for production
    /// diagnostics.
    pub fn dump(&self) -> String {
        let paths = self.paths.read();
        let mut keys: Vec<&String> = paths.keys().collect();
        keys.sort();

        let mut out = String::new();
        for key in keys {
            let node = &paths[key];
            let _ = write!(out, "prefix: {key} gen {}", node.generation);
            if !node.children.is_empty() {
                let mut children: Vec<&ChildDescriptor> = node.children.values().collect();
                children.sort_by(|a, b| a.name.cmp(&b.name));
                let _ = write!(out, " [");
                for child in children {
                    let _ = write!(out, "{}#{} ", child.name, child.generation);
                }
                let _ = write!(out, "]");
            }
            if let Some(route) = &node.route {
                let _ = write!(out, " route data: {route:?}");
            }
            out.push('\n');
        }
        out
    }
}

/// Split a path into a series of `(prefix, next_hop)` pairs, terminated
/// by `(full_prefix, "")`.
///
/// `"/"` and `""`         -> `[("", "")]`
/// `"/a"`                 -> `[("", "a"), ("/a", "")]`
/// `"/a/b/c"`              -> `[("", "a"), ("/a", "b"), ("/a/b", "c"), ("/a/b/c", "")]`
fn split_path(path: &str) -> Vec<(String, String)> {
    let normalized = if path == "/" { "" } else { path };
    let raw_parts: Vec<&str> = normalized.split('/').collect();
    let pieces: &[&str] = &raw_parts[1..];

    let mut parts = Vec::with_capacity(pieces.len() + 1);
    let mut prefix = String::new();
    for piece in pieces {
        parts.push((prefix.clone(), piece.to_string()));
        prefix.push('/');
        prefix.push_str(piece);
    }
    parts.push((prefix, String::new()));
    parts
}
