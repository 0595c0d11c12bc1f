//! Minimal CLI driver: seeds a handful of routes into the in-memory
//! store and resolves one or more paths against the cache, printing
//! the matched route and its captured parameters.
//!
//! This exists for a runnable example only. It is the out-of-scope
//! "application entrypoint/demo driver" named in the cache's design
//! scope, and contains no cache logic of its own.

use std::time::Duration;

use clap::Parser;
use log::info;

use path_cache::{Cache, CacheConfig, RouteData};
use path_cache_store_mem::InMemoryStore;

/// Seed a demo route tree and resolve paths against it.
#[derive(Parser)]
#[command(name = "path-cache-demo")]
#[command(about = "Seeds a demo route tree and resolves paths against path-cache", long_about = None)]
struct Cli {
    /// Paths to resolve against the seeded "demo" app, in order.
    #[arg(default_values_t = [
        "/graph".to_string(),
        "/graph/view".to_string(),
        "/graph/view/foo".to_string(),
        "/graph/2934/stage/4372".to_string(),
        "/graph/4234".to_string(),
        "/graph/4234/x/y/z".to_string(),
        "/no/such/route".to_string(),
    ])]
    paths: Vec<String>,

    /// Positive TTL, in milliseconds, for a populated app record.
    #[arg(long, default_value_t = 5_000)]
    positive_ttl_ms: u64,

    /// Negative TTL, in milliseconds, for an "app unknown" record.
    #[arg(long, default_value_t = 1_000)]
    negative_ttl_ms: u64,
}

#[derive(Clone, Debug)]
struct DemoRoute {
    label: &'static str,
    params: Vec<String>,
}

impl RouteData for DemoRoute {
    fn params(&self) -> &[String] {
        &self.params
    }
}

fn demo_route(label: &'static str, params: &[&str]) -> DemoRoute {
    DemoRoute {
        label,
        params: params.iter().map(|s| s.to_string()).collect(),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let store = InMemoryStore::new();
    store.add_app("demo").expect("fresh store, app cannot already exist");
    store
        .set_route("demo", "/graph", demo_route("graph-root", &[]))
        .expect("app exists");
    store
        .set_route("demo", "/graph/view", demo_route("graph-view", &[]))
        .expect("app exists");
    store
        .set_route(
            "demo",
            "/graph/:/stage/:",
            demo_route("graph-stage", &["graphId", "stageId"]),
        )
        .expect("app exists");
    store
        .set_route("demo", "/graph/:/&", demo_route("graph-rest", &["graphId", "rest"]))
        .expect("app exists");
    store
        .set_route("demo", "/graph/:", demo_route("graph-by-id", &["gId"]))
        .expect("app exists");

    info!("seeded demo route tree:\n{}", store.dump());

    let cache = Cache::new(
        store,
        CacheConfig::new(
            Duration::from_millis(cli.positive_ttl_ms),
            Duration::from_millis(cli.negative_ttl_ms),
        ),
    );

    for path in &cli.paths {
        match cache.get_route("demo", path) {
            Ok(Some(m)) => {
                println!("{path} -> {} {:?}", m.route.label, m.params);
            }
            Ok(None) => {
                println!("{path} -> no match");
            }
            Err(err) => {
                println!("{path} -> store error: {err}");
            }
        }
    }
}
