//! Error types surfaced by the cache.
//!
//! Of the three kinds described in spec §7, only `StoreCommunication`
//! ever reaches a caller: a mid-walk deletion is resolved internally to
//! a plain no-match, and an unknown app or unmatched path is `Ok(None)`,
//! never an `Err`. So there is exactly one variant here. It exists
//! mainly to give the store's opaque error type a named home rather than
//! passing it through bare.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError<E: std::error::Error + 'static> {
    #[error("route store communication error: {0}")]
    Store(#[from] E),
}
