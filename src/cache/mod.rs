//! Transient cache of read results.
//!
//! Lists are cached under [`QueryKey::List`], single rows under
//! [`QueryKey::Row`]. A successful mutation drops the list entry of its
//! table; it never patches cached rows.
//!
//! ```toml
//! [cache]
//! enabled = true
//! max_size = 1000
//! ttl_seconds = 300
//! ```

mod error;
mod key;
mod manager;
mod memory;
mod noop;
mod traits;

pub use error::CacheError;
pub use key::QueryKey;
pub use manager::QueryCache;
pub use traits::AppCache;

pub use crate::config::settings::CacheConfig;
