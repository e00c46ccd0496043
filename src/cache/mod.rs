//! Vitrina Object Cache
//!
//! A request-coalescing TTL cache shared by every data-access service:
//!
//! - **Store**: key → value with a per-entry deadline; lazy expiry plus a
//!   periodic sweep
//! - **Invalidation**: exact key, regex pattern, or everything
//! - **Transfer state**: values fetched during a server render pass are
//!   snapshotted into a payload the hydrating client consumes exactly once
//!
//! ## Configuration
//!
//! Cache behavior is controlled via `vitrina.toml`:
//!
//! ```toml
//! [cache]
//! enabled = true
//! sweep_interval_secs = 60
//! ```

mod config;
pub mod keys;
mod store;
mod transfer;

pub use config::CacheConfig;
pub use store::ObjectCache;
pub use transfer::{TransferPayload, TransferState};
