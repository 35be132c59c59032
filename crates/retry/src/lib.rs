//! Bounded retry with exponential backoff.
//!
//! Hazard adapters and ground-truth stores sit behind networks that go
//! away. Callers wrap each upstream request in [`retry`], which re-issues it
//! while the error reports itself as [`Transient`] and the
//! [`RetryPolicy`] budget allows.
//!
//! ```
//! use std::time::Duration;
//! use hmhews_retry::{RetryPolicy, Transient, retry};
//!
//! #[derive(Debug)]
//! struct Offline;
//! impl std::fmt::Display for Offline {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         f.write_str("offline")
//!     }
//! }
//! impl Transient for Offline {
//!     fn is_transient(&self) -> bool { true }
//! }
//!
//! let policy = RetryPolicy::new(3).with_initial_backoff(Duration::ZERO);
//! let mut calls = 0;
//! let out: Result<u32, _> = retry(&policy, "ping", || {
//!     calls += 1;
//!     if calls < 3 { Err(Offline) } else { Ok(7) }
//! });
//! assert_eq!(out.unwrap(), 7);
//! assert_eq!(calls, 3);
//! ```

mod error;
mod policy;

pub use error::RetryError;
pub use policy::{RetryPolicy, Transient, retry};
