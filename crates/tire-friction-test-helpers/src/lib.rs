//! Shared test utilities for the tire friction workspace.
//!
//! # Modules
//!
//! - [`mod@must`] - `must_some` with `#[track_caller]`
//! - [`fixtures`] - Rolling-wheel body states and tire/ground contacts
//! - [`capture`] - In-memory `tracing` capture for asserting on log output
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! tire-friction-test-helpers = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use tire_friction_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod must;
pub mod prelude;

#[cfg(feature = "capture")]
#[cfg_attr(docsrs, doc(cfg(feature = "capture")))]
pub mod capture;

#[cfg(feature = "fixtures")]
#[cfg_attr(docsrs, doc(cfg(feature = "fixtures")))]
pub mod fixtures;

pub use must::must_some;

#[cfg(feature = "capture")]
pub use capture::capture_logs;
