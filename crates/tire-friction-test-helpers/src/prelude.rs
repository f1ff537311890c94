//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use tire_friction_test_helpers::prelude::*;
//! ```

pub use crate::must::must_some;

#[cfg(feature = "capture")]
pub use crate::capture::{CapturedEvent, CapturedLogs, capture_logs};

#[cfg(feature = "fixtures")]
pub use crate::fixtures::{
    GROUND, TIRE, TireContactFixture, ground_state, rolling_wheel, two_body_world,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
