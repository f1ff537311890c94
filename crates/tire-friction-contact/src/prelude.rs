//! Prelude for tire-friction-contact.
//!
//! This module re-exports the most commonly used types for convenient importing.

pub use crate::error::{ContactError, ContactResult};
pub use crate::ingestor::{ContactIngestor, DEFAULT_STALL_THRESHOLD, IngestStats};
pub use crate::kinematics::{AggregateKinematics, BodyResolver, PointKinematics, SlipVelocityComputer};
pub use crate::types::{BodyState, Contact, ContactPoint, ContactSnapshot, ContactsMessage};
