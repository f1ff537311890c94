//! Contact Ingestion and Slip Kinematics
//!
//! This crate turns asynchronous contact events into one slip/reference
//! speed pair per physics tick.
//!
//! # Architecture
//!
//! - [`ingestor`]: latest-wins single-slot handoff between the transport
//!   thread and the physics step, with stall monitoring
//! - [`kinematics`]: per-point rigid-body velocity and normal-force weighted
//!   aggregation across points and contacts
//! - [`types`]: plain value types (`Contact`, `ContactSnapshot`, `BodyState`)
//! - [`error`]: non-fatal contact errors
//!
//! # RT Safety
//!
//! `ContactIngestor::take_snapshot_if_dirty()` holds its lock only for a
//! move. `SlipVelocityComputer::compute()` does not allocate; it logs when a
//! contact has to be skipped.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use std::time::Duration;
//! use nalgebra::{Point3, UnitQuaternion, Vector3};
//! use tire_friction_contact::prelude::*;
//!
//! let mut bodies = HashMap::new();
//! bodies.insert(
//!     "tire".to_string(),
//!     BodyState::new(Point3::origin(), UnitQuaternion::identity(), Vector3::new(2.0, 0.0, 0.0), Vector3::zeros()),
//! );
//! bodies.insert("ground".to_string(), BodyState::default());
//!
//! let contact = Contact::new("tire", "ground").with_point(ContactPoint {
//!     position: Point3::origin(),
//!     normal: Vector3::z(),
//!     force_on_body1: Vector3::new(0.0, 0.0, 50.0),
//! });
//!
//! let ingestor = ContactIngestor::new();
//! ingestor.on_contact_message(&ContactsMessage::new(vec![contact]));
//!
//! let snapshot = ingestor.take_snapshot_if_dirty(Duration::from_millis(1));
//! let kinematics = snapshot.and_then(|s| SlipVelocityComputer.compute(&s, &bodies));
//! assert!(kinematics.is_some_and(|k| (k.slip_speed - 2.0).abs() < 1e-12));
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![warn(missing_docs, rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod ingestor;
pub mod kinematics;
pub mod prelude;
pub mod types;

pub use error::{ContactError, ContactResult};
pub use ingestor::{ContactIngestor, DEFAULT_STALL_THRESHOLD, IngestStats};
pub use kinematics::{AggregateKinematics, BodyResolver, PointKinematics, SlipVelocityComputer};
pub use types::{BodyState, Contact, ContactPoint, ContactSnapshot, ContactsMessage};
