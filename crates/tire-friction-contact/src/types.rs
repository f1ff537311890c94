//! Plain value types for contact data and rigid-body state.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::ContactError;

/// One contact point between two collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    /// Contact position in world coordinates.
    pub position: Point3<f64>,
    /// Unit contact normal in world coordinates.
    pub normal: Vector3<f64>,
    /// Force applied to body 1, expressed in body 1's local frame.
    pub force_on_body1: Vector3<f64>,
}

/// All contact points between one pair of collisions.
///
/// The three per-point sequences are stored as received. They must have the
/// same, non-zero length; [`Contact::points`] enforces that.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contact {
    /// Scoped name of the first collision.
    pub collision1: String,
    /// Scoped name of the second collision.
    pub collision2: String,
    /// Contact positions (world frame).
    pub positions: Vec<Point3<f64>>,
    /// Contact normals (world frame, unit length).
    pub normals: Vec<Vector3<f64>>,
    /// Force on body 1 per point (body 1 local frame).
    pub forces_on_body1: Vec<Vector3<f64>>,
}

impl Contact {
    /// Create an empty contact between two collisions.
    pub fn new(collision1: impl Into<String>, collision2: impl Into<String>) -> Self {
        Self {
            collision1: collision1.into(),
            collision2: collision2.into(),
            ..Self::default()
        }
    }

    /// Append a point, keeping the three sequences aligned.
    #[must_use]
    pub fn with_point(mut self, point: ContactPoint) -> Self {
        self.positions.push(point.position);
        self.normals.push(point.normal);
        self.forces_on_body1.push(point.force_on_body1);
        self
    }

    /// Number of positions carried by this contact.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.positions.len()
    }

    /// Iterate the contact points.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::Malformed`] if there are no points or the
    /// position, normal and force sequences differ in length.
    pub fn points(&self) -> Result<impl Iterator<Item = ContactPoint> + '_, ContactError> {
        let n = self.positions.len();
        if n == 0 || self.normals.len() != n || self.forces_on_body1.len() != n {
            return Err(ContactError::Malformed {
                collision1: self.collision1.clone(),
                collision2: self.collision2.clone(),
                positions: n,
                normals: self.normals.len(),
                forces: self.forces_on_body1.len(),
            });
        }
        Ok(self
            .positions
            .iter()
            .zip(&self.normals)
            .zip(&self.forces_on_body1)
            .map(|((position, normal), force)| ContactPoint {
                position: *position,
                normal: *normal,
                force_on_body1: *force,
            }))
    }
}

/// Contact event as posted by the host transport.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContactsMessage {
    /// Simulation time the contacts were captured at, in seconds.
    #[serde(default)]
    pub sim_time: Option<f64>,
    /// Zero or more contact records.
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

impl ContactsMessage {
    /// Create a message from a set of contacts.
    #[must_use]
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self {
            sim_time: None,
            contacts,
        }
    }

    /// Attach a simulation timestamp.
    #[must_use]
    pub fn at(mut self, sim_time: f64) -> Self {
        self.sim_time = Some(sim_time);
        self
    }
}

/// Contacts captured at one instant, owned by whoever holds it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContactSnapshot {
    sim_time: Option<f64>,
    contacts: Vec<Contact>,
}

impl ContactSnapshot {
    /// Deep-copy a received message.
    #[must_use]
    pub fn from_message(msg: &ContactsMessage) -> Self {
        Self {
            sim_time: msg.sim_time,
            contacts: msg.contacts.clone(),
        }
    }

    /// Capture time, when the transport supplied one.
    #[must_use]
    pub fn sim_time(&self) -> Option<f64> {
        self.sim_time
    }

    /// The contact records.
    #[must_use]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Number of contact records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// True when the snapshot holds no contacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

impl From<ContactsMessage> for ContactSnapshot {
    fn from(msg: ContactsMessage) -> Self {
        Self {
            sim_time: msg.sim_time,
            contacts: msg.contacts,
        }
    }
}

/// World pose and velocity of a rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    /// World pose of the body's reference frame.
    pub pose: Isometry3<f64>,
    /// Linear velocity of the reference origin (world frame, m/s).
    pub linear_velocity: Vector3<f64>,
    /// Angular velocity (world frame, rad/s).
    pub angular_velocity: Vector3<f64>,
}

impl Default for BodyState {
    fn default() -> Self {
        Self::at_rest(Point3::origin())
    }
}

impl BodyState {
    /// Create a body state from its parts.
    #[must_use]
    pub fn new(
        position: Point3<f64>,
        orientation: UnitQuaternion<f64>,
        linear_velocity: Vector3<f64>,
        angular_velocity: Vector3<f64>,
    ) -> Self {
        Self {
            pose: Isometry3::from_parts(Translation3::from(position.coords), orientation),
            linear_velocity,
            angular_velocity,
        }
    }

    /// A motionless, unrotated body at `position`.
    #[must_use]
    pub fn at_rest(position: Point3<f64>) -> Self {
        Self::new(
            position,
            UnitQuaternion::identity(),
            Vector3::zeros(),
            Vector3::zeros(),
        )
    }

    /// World position of the reference origin.
    #[must_use]
    pub fn origin(&self) -> Point3<f64> {
        Point3::from(self.pose.translation.vector)
    }

    /// World orientation.
    #[must_use]
    pub fn orientation(&self) -> &UnitQuaternion<f64> {
        &self.pose.rotation
    }

    /// Velocity of the material point at `point`: `v + omega x (p - origin)`.
    #[must_use]
    pub fn velocity_at_point(&self, point: &Point3<f64>) -> Vector3<f64> {
        let offset = point - self.origin();
        self.linear_velocity + self.angular_velocity.cross(&offset)
    }

    /// Rotate a vector from the body frame into the world frame.
    #[must_use]
    pub fn rotate_to_world(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.pose.rotation * local
    }
}
