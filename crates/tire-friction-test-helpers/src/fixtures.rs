//! Test fixtures for tire/ground contact scenarios.

use std::collections::HashMap;

use nalgebra::{Point3, UnitQuaternion, Vector3};
use tire_friction_contact::{BodyState, Contact, ContactPoint, ContactsMessage};

/// Collision name used for the tire in fixtures.
pub const TIRE: &str = "vehicle::wheel::tire";
/// Collision name used for the ground in fixtures.
pub const GROUND: &str = "ground_plane::link::collision";

/// State of a wheel of `radius` touching the ground at the world origin,
/// hub moving along +x at `speed`, spinning so that the contact patch slips
/// backwards at `slip_ratio * speed`.
pub fn rolling_wheel(speed: f64, slip_ratio: f64, radius: f64) -> BodyState {
    let spin = if radius > 0.0 {
        speed * (1.0 + slip_ratio) / radius
    } else {
        0.0
    };
    BodyState::new(
        Point3::new(0.0, 0.0, radius),
        UnitQuaternion::identity(),
        Vector3::new(speed, 0.0, 0.0),
        Vector3::new(0.0, spin, 0.0),
    )
}

/// Static ground at the origin.
pub fn ground_state() -> BodyState {
    BodyState::at_rest(Point3::origin())
}

/// A resolver holding the tire and ground bodies.
pub fn two_body_world(tire: BodyState) -> HashMap<String, BodyState> {
    let mut bodies = HashMap::new();
    bodies.insert(TIRE.to_string(), tire);
    bodies.insert(GROUND.to_string(), ground_state());
    bodies
}

/// Builder for a tire-versus-ground contact.
#[derive(Debug, Clone)]
pub struct TireContactFixture {
    contact: Contact,
}

impl Default for TireContactFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TireContactFixture {
    /// Empty tire/ground contact.
    pub fn new() -> Self {
        Self {
            contact: Contact::new(TIRE, GROUND),
        }
    }

    /// Add a point on the ground plane at `x` carrying `load` newtons along
    /// the tire's local +z axis.
    pub fn point(mut self, x: f64, load: f64) -> Self {
        self.contact = self.contact.with_point(ContactPoint {
            position: Point3::new(x, 0.0, 0.0),
            normal: Vector3::z(),
            force_on_body1: Vector3::new(0.0, 0.0, load),
        });
        self
    }

    /// Finished contact.
    pub fn build(self) -> Contact {
        self.contact
    }

    /// Contact wrapped in a single-contact message.
    pub fn message(self) -> ContactsMessage {
        ContactsMessage::new(vec![self.contact])
    }
}
