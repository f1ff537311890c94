//! Slip and reference speed from contact geometry.
//!
//! For each contact point:
//! - compute each body's velocity at the point (`v + omega x r`)
//! - take the relative velocity and drop its component along the normal
//! - weight by the magnitude of the normal force
//!
//! Points are averaged per contact, then contacts are averaged using their
//! total normal force as weight.

use std::collections::HashMap;
use std::hash::BuildHasher;

use serde::Serialize;
use tracing::{error, trace};

use crate::error::{ContactError, ContactResult};
use crate::types::{BodyState, Contact, ContactPoint, ContactSnapshot};

/// Maps a collision name to the state of the body that owns it.
pub trait BodyResolver {
    /// World state of the body owning `collision`, if known.
    fn resolve_body(&self, collision: &str) -> Option<BodyState>;
}

impl<S: BuildHasher> BodyResolver for HashMap<String, BodyState, S> {
    fn resolve_body(&self, collision: &str) -> Option<BodyState> {
        self.get(collision).copied()
    }
}

impl<R: BodyResolver + ?Sized> BodyResolver for &R {
    fn resolve_body(&self, collision: &str) -> Option<BodyState> {
        (**self).resolve_body(collision)
    }
}

/// Kinematics of a single contact point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointKinematics {
    /// Tangential relative speed at the point (m/s).
    pub slip_speed: f64,
    /// Largest of the point and body-origin speeds (m/s).
    pub reference_speed: f64,
    /// Normal force magnitude (N).
    pub weight: f64,
}

/// Weighted slip and reference speed for a contact or a whole snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateKinematics {
    /// Normal-force weighted slip speed (m/s).
    pub slip_speed: f64,
    /// Normal-force weighted reference speed (m/s).
    pub reference_speed: f64,
    /// Sum of weights that produced the averages (N).
    pub total_weight: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct WeightedSum {
    slip: f64,
    reference: f64,
    weight: f64,
}

impl WeightedSum {
    fn add(&mut self, slip_speed: f64, reference_speed: f64, weight: f64) {
        self.slip += slip_speed * weight;
        self.reference += reference_speed * weight;
        self.weight += weight;
    }

    /// Weighted means; `None` when nothing carried load.
    fn mean(&self) -> Option<AggregateKinematics> {
        if self.weight > 0.0 && self.weight.is_finite() {
            Some(AggregateKinematics {
                slip_speed: self.slip / self.weight,
                reference_speed: self.reference / self.weight,
                total_weight: self.weight,
            })
        } else {
            None
        }
    }
}

/// Converts contact snapshots into one slip/reference speed pair per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlipVelocityComputer;

impl SlipVelocityComputer {
    /// Aggregate slip and reference speed over every valid contact.
    ///
    /// Contacts that are malformed or whose collisions do not resolve are
    /// logged and skipped. Returns `None` when no contact carried any normal
    /// force; the caller should then keep its previous coefficient.
    pub fn compute<R>(&self, snapshot: &ContactSnapshot, resolver: &R) -> Option<AggregateKinematics>
    where
        R: BodyResolver + ?Sized,
    {
        let mut total = WeightedSum::default();
        for contact in snapshot.contacts() {
            match self.contact_kinematics(contact, resolver) {
                // A contact with zero load contributes zero weight.
                Ok(Some(k)) => total.add(k.slip_speed, k.reference_speed, k.total_weight),
                Ok(None) => trace!(
                    collision1 = %contact.collision1,
                    collision2 = %contact.collision2,
                    "Contact carries no normal force"
                ),
                Err(err) => error!("{err}"),
            }
        }
        total.mean()
    }

    /// Weighted kinematics of one contact.
    ///
    /// `Ok(None)` means the contact is valid but carries no normal force.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError`] if the contact is malformed or either
    /// collision fails to resolve.
    pub fn contact_kinematics<R>(
        &self,
        contact: &Contact,
        resolver: &R,
    ) -> ContactResult<Option<AggregateKinematics>>
    where
        R: BodyResolver + ?Sized,
    {
        let body1 = resolver
            .resolve_body(&contact.collision1)
            .ok_or_else(|| ContactError::unresolved(contact.collision1.as_str()))?;
        let body2 = resolver
            .resolve_body(&contact.collision2)
            .ok_or_else(|| ContactError::unresolved(contact.collision2.as_str()))?;

        let mut sum = WeightedSum::default();
        for point in contact.points()? {
            let k = Self::point_kinematics(&point, &body1, &body2);
            sum.add(k.slip_speed, k.reference_speed, k.weight);
        }
        Ok(sum.mean())
    }

    /// Slip speed, reference speed and weight at one contact point.
    #[must_use]
    pub fn point_kinematics(point: &ContactPoint, body1: &BodyState, body2: &BodyState) -> PointKinematics {
        let velocity1 = body1.velocity_at_point(&point.position);
        let velocity2 = body2.velocity_at_point(&point.position);

        let normal = point.normal;
        let mut slip_velocity = velocity1 - velocity2;
        slip_velocity -= normal * slip_velocity.dot(&normal);

        let weight = normal
            .dot(&body1.rotate_to_world(&point.force_on_body1))
            .abs();

        // Body-origin speeds guard against a point that is momentarily at
        // rest while the whole body translates.
        let reference_speed = velocity1
            .norm()
            .max(velocity2.norm())
            .max(body1.linear_velocity.norm())
            .max(body2.linear_velocity.norm());

        PointKinematics {
            slip_speed: slip_velocity.norm(),
            reference_speed,
            weight,
        }
    }
}
