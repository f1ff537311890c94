//! Error types for contact processing.
//!
//! None of these are fatal. The step path logs them and skips the offending
//! contact.

use thiserror::Error;

/// Reasons a contact record cannot contribute to the slip estimate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    /// Point sequences are empty or disagree in length.
    #[error(
        "No contacts or invalid contact message between {collision1} and {collision2}: \
         {positions} positions, {normals} normals, {forces} forces"
    )]
    Malformed {
        /// First collision name.
        collision1: String,
        /// Second collision name.
        collision2: String,
        /// Number of positions.
        positions: usize,
        /// Number of normals.
        normals: usize,
        /// Number of body-1 forces.
        forces: usize,
    },

    /// A collision name did not resolve to a body.
    #[error("Collision '{0}' does not resolve to a body")]
    UnresolvedCollision(String),
}

impl ContactError {
    /// Create an unresolved collision error.
    #[must_use]
    pub fn unresolved(collision: impl Into<String>) -> Self {
        Self::UnresolvedCollision(collision.into())
    }
}

/// A specialized `Result` type for contact operations.
pub type ContactResult<T> = std::result::Result<T, ContactError>;
