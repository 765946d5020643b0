//! Domain error types.

use thiserror::Error;

/// The kind of entity an operation targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// A user row.
    User,
    /// An event row.
    Event,
    /// A booking row.
    Booking,
}

impl Entity {
    /// Lowercase name used in messages and log fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Event => "event",
            Self::Booking => "booking",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed input. Never reaches storage.
    #[error("validation error: {0}")]
    Validation(String),

    /// The store matched zero rows for the targeted identity.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The entity kind that was looked up.
        entity: Entity,
        /// The identity that matched nothing.
        id: i64,
    },

    /// A uniqueness or referential constraint rejected the write.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Connectivity, query or decoding failure in the persistence layer.
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Shorthand for [`DomainError::NotFound`].
    #[must_use]
    pub fn not_found(entity: Entity, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}
