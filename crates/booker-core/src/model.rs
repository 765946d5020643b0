//! Entity records and their writable field sets.
//!
//! Each entity comes as a pair: the stored record (with its server-assigned
//! `id`) and a `*Fields` struct holding what a client may write. Create and
//! update both take the full field set; there is no partial update.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identity.
    pub id: i64,
    /// Display name, never empty.
    pub name: String,
    /// Email address, unique across all users.
    pub email: String,
}

/// Writable fields of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserFields {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl UserFields {
    /// Checks the invariants the store cannot express.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `name` is blank.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("user name must not be empty".into()));
        }
        Ok(())
    }

    /// Attaches an identity, producing the full record.
    #[must_use]
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

/// Something that can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned identity.
    pub id: i64,
    /// Event title.
    pub title: String,
    /// Free-form description, may be empty.
    pub description: String,
}

/// Writable fields of an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventFields {
    /// Event title.
    pub title: String,
    /// Free-form description. Defaults to empty when omitted.
    #[serde(default)]
    pub description: String,
}

impl EventFields {
    /// Attaches an identity, producing the full record.
    #[must_use]
    pub fn into_event(self, id: i64) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
        }
    }
}

/// A user's reservation of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Store-assigned identity.
    pub id: i64,
    /// The booked event.
    pub event_id: i64,
    /// The booking user.
    pub user_id: i64,
}

/// Writable fields of a [`Booking`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BookingFields {
    /// The booked event.
    pub event_id: i64,
    /// The booking user.
    pub user_id: i64,
}

impl BookingFields {
    /// Attaches an identity, producing the full record.
    #[must_use]
    pub fn into_booking(self, id: i64) -> Booking {
        Booking {
            id,
            event_id: self.event_id,
            user_id: self.user_id,
        }
    }
}
