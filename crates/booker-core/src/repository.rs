//! Storage gateway abstraction.
//!
//! One trait per entity, each covering the five CRUD verbs. Implementations
//! issue exactly one statement per call and never pre-read: `NotFound` on
//! update and delete comes from the affected-row count alone.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::model::{Booking, BookingFields, Event, EventFields, User, UserFields};

/// Persistence operations for [`User`] rows.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users ordered by identity. Empty when there are none.
    async fn list_users(&self) -> Result<Vec<User>, DomainError>;

    /// The user with the given identity, or `DomainError::NotFound`.
    async fn get_user(&self, id: i64) -> Result<User, DomainError>;

    /// Inserts a user and returns the identity the store assigned.
    async fn create_user(&self, fields: &UserFields) -> Result<i64, DomainError>;

    /// Overwrites every writable field of an existing user.
    async fn update_user(&self, id: i64, fields: &UserFields) -> Result<(), DomainError>;

    /// Removes a user. Bookings that reference it go with it.
    async fn delete_user(&self, id: i64) -> Result<(), DomainError>;
}

/// Persistence operations for [`Event`] rows.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// All events ordered by identity. Empty when there are none.
    async fn list_events(&self) -> Result<Vec<Event>, DomainError>;

    /// The event with the given identity, or `DomainError::NotFound`.
    async fn get_event(&self, id: i64) -> Result<Event, DomainError>;

    /// Inserts an event and returns the identity the store assigned.
    async fn create_event(&self, fields: &EventFields) -> Result<i64, DomainError>;

    /// Overwrites every writable field of an existing event.
    async fn update_event(&self, id: i64, fields: &EventFields) -> Result<(), DomainError>;

    /// Removes an event. Bookings that reference it go with it.
    async fn delete_event(&self, id: i64) -> Result<(), DomainError>;
}

/// Persistence operations for [`Booking`] rows.
///
/// Referenced users and events are checked by the store's foreign keys, not
/// by a read beforehand. A dangling reference surfaces as
/// `DomainError::Constraint`.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// All bookings ordered by identity. Empty when there are none.
    async fn list_bookings(&self) -> Result<Vec<Booking>, DomainError>;

    /// The booking with the given identity, or `DomainError::NotFound`.
    async fn get_booking(&self, id: i64) -> Result<Booking, DomainError>;

    /// Inserts a booking and returns the identity the store assigned.
    async fn create_booking(&self, fields: &BookingFields) -> Result<i64, DomainError>;

    /// Overwrites both references of an existing booking.
    async fn update_booking(&self, id: i64, fields: &BookingFields) -> Result<(), DomainError>;

    /// Removes a booking.
    async fn delete_booking(&self, id: i64) -> Result<(), DomainError>;
}

/// Lifecycle of the connection pool behind the repositories.
#[async_trait]
pub trait StorageLifecycle: Send + Sync {
    /// Round-trips to the store.
    async fn ping(&self) -> Result<(), DomainError>;

    /// Releases every pooled connection. Safe to call more than once.
    async fn close(&self);
}
