//! Shared application state.

use std::sync::Arc;

use booker_core::repository::{
    BookingRepository, EventRepository, StorageLifecycle, UserRepository,
};

/// Application state shared across all request handlers.
///
/// Each field is a view of the same storage gateway through one of its
/// traits; handlers only see the slice they need.
#[derive(Clone)]
pub struct AppState {
    /// User persistence.
    pub users: Arc<dyn UserRepository>,
    /// Event persistence.
    pub events: Arc<dyn EventRepository>,
    /// Booking persistence.
    pub bookings: Arc<dyn BookingRepository>,
    /// Pool health and release.
    pub storage: Arc<dyn StorageLifecycle>,
}

impl AppState {
    /// Create new application state backed by a single storage gateway.
    #[must_use]
    pub fn new<S>(storage: Arc<S>) -> Self
    where
        S: UserRepository + EventRepository + BookingRepository + StorageLifecycle + 'static,
    {
        Self {
            users: storage.clone(),
            events: storage.clone(),
            bookings: storage.clone(),
            storage,
        }
    }
}
