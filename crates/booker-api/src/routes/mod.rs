//! Route modules, one per entity plus health.

pub mod bookings;
pub mod events;
pub mod health;
pub mod users;
