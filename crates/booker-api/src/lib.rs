//! Booker API — HTTP surface over users, events and bookings.

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod telemetry;
