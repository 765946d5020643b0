//! Shared test doubles for the Booker service.

mod repository;

pub use repository::{FailingStorage, InMemoryStorage};
