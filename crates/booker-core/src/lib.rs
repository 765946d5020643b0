//! Booker Core — shared domain abstractions.
//!
//! This crate defines the entity model, the error taxonomy and the storage
//! gateway traits that the HTTP layer and the storage implementations meet
//! at. It contains no infrastructure code.

pub mod error;
pub mod model;
pub mod repository;
