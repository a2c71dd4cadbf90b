//! # Volunteers Module
//!
//! Volunteer sign-up:
//! - Enum domains (occupation, semester, free days, participation history)
//! - Registration payload schema and validator
//! - Volunteer entity, create use case and HTTP handler

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use routes::volunteers_routes;
