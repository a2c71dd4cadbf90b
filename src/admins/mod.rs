//! # Admins Module
//!
//! Administrator account creation:
//! - Admin-creation payload schema and validator
//! - Admin entity with hashed password
//! - Create-admin use case and HTTP handler

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::admins_routes;
