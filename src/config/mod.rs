//! Environment loading for the client and controller configuration.
//!
//! The configuration structs live next to the services they configure; this
//! module adds their `from_env()` constructors.

pub mod analysis_client;
pub mod controller;
