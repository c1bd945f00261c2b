//! Utility functions and helper modules.

pub mod html;

pub use html::*;
