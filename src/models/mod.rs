//! Data models for the submission pipeline.
//!
//! This module contains the request/response types exchanged with the
//! analysis service, chart datasets, and the page model the controller
//! renders into.

pub mod analysis;
pub mod chart;
pub mod ui;

pub use analysis::*;
pub use chart::*;
pub use ui::*;
