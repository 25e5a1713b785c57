//! Test helpers shared by the simulation backend's unit and integration tests.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
