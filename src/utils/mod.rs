//! Utility modules shared by the build steps.

pub mod date;
pub mod exec;
pub mod xml;
