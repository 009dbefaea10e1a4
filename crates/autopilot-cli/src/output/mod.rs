//! Output formatters for command results

pub mod json;
pub mod pretty;
