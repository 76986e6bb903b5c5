//! Shared helpers: input limits and numeric clamping.

pub mod validation;
