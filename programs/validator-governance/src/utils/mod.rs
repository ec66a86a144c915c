//! Shared utilities

pub mod merkle;
pub mod operators;
pub mod stake;
pub mod validation;
