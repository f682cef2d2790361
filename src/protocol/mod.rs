//! Wire payload construction and response scanning.

pub mod request;
pub mod scan;
