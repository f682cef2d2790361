//! Transport layer: single-attempt HTTP exchange plus retry orchestration.

pub mod http;
pub mod retry;
