//! CLI library components for rxcap.

pub mod logging;
pub mod source;
