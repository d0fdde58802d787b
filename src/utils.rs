//! Numeric helpers shared across modules.

pub mod safe_cast;
