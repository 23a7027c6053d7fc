//! backend/mod.rs
//! Optional backend metadata and runtime detection.

pub mod descriptor;
pub mod probe;

pub use descriptor::*;
pub use probe::*;
