//! compression/mod.rs
//! Stream codecs and the registry that hands them out.
//!
//! - Codecs are stateless and shared; each call builds its own encoder/decoder.
//! - The registry resolves backend selectors to codec handles, probing optional
//!   backends once and constructing each handle at most once.

pub mod types;
pub mod stream;
pub mod codecs;
pub mod registry;

pub use types::*;
pub use registry::*;
