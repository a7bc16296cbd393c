//! Domain layer: pure, synchronous types and ports. No I/O.

pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod traits;
