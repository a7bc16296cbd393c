//! Bookmark export cleaner.
//!
//! Layers:
//! - domain: pure types, ports and errors
//! - usecase: dedup engine, label cleaning, cleaning workflow + progress events
//! - infrastructure: url parsing, union-find, HTML / JSON adapters
//! - interface: CLI wiring

pub mod domain;
pub mod infrastructure;
pub mod interface;
pub mod usecase;
