//! Usecase layer: the dedup engine, the cleaning workflow and its events.

pub mod clean;
pub mod dedup;
pub mod event;
pub mod report;
pub mod stats;
pub mod validate;
