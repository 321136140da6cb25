//! Bridge between the UI thread and the background prediction worker.

pub mod commands;
pub mod runtime;
