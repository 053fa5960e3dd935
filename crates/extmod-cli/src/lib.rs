//! extmod library - expose command handlers for testing

pub mod commands;
pub mod common;

pub use common::GlobalOpts;
pub use extmod_logger as logger;
